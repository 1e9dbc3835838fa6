//! Hardware identifier resolution (model name, release year, CPU)
//!
//! Exact table hits win; misses fall back to string heuristics and finally to
//! sentinels. Nothing here can fail.

use crate::data::ReleaseYear;

/// Generic label for same-vendor silicon that no rule recognises
pub const GENERIC_CPU: &str = "Apple Silicon";

/// Year markers checked against the model name, newest generation first
const GENERATION_MARKERS: [(&str, u16); 3] = [("M4", 2024), ("M2", 2022), ("M1", 2021)];

/// Read the machine-class identifier of the running host (`uname` machine field)
pub fn machine_identifier() -> String {
    // SAFETY: utsname is plain old data and uname only writes into it.
    unsafe {
        let mut info: libc::utsname = std::mem::zeroed();
        if libc::uname(&mut info) == 0 {
            let machine = std::ffi::CStr::from_ptr(info.machine.as_ptr());
            let machine = machine.to_string_lossy().trim().to_string();
            if !machine.is_empty() {
                return machine;
            }
        }
    }
    tracing::warn!("uname failed, machine identifier unknown");
    "Unknown".to_string()
}

/// Human-readable model name; the identifier itself when unknown
pub fn resolve_model(identifier: &str) -> String {
    let name = match identifier {
        // iPad Pro
        "iPad13,4" | "iPad13,5" => "iPad Pro 12.9\" (5th generation)",
        "iPad13,6" | "iPad13,7" => "iPad Pro 11\" (3rd generation)",
        "iPad13,8" | "iPad13,9" => "iPad Pro 12.9\" (6th generation)",
        "iPad13,10" | "iPad13,11" | "iPad13,16" | "iPad13,17" => "iPad Pro 11\" (M4)",
        "iPad13,12" | "iPad13,13" | "iPad13,14" | "iPad13,15" => "iPad Pro 13\" (M4)",
        "iPad8,1" | "iPad8,2" | "iPad8,3" | "iPad8,4" => "iPad Pro 11\" (1st generation)",
        "iPad8,5" | "iPad8,6" | "iPad8,7" | "iPad8,8" => "iPad Pro 12.9\" (3rd generation)",
        "iPad8,9" | "iPad8,10" => "iPad Pro 11\" (2nd generation)",
        "iPad8,11" | "iPad8,12" => "iPad Pro 12.9\" (4th generation)",
        // iPad Air
        "iPad13,18" | "iPad13,19" => "iPad Air 13\" (M2)",
        "iPad13,1" | "iPad13,2" => "iPad Air (4th generation)",
        // iPhone
        "iPhone14,2" => "iPhone 13 Pro",
        "iPhone14,3" => "iPhone 13 Pro Max",
        "iPhone15,2" => "iPhone 14 Pro",
        "iPhone15,3" => "iPhone 14 Pro Max",
        "iPhone16,1" => "iPhone 15 Pro",
        "iPhone16,2" => "iPhone 15 Pro Max",
        "iPhone17,1" => "iPhone 16 Pro",
        "iPhone17,2" | "iPhone17,3" => "iPhone 16 Pro Max",
        _ => return identifier.to_string(),
    };
    name.to_string()
}

/// Release year from the identifier table, else from generation markers in `model`
pub fn resolve_year(identifier: &str, model: &str) -> ReleaseYear {
    if let Some(year) = lookup_year(identifier) {
        return ReleaseYear::Known(year);
    }

    GENERATION_MARKERS
        .iter()
        .find(|(marker, _)| model.contains(marker))
        .map(|(_, year)| ReleaseYear::Known(*year))
        .unwrap_or(ReleaseYear::Unknown)
}

fn lookup_year(identifier: &str) -> Option<u16> {
    let year = match identifier {
        "iPad13,10" | "iPad13,11" | "iPad13,12" | "iPad13,13" | "iPad13,14" | "iPad13,15"
        | "iPad13,16" | "iPad13,17" => 2024,
        "iPad13,6" | "iPad13,7" | "iPad13,8" | "iPad13,9" => 2022,
        "iPad13,4" | "iPad13,5" => 2021,
        "iPad8,9" | "iPad8,10" | "iPad8,11" | "iPad8,12" => 2020,
        "iPad8,1" | "iPad8,2" | "iPad8,3" | "iPad8,4" | "iPad8,5" | "iPad8,6" | "iPad8,7"
        | "iPad8,8" => 2018,
        "iPad13,18" | "iPad13,19" => 2024,
        "iPad13,1" | "iPad13,2" => 2020,
        "iPhone14,2" | "iPhone14,3" => 2021,
        "iPhone15,2" | "iPhone15,3" => 2022,
        "iPhone16,1" | "iPhone16,2" => 2023,
        "iPhone17,1" | "iPhone17,2" | "iPhone17,3" => 2024,
        _ => return None,
    };
    Some(year)
}

/// CPU name from the identifier table, else by product family and sub-model.
///
/// The family must match exactly and the sub-model is compared as a number, so
/// `iPad13,100` is not read as `iPad13,10` and `iPad130,1` is not an `iPad13`.
pub fn resolve_cpu(identifier: &str) -> String {
    if let Some(cpu) = lookup_cpu(identifier) {
        return cpu.to_string();
    }

    let (family, sub_model) = split_identifier(identifier);
    let cpu = match (family, sub_model) {
        ("iPad13", Some(10..=17)) => "Apple M4",
        ("iPad13", Some(6..=9)) => "Apple M2",
        ("iPad13", _) => "Apple M1",
        ("iPad8", _) => "Apple A12Z / A12X",
        _ => GENERIC_CPU,
    };
    cpu.to_string()
}

fn lookup_cpu(identifier: &str) -> Option<&'static str> {
    let cpu = match identifier {
        "iPad13,10" | "iPad13,11" | "iPad13,12" | "iPad13,13" | "iPad13,14" | "iPad13,15"
        | "iPad13,16" | "iPad13,17" => "Apple M4",
        "iPad13,6" | "iPad13,7" | "iPad13,8" | "iPad13,9" => "Apple M2",
        "iPad13,4" | "iPad13,5" => "Apple M1",
        "iPad8,9" | "iPad8,10" | "iPad8,11" | "iPad8,12" => "Apple A12Z",
        "iPad8,1" | "iPad8,2" | "iPad8,3" | "iPad8,4" | "iPad8,5" | "iPad8,6" | "iPad8,7"
        | "iPad8,8" => "Apple A12X",
        "iPad13,18" | "iPad13,19" => "Apple M2",
        "iPad13,1" | "iPad13,2" => "Apple A14 Bionic",
        "iPhone14,2" | "iPhone14,3" => "Apple A15 Bionic",
        "iPhone15,2" | "iPhone15,3" => "Apple A16 Bionic",
        "iPhone16,1" | "iPhone16,2" => "Apple A17 Pro",
        "iPhone17,1" | "iPhone17,2" | "iPhone17,3" => "Apple A18 Pro",
        _ => return None,
    };
    Some(cpu)
}

/// Split `"iPad13,10"` into `("iPad13", Some(10))`
fn split_identifier(identifier: &str) -> (&str, Option<u32>) {
    match identifier.split_once(',') {
        Some((family, sub)) => (family, sub.trim().parse().ok()),
        None => (identifier, None),
    }
}
