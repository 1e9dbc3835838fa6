//! String parsing and formatting utilities

use crate::data::NOT_AVAILABLE;

const BYTES_PER_GIB: f64 = 1024.0 * 1024.0 * 1024.0;

/// Extract value after a colon and space
pub fn extract_after_colon(line: &str) -> Option<String> {
    line.split(':')
        .nth(1)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Extract the kB figure from a `/proc/meminfo` line as bytes
pub fn meminfo_line_bytes(line: &str) -> Option<u64> {
    let value = extract_after_colon(line)?;
    let kb: u64 = value.trim_end_matches("kB").trim().parse().ok()?;
    Some(kb * 1024)
}

pub fn bytes_to_gib(bytes: u64) -> f64 {
    bytes as f64 / BYTES_PER_GIB
}

/// `"12.3 GB"` with one decimal, or the placeholder when unknown
pub fn format_gib(bytes: Option<u64>) -> String {
    match bytes {
        Some(bytes) => format!("{:.1} GB", bytes_to_gib(bytes)),
        None => NOT_AVAILABLE.to_string(),
    }
}

/// Parse a DRM mode line such as `2560x1600` or `1920x1080i`
pub fn parse_mode(line: &str) -> Option<(u32, u32)> {
    let (w, h) = line.trim().split_once('x')?;
    let h: String = h.chars().take_while(|c| c.is_ascii_digit()).collect();
    Some((w.parse().ok()?, h.parse().ok()?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_meminfo_line() {
        assert_eq!(meminfo_line_bytes("MemTotal:       16318480 kB"), Some(16318480 * 1024));
        assert_eq!(meminfo_line_bytes("MemTotal:"), None);
    }

    #[test]
    fn test_format_gib_rounds_to_one_decimal() {
        assert_eq!(format_gib(Some(8 * 1024 * 1024 * 1024)), "8.0 GB");
        assert_eq!(format_gib(Some(1_610_612_736)), "1.5 GB");
        assert_eq!(format_gib(None), "N/A");
    }

    #[test]
    fn test_parse_mode() {
        assert_eq!(parse_mode("2560x1600\n"), Some((2560, 1600)));
        assert_eq!(parse_mode("1920x1080i"), Some((1920, 1080)));
        assert_eq!(parse_mode("garbage"), None);
    }
}
