//! Hardware sizing (memory, cores, storage, display)

use std::ffi::CString;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::os::unix::ffi::OsStrExt;
use std::path::Path;

use crate::collectors::host::{DisplayMetrics, StorageSpace};
use crate::error::{ProbeError, Result};
use crate::utils::file::{list_dir, read_first_line};
use crate::utils::parsing::{meminfo_line_bytes, parse_mode};

/// Total physical memory in bytes (`MemTotal`)
pub fn read_physical_memory() -> Result<u64> {
    // Read line by line to stop at the first matching entry
    let file = File::open("/proc/meminfo")?;
    let mut reader = BufReader::new(file);
    let mut line = String::with_capacity(64);

    loop {
        line.clear();
        let bytes_read = reader.read_line(&mut line)?;
        if bytes_read == 0 {
            break;
        }
        if line.starts_with("MemTotal") {
            return meminfo_line_bytes(&line)
                .ok_or_else(|| ProbeError::Parse(format!("Bad MemTotal line: {}", line.trim())));
        }
    }
    Err(ProbeError::Detection("MemTotal not found".to_string()))
}

/// Online CPU core count
pub fn cpu_cores() -> Result<usize> {
    // SAFETY: sysconf has no memory-safety preconditions.
    let cores = unsafe { libc::sysconf(libc::_SC_NPROCESSORS_ONLN) };
    if cores < 1 {
        return Err(ProbeError::Detection("Core count unavailable".to_string()));
    }
    Ok(cores as usize)
}

/// Page size in bytes
pub fn page_size() -> u64 {
    // SAFETY: sysconf has no memory-safety preconditions.
    let size = unsafe { libc::sysconf(libc::_SC_PAGESIZE) };
    if size > 0 {
        size as u64
    } else {
        4096
    }
}

/// Total and free space of the filesystem holding `path`
pub fn read_storage(path: &Path) -> Result<StorageSpace> {
    let c_path = CString::new(path.as_os_str().as_bytes())
        .map_err(|_| ProbeError::Parse("Invalid path".to_string()))?;

    // SAFETY: statvfs fills a zeroed POD struct from a valid C string.
    unsafe {
        let mut stat: libc::statvfs = std::mem::zeroed();
        if libc::statvfs(c_path.as_ptr(), &mut stat) != 0 {
            return Err(ProbeError::from(std::io::Error::last_os_error()));
        }
        let total = (stat.f_blocks as u64).wrapping_mul(stat.f_frsize as u64);
        let available = (stat.f_bavail as u64).wrapping_mul(stat.f_frsize as u64);
        Ok(StorageSpace { total, available })
    }
}

/// Metrics of the first connected DRM connector
pub fn read_display() -> Result<DisplayMetrics> {
    read_display_from(Path::new("/sys/class/drm"), desktop_scale())
}

fn read_display_from(drm_root: &Path, scale: f64) -> Result<DisplayMetrics> {
    let mut connectors: Vec<_> = list_dir(drm_root)
        .into_iter()
        .filter(|path| {
            path.file_name()
                .and_then(|n| n.to_str())
                .map(|name| name.starts_with("card") && name.contains('-'))
                .unwrap_or(false)
        })
        .collect();
    connectors.sort();

    for connector in connectors {
        let connected = read_first_line(connector.join("status"))
            .map(|status| status == "connected")
            .unwrap_or(false);
        if !connected {
            continue;
        }
        // First listed mode is the preferred (native) one
        if let Some((width, height)) = read_first_line(connector.join("modes"))
            .ok()
            .and_then(|line| parse_mode(&line))
        {
            tracing::debug!(connector = %connector.display(), width, height, "Found display");
            return Ok(DisplayMetrics {
                width_points: width as f64 / scale,
                height_points: height as f64 / scale,
                native_width: width,
                native_height: height,
                scale,
                max_refresh_hz: None,
            });
        }
    }

    Err(ProbeError::Detection("No connected display".to_string()))
}

/// Integer desktop scale from toolkit environment variables, default 1
fn desktop_scale() -> f64 {
    ["GDK_SCALE", "QT_SCALE_FACTOR"]
        .iter()
        .filter_map(|var| std::env::var(var).ok())
        .filter_map(|value| value.trim().parse::<f64>().ok())
        .find(|scale| *scale >= 1.0)
        .unwrap_or(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_read_display_picks_connected_connector() {
        let root = tempdir().unwrap();
        let off = root.path().join("card0-HDMI-A-1");
        let on = root.path().join("card0-eDP-1");
        fs::create_dir_all(&off).unwrap();
        fs::create_dir_all(&on).unwrap();
        fs::write(off.join("status"), "disconnected\n").unwrap();
        fs::write(on.join("status"), "connected\n").unwrap();
        fs::write(on.join("modes"), "2560x1600\n1920x1200\n").unwrap();
        fs::create_dir_all(root.path().join("card0")).unwrap();

        let metrics = read_display_from(root.path(), 2.0).unwrap();
        assert_eq!((metrics.native_width, metrics.native_height), (2560, 1600));
        assert_eq!(metrics.width_points, 1280.0);
        assert_eq!(metrics.scale, 2.0);
    }

    #[test]
    fn test_read_display_without_connectors_fails() {
        let root = tempdir().unwrap();
        assert!(read_display_from(root.path(), 1.0).is_err());
    }

    #[test]
    fn test_storage_of_temp_dir() {
        let dir = tempdir().unwrap();
        let space = read_storage(dir.path()).unwrap();
        assert!(space.total >= space.available);
    }

    #[test]
    fn test_cpu_cores_positive() {
        assert!(cpu_cores().unwrap() >= 1);
    }
}
