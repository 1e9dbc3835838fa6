//! File reading utilities for procfs and sysfs

use crate::error::{ProbeError, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Read first line of a file, trimmed
/// Optimized for single-line files like /proc/sys/kernel/hostname
/// Uses direct syscalls to skip buffered reader setup
pub fn read_first_line<P: AsRef<Path>>(path: P) -> Result<String> {
    use std::ffi::CString;
    use std::os::unix::ffi::OsStrExt;

    let path_cstr = CString::new(path.as_ref().as_os_str().as_bytes())
        .map_err(|_| ProbeError::Parse("Invalid path".to_string()))?;

    // SAFETY: the fd is closed on every path and the buffer outlives the read.
    unsafe {
        let fd = libc::open(path_cstr.as_ptr(), libc::O_RDONLY);
        if fd < 0 {
            return Err(ProbeError::from(std::io::Error::last_os_error()));
        }

        let mut buffer = [0u8; 256];
        let bytes_read = libc::read(fd, buffer.as_mut_ptr() as *mut libc::c_void, buffer.len());
        libc::close(fd);

        if bytes_read < 0 {
            return Err(ProbeError::from(std::io::Error::last_os_error()));
        }

        if bytes_read == 0 {
            return Ok(String::new());
        }

        let content = std::str::from_utf8(&buffer[..bytes_read as usize])
            .map_err(|_| ProbeError::Parse("Invalid UTF-8".to_string()))?;
        Ok(content.lines().next().unwrap_or("").trim().to_string())
    }
}

/// Read a sysfs attribute and parse it as a float
pub fn read_f64<P: AsRef<Path>>(path: P) -> Result<f64> {
    let path = path.as_ref();
    let raw = read_first_line(path)?;
    raw.parse()
        .map_err(|_| ProbeError::Parse(format!("{}: not a number: {:?}", path.display(), raw)))
}

/// Check if a file exists safely
pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
    path.as_ref().exists()
}

/// Entries of a directory, empty if it cannot be read
pub fn list_dir<P: AsRef<Path>>(dir: P) -> Vec<PathBuf> {
    match fs::read_dir(dir) {
        Ok(entries) => entries.filter_map(|e| e.ok()).map(|e| e.path()).collect(),
        Err(_) => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn test_read_first_line_trims() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("attr");
        let mut f = fs::File::create(&path).unwrap();
        writeln!(f, "  42.5  \nsecond").unwrap();

        assert_eq!(read_first_line(&path).unwrap(), "42.5");
        assert_eq!(read_f64(&path).unwrap(), 42.5);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempdir().unwrap();
        let err = read_first_line(dir.path().join("nope")).unwrap_err();
        assert!(matches!(err, ProbeError::Io(_)));
        assert!(list_dir(dir.path().join("nope")).is_empty());
    }

    #[test]
    fn test_read_f64_rejects_text() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("attr");
        fs::write(&path, "hello\n").unwrap();
        assert!(matches!(read_f64(&path), Err(ProbeError::Parse(_))));
    }
}
