//! Operating system identity (OS name, version, host name)

use crate::error::{ProbeError, Result};
use crate::utils::file::read_first_line;

/// `NAME` and `VERSION_ID` from `/etc/os-release`
pub fn read_os_release() -> Result<(Option<String>, Option<String>)> {
    let content = std::fs::read_to_string("/etc/os-release")?;
    Ok(parse_os_release(&content))
}

fn parse_os_release(content: &str) -> (Option<String>, Option<String>) {
    let mut name = None;
    let mut version = None;

    for line in content.lines() {
        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        let value = value.trim().trim_matches('"');
        if value.is_empty() {
            continue;
        }
        match key.trim() {
            "NAME" => name = Some(value.to_string()),
            "VERSION_ID" => version = Some(value.to_string()),
            _ => {}
        }
        // Early exit if we found both
        if name.is_some() && version.is_some() {
            break;
        }
    }

    (name, version)
}

pub fn read_kernel_version() -> Result<String> {
    // /proc/version is a single line
    let version_info = read_first_line("/proc/version")?;
    version_info
        .split_whitespace()
        .nth(2)
        .map(|v| v.to_string())
        .ok_or_else(|| ProbeError::Detection("Kernel version not found".to_string()))
}

pub fn get_hostname() -> Result<String> {
    let hostname = read_first_line("/proc/sys/kernel/hostname")?;
    if hostname.is_empty() {
        return Err(ProbeError::Detection("Empty hostname".to_string()));
    }
    Ok(hostname)
}
