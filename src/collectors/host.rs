//! Host capability queries behind a trait so collection can run without a live device

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::collectors::{hardware, system};
use crate::identifier;
use crate::sensors::iio::{self, IIO_ROOT};
use crate::utils::file::{file_exists, list_dir};

/// Filesystem capacity in bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StorageSpace {
    pub total: u64,
    pub available: u64,
}

/// Raw display metrics
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayMetrics {
    pub width_points: f64,
    pub height_points: f64,
    pub native_width: u32,
    pub native_height: u32,
    pub scale: f64,
    pub max_refresh_hz: Option<u32>,
}

/// Boolean capabilities that are probed rather than assumed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    Camera,
    Gyroscope,
    Accelerometer,
    Magnetometer,
    Barometer,
    Proximity,
    ArSession,
    FaceTracking,
    WorldTracking,
    SceneReconstruction,
}

/// Blocking, fallible host queries. `None` means the value could not be determined.
pub trait HostProbe: Send + Sync {
    fn machine_identifier(&self) -> Option<String>;
    fn device_name(&self) -> Option<String>;
    fn os_name(&self) -> Option<String>;
    fn os_version(&self) -> Option<String>;
    fn cpu_cores(&self) -> Option<usize>;
    fn physical_memory(&self) -> Option<u64>;
    fn storage(&self) -> Option<StorageSpace>;
    fn display(&self) -> Option<DisplayMetrics>;
    fn supports(&self, capability: Capability) -> Option<bool>;
}

/// Probes backed by procfs, sysfs and libc on Linux
#[derive(Debug, Clone)]
pub struct LinuxHost {
    storage_path: PathBuf,
    iio_root: PathBuf,
}

impl LinuxHost {
    pub fn new() -> Self {
        Self {
            storage_path: dirs::home_dir().unwrap_or_else(|| PathBuf::from("/")),
            iio_root: PathBuf::from(IIO_ROOT),
        }
    }

    fn has_iio(&self, channel: &str) -> bool {
        iio::has_channel(&self.iio_root, channel)
    }
}

impl Default for LinuxHost {
    fn default() -> Self {
        Self::new()
    }
}

/// Log a failed probe and turn it into `None`
fn probe<T, E: std::fmt::Display>(what: &str, result: Result<T, E>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            debug!(probe = what, error = %e, "Probe unavailable");
            None
        }
    }
}

impl HostProbe for LinuxHost {
    fn machine_identifier(&self) -> Option<String> {
        Some(identifier::machine_identifier())
    }

    fn device_name(&self) -> Option<String> {
        probe("hostname", system::get_hostname())
    }

    fn os_name(&self) -> Option<String> {
        probe("os-release", system::read_os_release())
            .and_then(|(name, _)| name)
            .or_else(|| Some("Linux".to_string()))
    }

    fn os_version(&self) -> Option<String> {
        probe("os-release", system::read_os_release())
            .and_then(|(_, version)| version)
            .or_else(|| probe("kernel", system::read_kernel_version()))
    }

    fn cpu_cores(&self) -> Option<usize> {
        probe("cores", hardware::cpu_cores())
    }

    fn physical_memory(&self) -> Option<u64> {
        probe("meminfo", hardware::read_physical_memory())
    }

    fn storage(&self) -> Option<StorageSpace> {
        probe("statvfs", hardware::read_storage(&self.storage_path))
    }

    fn display(&self) -> Option<DisplayMetrics> {
        probe("drm", hardware::read_display())
    }

    fn supports(&self, capability: Capability) -> Option<bool> {
        let supported = match capability {
            Capability::Camera => {
                !list_dir(Path::new("/sys/class/video4linux")).is_empty()
                    || file_exists("/dev/video0")
            }
            Capability::Accelerometer => self.has_iio("accel"),
            Capability::Gyroscope => self.has_iio("anglvel"),
            Capability::Magnetometer => self.has_iio("magn"),
            Capability::Barometer => self.has_iio("pressure"),
            Capability::Proximity => self.has_iio("proximity"),
            // No AR or scene-reconstruction framework exists on Linux hosts
            Capability::ArSession
            | Capability::FaceTracking
            | Capability::WorldTracking
            | Capability::SceneReconstruction => false,
        };
        Some(supported)
    }
}
