//! Device identity and hardware facts

use std::fmt;

/// Release year of a device model, or the unknown sentinel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseYear {
    Known(u16),
    Unknown,
}

impl ReleaseYear {
    pub fn is_known(&self) -> bool {
        matches!(self, ReleaseYear::Known(_))
    }
}

impl fmt::Display for ReleaseYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReleaseYear::Known(year) => write!(f, "{}", year),
            ReleaseYear::Unknown => f.write_str("Unknown"),
        }
    }
}

/// Display refresh class derived from the maximum frame rate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshClass {
    /// 120 Hz or faster
    ProMotion,
    Standard,
}

impl fmt::Display for RefreshClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RefreshClass::ProMotion => f.write_str("ProMotion (up to 120Hz)"),
            RefreshClass::Standard => f.write_str("Standard"),
        }
    }
}

/// Formatted screen metrics
#[derive(Debug, Clone, PartialEq)]
pub struct ScreenInfo {
    /// Diagonal in inches, e.g. `11.0"`
    pub diagonal: String,
    /// Native pixel resolution, e.g. `2420 × 1668`
    pub resolution: String,
    /// Point-to-pixel scale, e.g. `2x`
    pub scale: String,
    pub refresh_class: RefreshClass,
}

/// Hardware and software capability flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CapabilityFlags {
    pub lidar: bool,
    pub camera: bool,
    pub gyroscope: bool,
    pub accelerometer: bool,
    pub magnetometer: bool,
    pub barometer: bool,
    pub proximity: bool,
    /// Always `true`: ambient light presence cannot be queried, it is assumed.
    pub ambient_light: bool,
    pub ar_session: bool,
    pub face_tracking: bool,
    pub world_tracking: bool,
    pub scene_reconstruction: bool,
}

impl CapabilityFlags {
    /// Flags paired with their display labels, in presentation order
    pub fn labeled(&self) -> [(&'static str, bool); 12] {
        [
            ("LiDAR", self.lidar),
            ("Camera", self.camera),
            ("Gyroscope", self.gyroscope),
            ("Accelerometer", self.accelerometer),
            ("Magnetometer", self.magnetometer),
            ("Barometer", self.barometer),
            ("Proximity", self.proximity),
            ("Ambient Light", self.ambient_light),
            ("AR Session", self.ar_session),
            ("Face Tracking", self.face_tracking),
            ("World Tracking", self.world_tracking),
            ("Scene Reconstruction", self.scene_reconstruction),
        ]
    }
}

/// Immutable snapshot of everything known about the device
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceFacts {
    pub identifier: String,
    pub device_name: String,
    pub model: String,
    pub year: ReleaseYear,
    pub os_name: String,
    /// `"<os name> <version>"`
    pub os_version: String,
    pub cpu_name: String,
    pub cpu_cores: String,
    pub physical_memory: String,
    pub total_storage: String,
    pub available_storage: String,
    pub screen: ScreenInfo,
    pub capabilities: CapabilityFlags,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_release_year_display() {
        assert_eq!(ReleaseYear::Known(2024).to_string(), "2024");
        assert_eq!(ReleaseYear::Unknown.to_string(), "Unknown");
        assert!(!ReleaseYear::Unknown.is_known());
    }

    #[test]
    fn test_labeled_flags_cover_all_twelve() {
        let flags = CapabilityFlags {
            ambient_light: true,
            ..Default::default()
        };
        let labeled = flags.labeled();
        assert_eq!(labeled.len(), 12);
        assert_eq!(labeled.iter().filter(|(_, on)| *on).count(), 1);
    }
}
