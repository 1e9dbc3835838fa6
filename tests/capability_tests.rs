use devprobe::collectors::host::{Capability, DisplayMetrics, HostProbe, StorageSpace};
use devprobe::data::{RefreshClass, ReleaseYear, NOT_AVAILABLE};
use devprobe::CapabilitySnapshot;

const GIB: u64 = 1024 * 1024 * 1024;

/// Every probe fails
struct DeadHost;

impl HostProbe for DeadHost {
    fn machine_identifier(&self) -> Option<String> {
        None
    }
    fn device_name(&self) -> Option<String> {
        None
    }
    fn os_name(&self) -> Option<String> {
        None
    }
    fn os_version(&self) -> Option<String> {
        None
    }
    fn cpu_cores(&self) -> Option<usize> {
        None
    }
    fn physical_memory(&self) -> Option<u64> {
        None
    }
    fn storage(&self) -> Option<StorageSpace> {
        None
    }
    fn display(&self) -> Option<DisplayMetrics> {
        None
    }
    fn supports(&self, _capability: Capability) -> Option<bool> {
        None
    }
}

struct TabletHost {
    identifier: &'static str,
    scene_reconstruction: bool,
    refresh_hz: Option<u32>,
}

impl HostProbe for TabletHost {
    fn machine_identifier(&self) -> Option<String> {
        Some(self.identifier.to_string())
    }
    fn device_name(&self) -> Option<String> {
        Some("studio-tab".to_string())
    }
    fn os_name(&self) -> Option<String> {
        Some("iPadOS".to_string())
    }
    fn os_version(&self) -> Option<String> {
        Some("17.5".to_string())
    }
    fn cpu_cores(&self) -> Option<usize> {
        Some(10)
    }
    fn physical_memory(&self) -> Option<u64> {
        Some(16 * GIB)
    }
    fn storage(&self) -> Option<StorageSpace> {
        Some(StorageSpace {
            total: 512 * GIB,
            available: 128 * GIB + GIB / 2,
        })
    }
    fn display(&self) -> Option<DisplayMetrics> {
        Some(DisplayMetrics {
            width_points: 216.0,
            height_points: 288.0,
            native_width: 2420,
            native_height: 1668,
            scale: 2.0,
            max_refresh_hz: self.refresh_hz,
        })
    }
    fn supports(&self, capability: Capability) -> Option<bool> {
        match capability {
            Capability::SceneReconstruction => Some(self.scene_reconstruction),
            Capability::Barometer => Some(false),
            _ => Some(true),
        }
    }
}

#[test]
fn test_failed_probes_become_placeholders() {
    let facts = CapabilitySnapshot::new(DeadHost).collect();

    assert_eq!(facts.identifier, "Unknown");
    assert_eq!(facts.year, ReleaseYear::Unknown);
    assert_eq!(facts.device_name, NOT_AVAILABLE);
    assert_eq!(facts.cpu_cores, NOT_AVAILABLE);
    assert_eq!(facts.physical_memory, NOT_AVAILABLE);
    assert_eq!(facts.total_storage, NOT_AVAILABLE);
    assert_eq!(facts.available_storage, NOT_AVAILABLE);
    assert_eq!(facts.screen.diagonal, NOT_AVAILABLE);
    assert_eq!(facts.screen.refresh_class, RefreshClass::Standard);

    let caps = facts.capabilities;
    assert!(!caps.camera && !caps.lidar && !caps.scene_reconstruction);
    assert!(caps.ambient_light);
}

#[test]
fn test_known_identifier_resolves_everything() {
    let facts = CapabilitySnapshot::new(TabletHost {
        identifier: "iPad13,10",
        scene_reconstruction: true,
        refresh_hz: Some(120),
    })
    .collect();

    assert_eq!(facts.model, "iPad Pro 11\" (M4)");
    assert_eq!(facts.year, ReleaseYear::Known(2024));
    assert_eq!(facts.cpu_name, "Apple M4");
    assert_eq!(facts.device_name, "studio-tab");
    assert_eq!(facts.os_version, "iPadOS 17.5");
    assert_eq!(facts.cpu_cores, "10 cores");
    assert_eq!(facts.physical_memory, "16.0 GB");
    assert_eq!(facts.total_storage, "512.0 GB");
    assert_eq!(facts.available_storage, "128.5 GB");
    assert_eq!(facts.screen.diagonal, "5.0\"");
    assert_eq!(facts.screen.scale, "2x");
    assert_eq!(facts.screen.refresh_class, RefreshClass::ProMotion);
    assert!(facts.capabilities.lidar);
    assert!(!facts.capabilities.barometer);
}

#[test]
fn test_lidar_tracks_scene_reconstruction() {
    let facts = CapabilitySnapshot::new(TabletHost {
        identifier: "iPad13,10",
        scene_reconstruction: false,
        refresh_hz: Some(60),
    })
    .collect();

    assert!(!facts.capabilities.lidar);
    assert!(!facts.capabilities.scene_reconstruction);
    assert!(facts.capabilities.ambient_light);
    assert_eq!(facts.screen.refresh_class, RefreshClass::Standard);
}

#[test]
fn test_unknown_identifier_keeps_raw_model() {
    let facts = CapabilitySnapshot::new(TabletHost {
        identifier: "iPad99,99",
        scene_reconstruction: false,
        refresh_hz: None,
    })
    .collect();

    assert_eq!(facts.identifier, "iPad99,99");
    assert_eq!(facts.model, "iPad99,99");
    assert_eq!(facts.year, ReleaseYear::Unknown);
    assert_eq!(facts.cpu_name, "Apple Silicon");
    assert_eq!(facts.screen.refresh_class, RefreshClass::Standard);
}
