//! One-shot collection of `DeviceFacts`

use tracing::debug;

use crate::collectors::host::{Capability, DisplayMetrics, HostProbe};
use crate::data::{CapabilityFlags, DeviceFacts, RefreshClass, ScreenInfo, NOT_AVAILABLE};
use crate::identifier;
use crate::utils::parsing::format_gib;

/// Points per inch used to approximate the physical diagonal.
pub const POINTS_PER_INCH: f64 = 72.0;

/// Refresh rate at which a display counts as ProMotion.
const PROMOTION_HZ: u32 = 120;

/// Assembles `DeviceFacts` from an injected `HostProbe`.
pub struct CapabilitySnapshot<P: HostProbe> {
    probe: P,
}

impl<P: HostProbe> CapabilitySnapshot<P> {
    pub fn new(probe: P) -> Self {
        Self { probe }
    }

    /// Query every probe once. Failed probes become placeholders, never errors.
    pub fn collect(&self) -> DeviceFacts {
        let probe = &self.probe;

        // Independent queries run in parallel
        let ((identity, sizing), (screen, capabilities)) = rayon::join(
            || {
                rayon::join(
                    || {
                        (
                            probe.machine_identifier(),
                            probe.device_name(),
                            probe.os_name(),
                            probe.os_version(),
                        )
                    },
                    || (probe.cpu_cores(), probe.physical_memory(), probe.storage()),
                )
            },
            || rayon::join(|| screen_info(probe.display()), || capability_flags(probe)),
        );

        let (identifier, device_name, os_name, os_version) = identity;
        let (cores, memory, storage) = sizing;

        let identifier = identifier.unwrap_or_else(|| "Unknown".to_string());
        let model = identifier::resolve_model(&identifier);
        let year = identifier::resolve_year(&identifier, &model);
        let cpu_name = identifier::resolve_cpu(&identifier);

        let os_name = os_name.unwrap_or_else(|| NOT_AVAILABLE.to_string());
        let os_version = match os_version {
            Some(version) => format!("{} {}", os_name, version),
            None => os_name.clone(),
        };

        let facts = DeviceFacts {
            device_name: device_name.unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            model,
            year,
            os_name,
            os_version,
            cpu_name,
            cpu_cores: cores
                .map(|n| format!("{} cores", n))
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            physical_memory: format_gib(memory),
            total_storage: format_gib(storage.map(|s| s.total)),
            available_storage: format_gib(storage.map(|s| s.available)),
            screen,
            capabilities,
            identifier,
        };

        debug!(identifier = %facts.identifier, model = %facts.model, "Collected device facts");
        facts
    }
}

fn capability_flags<P: HostProbe>(probe: &P) -> CapabilityFlags {
    let has = |capability| probe.supports(capability).unwrap_or(false);
    let scene_reconstruction = has(Capability::SceneReconstruction);

    CapabilityFlags {
        // LiDAR is inferred from mesh scene-reconstruction support
        lidar: scene_reconstruction,
        camera: has(Capability::Camera),
        gyroscope: has(Capability::Gyroscope),
        accelerometer: has(Capability::Accelerometer),
        magnetometer: has(Capability::Magnetometer),
        barometer: has(Capability::Barometer),
        proximity: has(Capability::Proximity),
        // Not queryable; assumed present.
        ambient_light: true,
        ar_session: has(Capability::ArSession),
        face_tracking: has(Capability::FaceTracking),
        world_tracking: has(Capability::WorldTracking),
        scene_reconstruction,
    }
}

fn screen_info(metrics: Option<DisplayMetrics>) -> ScreenInfo {
    match metrics {
        Some(m) => ScreenInfo {
            diagonal: format_diagonal(m.width_points, m.height_points),
            resolution: format!("{} × {}", m.native_width, m.native_height),
            scale: format!("{}x", m.scale as u32),
            refresh_class: refresh_class(m.max_refresh_hz),
        },
        None => ScreenInfo {
            diagonal: NOT_AVAILABLE.to_string(),
            resolution: NOT_AVAILABLE.to_string(),
            scale: NOT_AVAILABLE.to_string(),
            refresh_class: RefreshClass::Standard,
        },
    }
}

/// `sqrt(w² + h²) / 72`, one decimal, inches
pub fn format_diagonal(width_points: f64, height_points: f64) -> String {
    let diagonal =
        (width_points * width_points + height_points * height_points).sqrt() / POINTS_PER_INCH;
    format!("{:.1}\"", diagonal)
}

pub fn refresh_class(max_refresh_hz: Option<u32>) -> RefreshClass {
    match max_refresh_hz {
        Some(hz) if hz >= PROMOTION_HZ => RefreshClass::ProMotion,
        _ => RefreshClass::Standard,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagonal_uses_points_per_inch() {
        // 3-4-5 triangle scaled by 72
        assert_eq!(format_diagonal(216.0, 288.0), "5.0\"");
    }

    #[test]
    fn test_refresh_class_threshold() {
        assert_eq!(refresh_class(Some(120)), RefreshClass::ProMotion);
        assert_eq!(refresh_class(Some(60)), RefreshClass::Standard);
        assert_eq!(refresh_class(None), RefreshClass::Standard);
    }

    #[test]
    fn test_missing_display_is_placeholder() {
        let screen = screen_info(None);
        assert_eq!(screen.diagonal, NOT_AVAILABLE);
        assert_eq!(screen.resolution, NOT_AVAILABLE);
    }
}
