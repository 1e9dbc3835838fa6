//! devprobe library
//!
//! Device identity and hardware facts, live motion-sensor streaming, and a
//! small on-device benchmark.

pub mod benchmark;
pub mod collectors;
pub mod config;
pub mod data;
pub mod display;
pub mod error;
pub mod identifier;
pub mod sensors;
pub mod utils;

pub use benchmark::BenchmarkEngine;
pub use collectors::capabilities::CapabilitySnapshot;
pub use collectors::host::{HostProbe, LinuxHost};
pub use data::{BenchmarkSnapshot, DeviceFacts, SensorSnapshot, SystemLoad};
pub use error::{BenchmarkError, ProbeError, Result};
pub use sensors::{IioProvider, ManualProvider, MotionProvider, SensorStream};

/// Collect device facts from the running Linux host
pub fn collect_device_facts() -> DeviceFacts {
    CapabilitySnapshot::new(LinuxHost::new()).collect()
}
