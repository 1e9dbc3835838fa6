//! Plain data records produced by collectors, the sensor stream and the benchmark engine

pub mod benchmark;
pub mod device;
pub mod load;
pub mod sensor;

pub use benchmark::{BenchmarkPhase, BenchmarkResult, BenchmarkSnapshot, Stage};
pub use device::{CapabilityFlags, DeviceFacts, RefreshClass, ReleaseYear, ScreenInfo};
pub use load::SystemLoad;
pub use sensor::{
    Attitude, Sample, SensorAvailability, SensorKind, SensorReading, SensorSnapshot, SensorStatus,
};

/// Placeholder shown for any value whose probe failed
pub const NOT_AVAILABLE: &str = "N/A";
