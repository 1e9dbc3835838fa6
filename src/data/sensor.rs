//! Motion sensor readings and per-sensor availability

use std::fmt;

/// A 3-axis sensor vector
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SensorReading {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl SensorReading {
    pub const ZERO: SensorReading = SensorReading { x: 0.0, y: 0.0, z: 0.0 };

    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Euclidean norm of the stored vector
    pub fn magnitude(&self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }
}

/// Device orientation angles in radians
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Attitude {
    pub roll: f64,
    pub pitch: f64,
    pub yaw: f64,
}

impl Attitude {
    pub const ZERO: Attitude = Attitude { roll: 0.0, pitch: 0.0, yaw: 0.0 };
}

/// The independently subscribable motion feeds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SensorKind {
    Accelerometer,
    Gyroscope,
    Magnetometer,
    /// Fused attitude (roll/pitch/yaw)
    DeviceMotion,
}

impl SensorKind {
    pub const ALL: [SensorKind; 4] = [
        SensorKind::Accelerometer,
        SensorKind::Gyroscope,
        SensorKind::Magnetometer,
        SensorKind::DeviceMotion,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            SensorKind::Accelerometer => "Accelerometer",
            SensorKind::Gyroscope => "Gyroscope",
            SensorKind::Magnetometer => "Magnetometer",
            SensorKind::DeviceMotion => "Device Motion",
        }
    }
}

/// One sample delivered by a feed
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Sample {
    Acceleration(SensorReading),
    RotationRate(SensorReading),
    MagneticField(SensorReading),
    Attitude(Attitude),
}

impl Sample {
    /// The feed this sample belongs to
    pub fn kind(&self) -> SensorKind {
        match self {
            Sample::Acceleration(_) => SensorKind::Accelerometer,
            Sample::RotationRate(_) => SensorKind::Gyroscope,
            Sample::MagneticField(_) => SensorKind::Magnetometer,
            Sample::Attitude(_) => SensorKind::DeviceMotion,
        }
    }
}

/// Fixed hardware support plus live data-flow state.
///
/// `active` implies `available`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SensorAvailability {
    pub available: bool,
    pub active: bool,
}

impl SensorAvailability {
    pub fn status(&self) -> SensorStatus {
        match (self.available, self.active) {
            (false, _) => SensorStatus::Unavailable,
            (true, false) => SensorStatus::Available,
            (true, true) => SensorStatus::Active,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorStatus {
    Unavailable,
    Available,
    Active,
}

impl fmt::Display for SensorStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SensorStatus::Unavailable => f.write_str("Unavailable"),
            SensorStatus::Available => f.write_str("Available"),
            SensorStatus::Active => f.write_str("Active"),
        }
    }
}

/// Point-in-time copy of the sensor stream state
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SensorSnapshot {
    pub monitoring: bool,
    pub acceleration: SensorReading,
    pub rotation_rate: SensorReading,
    pub magnetic_field: SensorReading,
    pub attitude: Attitude,
    pub accelerometer: SensorAvailability,
    pub gyroscope: SensorAvailability,
    pub magnetometer: SensorAvailability,
    pub device_motion: SensorAvailability,
}

impl SensorSnapshot {
    /// Idle state for a device with the given hardware support
    pub fn idle(available: impl Fn(SensorKind) -> bool) -> Self {
        let mut snapshot = SensorSnapshot::default();
        for kind in SensorKind::ALL {
            snapshot.availability_mut(kind).available = available(kind);
        }
        snapshot
    }

    pub fn availability(&self, kind: SensorKind) -> SensorAvailability {
        match kind {
            SensorKind::Accelerometer => self.accelerometer,
            SensorKind::Gyroscope => self.gyroscope,
            SensorKind::Magnetometer => self.magnetometer,
            SensorKind::DeviceMotion => self.device_motion,
        }
    }

    pub(crate) fn availability_mut(&mut self, kind: SensorKind) -> &mut SensorAvailability {
        match kind {
            SensorKind::Accelerometer => &mut self.accelerometer,
            SensorKind::Gyroscope => &mut self.gyroscope,
            SensorKind::Magnetometer => &mut self.magnetometer,
            SensorKind::DeviceMotion => &mut self.device_motion,
        }
    }

    pub fn acceleration_magnitude(&self) -> f64 {
        self.acceleration.magnitude()
    }

    pub fn rotation_magnitude(&self) -> f64 {
        self.rotation_rate.magnitude()
    }

    pub fn magnetic_magnitude(&self) -> f64 {
        self.magnetic_field.magnitude()
    }

    /// Store a sample and mark its sensor active.
    ///
    /// Samples for unavailable sensors are dropped.
    pub(crate) fn apply(&mut self, sample: Sample) {
        let kind = sample.kind();
        if !self.availability(kind).available {
            return;
        }
        match sample {
            Sample::Acceleration(v) => self.acceleration = v,
            Sample::RotationRate(v) => self.rotation_rate = v,
            Sample::MagneticField(v) => self.magnetic_field = v,
            Sample::Attitude(a) => self.attitude = a,
        }
        self.availability_mut(kind).active = true;
    }

    /// Zero every reading and clear every active flag, keeping hardware availability
    pub(crate) fn clear(&mut self) {
        self.monitoring = false;
        self.acceleration = SensorReading::ZERO;
        self.rotation_rate = SensorReading::ZERO;
        self.magnetic_field = SensorReading::ZERO;
        self.attitude = Attitude::ZERO;
        for kind in SensorKind::ALL {
            self.availability_mut(kind).active = false;
        }
    }
}
