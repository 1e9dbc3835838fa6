//! Linux industrial-I/O (IIO) sysfs sensors
//!
//! Devices live under `/sys/bus/iio/devices/iio:deviceN` and expose channels as
//! `in_<type>_<axis>_raw` with a shared or per-axis `_scale` and `_offset`.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use tracing::{debug, trace};

use super::feed::{FeedSink, MotionProvider, Subscription};
use crate::data::{Attitude, Sample, SensorKind, SensorReading};
use crate::error::{ProbeError, Result};
use crate::utils::file::{list_dir, read_f64};

pub const IIO_ROOT: &str = "/sys/bus/iio/devices";

/// Channel type prefix for each motion feed.
/// Device motion maps to inclinometer channels (x/y/z = roll/pitch/yaw).
fn channel_type(kind: SensorKind) -> &'static str {
    match kind {
        SensorKind::Accelerometer => "accel",
        SensorKind::Gyroscope => "anglvel",
        SensorKind::Magnetometer => "magn",
        SensorKind::DeviceMotion => "incli",
    }
}

/// First device directory exposing an `x` axis for the channel type
pub fn find_vector_device(root: &Path, channel: &str) -> Option<PathBuf> {
    let raw = format!("in_{}_x_raw", channel);
    let mut devices = list_dir(root);
    devices.sort();
    devices.into_iter().find(|dev| dev.join(&raw).exists())
}

/// Whether any device exposes a channel whose attributes start with `in_<channel>`
pub fn has_channel(root: &Path, channel: &str) -> bool {
    let prefix = format!("in_{}", channel);
    list_dir(root).iter().any(|dev| {
        list_dir(dev).iter().any(|attr| {
            attr.file_name()
                .and_then(|n| n.to_str())
                .map(|name| name.starts_with(&prefix))
                .unwrap_or(false)
        })
    })
}

/// `(raw + offset) * scale` for one axis
fn read_axis(device: &Path, channel: &str, axis: char) -> Result<f64> {
    let raw = read_f64(device.join(format!("in_{}_{}_raw", channel, axis)))?;
    let scale = read_f64(device.join(format!("in_{}_{}_scale", channel, axis)))
        .or_else(|_| read_f64(device.join(format!("in_{}_scale", channel))))
        .unwrap_or(1.0);
    let offset = read_f64(device.join(format!("in_{}_{}_offset", channel, axis)))
        .or_else(|_| read_f64(device.join(format!("in_{}_offset", channel))))
        .unwrap_or(0.0);
    Ok((raw + offset) * scale)
}

pub fn read_vector(device: &Path, channel: &str) -> Result<SensorReading> {
    Ok(SensorReading::new(
        read_axis(device, channel, 'x')?,
        read_axis(device, channel, 'y')?,
        read_axis(device, channel, 'z')?,
    ))
}

fn read_sample(device: &Path, kind: SensorKind) -> Result<Sample> {
    let v = read_vector(device, channel_type(kind))?;
    Ok(match kind {
        SensorKind::Accelerometer => Sample::Acceleration(v),
        SensorKind::Gyroscope => Sample::RotationRate(v),
        SensorKind::Magnetometer => Sample::MagneticField(v),
        SensorKind::DeviceMotion => Sample::Attitude(Attitude {
            roll: v.x,
            pitch: v.y,
            yaw: v.z,
        }),
    })
}

/// Motion provider polling IIO sysfs attributes on one thread per feed.
#[derive(Debug, Clone)]
pub struct IioProvider {
    devices: [Option<PathBuf>; 4],
}

impl IioProvider {
    pub fn new() -> Self {
        Self::with_root(Path::new(IIO_ROOT))
    }

    pub fn with_root(root: &Path) -> Self {
        let devices = SensorKind::ALL.map(|kind| find_vector_device(root, channel_type(kind)));
        debug!(root = %root.display(), ?devices, "Scanned IIO devices");
        Self { devices }
    }

    fn device(&self, kind: SensorKind) -> Option<&PathBuf> {
        let index = SensorKind::ALL.iter().position(|k| *k == kind)?;
        self.devices[index].as_ref()
    }
}

impl Default for IioProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MotionProvider for IioProvider {
    fn is_available(&self, kind: SensorKind) -> bool {
        self.device(kind).is_some()
    }

    fn subscribe(
        &self,
        kind: SensorKind,
        interval: Duration,
        sink: FeedSink,
    ) -> Result<Box<dyn Subscription>> {
        let device = self
            .device(kind)
            .cloned()
            .ok_or_else(|| ProbeError::Sensor(format!("{} not present", kind.label())))?;

        let stop = Arc::new(AtomicBool::new(false));
        let handle = {
            let stop = Arc::clone(&stop);
            thread::Builder::new()
                .name(format!("iio-{}", channel_type(kind)))
                .spawn(move || poll_loop(device, kind, interval, sink, stop))?
        };

        Ok(Box::new(IioSubscription {
            stop,
            handle: Some(handle),
        }))
    }
}

fn poll_loop(
    device: PathBuf,
    kind: SensorKind,
    interval: Duration,
    sink: FeedSink,
    stop: Arc<AtomicBool>,
) {
    debug!(?kind, device = %device.display(), "IIO feed started");

    while !stop.load(Ordering::Relaxed) {
        let tick = Instant::now();
        let sample = match read_sample(&device, kind) {
            Ok(sample) => Some(sample),
            Err(e) => {
                trace!(?kind, error = %e, "IIO read failed");
                None
            }
        };
        if !sink.deliver(sample) {
            break;
        }
        if let Some(remaining) = interval.checked_sub(tick.elapsed()) {
            thread::sleep(remaining);
        }
    }

    debug!(?kind, "IIO feed stopped");
}

struct IioSubscription {
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl Subscription for IioSubscription {
    fn cancel(&mut self) {
        self.stop.store(true, Ordering::SeqCst);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for IioSubscription {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn write_attr(dir: &Path, name: &str, value: &str) {
        fs::write(dir.join(name), format!("{}\n", value)).unwrap();
    }

    #[test]
    fn test_scaled_vector() {
        let root = tempdir().unwrap();
        let dev = root.path().join("iio:device0");
        fs::create_dir_all(&dev).unwrap();
        write_attr(&dev, "in_accel_x_raw", "100");
        write_attr(&dev, "in_accel_y_raw", "-200");
        write_attr(&dev, "in_accel_z_raw", "0");
        write_attr(&dev, "in_accel_scale", "0.01");
        write_attr(&dev, "in_accel_z_offset", "50");

        let v = read_vector(&dev, "accel").unwrap();
        assert!((v.x - 1.0).abs() < 1e-9);
        assert!((v.y + 2.0).abs() < 1e-9);
        assert!((v.z - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_provider_availability_from_channels() {
        let root = tempdir().unwrap();
        let accel = root.path().join("iio:device0");
        let baro = root.path().join("iio:device1");
        fs::create_dir_all(&accel).unwrap();
        fs::create_dir_all(&baro).unwrap();
        write_attr(&accel, "in_accel_x_raw", "1");
        write_attr(&baro, "in_pressure_input", "101.3");

        let provider = IioProvider::with_root(root.path());
        assert!(provider.is_available(SensorKind::Accelerometer));
        assert!(!provider.is_available(SensorKind::Gyroscope));
        assert!(has_channel(root.path(), "pressure"));
        assert!(!has_channel(root.path(), "proximity"));
    }
}
