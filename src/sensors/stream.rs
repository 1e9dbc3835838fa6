//! Subscription lifecycle and the shared sensor snapshot

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use flume::{Receiver, Sender};
use parking_lot::RwLock;
use tracing::{debug, trace, warn};

use super::feed::{FeedMessage, FeedSink, MotionProvider, Subscription};
use crate::data::{SensorKind, SensorSnapshot};
use crate::error::Result;

/// Default sampling interval requested from every feed.
pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(100);

/// How long the dispatcher waits for a sample before re-checking shutdown.
const DISPATCH_POLL: Duration = Duration::from_millis(100);

struct StreamState {
    /// Monitoring session counter; samples from older sessions are discarded.
    generation: u64,
    snapshot: SensorSnapshot,
}

/// Owns the feed subscriptions and the snapshot they update.
///
/// Idle: no subscriptions, readings zeroed, nothing active.
/// Monitoring: one subscription per available sensor; a sensor turns active
/// when its first sample arrives.
pub struct SensorStream {
    provider: Arc<dyn MotionProvider>,
    interval: Duration,
    state: Arc<RwLock<StreamState>>,
    tx: Sender<FeedMessage>,
    subscriptions: Vec<(SensorKind, Box<dyn Subscription>)>,
    shutdown: Arc<AtomicBool>,
    dispatcher: Option<JoinHandle<()>>,
}

impl SensorStream {
    /// Create an idle stream. Hardware availability is queried once here.
    pub fn new(provider: Arc<dyn MotionProvider>, interval: Duration) -> Result<Self> {
        let snapshot = SensorSnapshot::idle(|kind| provider.is_available(kind));
        debug!(
            accelerometer = snapshot.accelerometer.available,
            gyroscope = snapshot.gyroscope.available,
            magnetometer = snapshot.magnetometer.available,
            device_motion = snapshot.device_motion.available,
            "Sensor availability"
        );

        let state = Arc::new(RwLock::new(StreamState {
            generation: 0,
            snapshot,
        }));
        let (tx, rx) = flume::unbounded();
        let shutdown = Arc::new(AtomicBool::new(false));

        let dispatcher = {
            let state = Arc::clone(&state);
            let shutdown = Arc::clone(&shutdown);
            thread::Builder::new()
                .name("sensor-dispatch".to_string())
                .spawn(move || dispatch_loop(rx, state, shutdown))?
        };

        Ok(Self {
            provider,
            interval,
            state,
            tx,
            subscriptions: Vec::new(),
            shutdown,
            dispatcher: Some(dispatcher),
        })
    }

    pub fn is_monitoring(&self) -> bool {
        self.state.read().snapshot.monitoring
    }

    /// Copy of the current readings and flags
    pub fn snapshot(&self) -> SensorSnapshot {
        self.state.read().snapshot.clone()
    }

    /// Subscribe to every available sensor. No-op while already monitoring.
    pub fn start(&mut self) {
        let (generation, available) = {
            let mut state = self.state.write();
            if state.snapshot.monitoring {
                return;
            }
            state.generation += 1;
            state.snapshot.clear();
            state.snapshot.monitoring = true;
            let available: Vec<SensorKind> = SensorKind::ALL
                .into_iter()
                .filter(|kind| state.snapshot.availability(*kind).available)
                .collect();
            (state.generation, available)
        };

        for kind in available {
            let sink = FeedSink::new(kind, generation, self.tx.clone());
            match self.provider.subscribe(kind, self.interval, sink) {
                Ok(subscription) => self.subscriptions.push((kind, subscription)),
                Err(e) => warn!(?kind, error = %e, "Sensor subscription failed"),
            }
        }

        debug!(
            generation,
            feeds = self.subscriptions.len(),
            interval_ms = self.interval.as_millis() as u64,
            "Started sensor monitoring"
        );
    }

    /// Tear down every subscription and zero the snapshot.
    ///
    /// Readings go back to zero rather than keeping their last value.
    pub fn stop(&mut self) {
        {
            let mut state = self.state.write();
            state.generation += 1;
            state.snapshot.clear();
        }

        for (kind, mut subscription) in self.subscriptions.drain(..) {
            trace!(?kind, "Cancelling sensor feed");
            subscription.cancel();
        }

        debug!("Stopped sensor monitoring");
    }
}

impl Drop for SensorStream {
    fn drop(&mut self) {
        self.stop();
        self.shutdown.store(true, Ordering::SeqCst);
        if let Some(handle) = self.dispatcher.take() {
            let _ = handle.join();
        }
    }
}

/// Single writer for the snapshot: applies samples in arrival order.
fn dispatch_loop(
    rx: Receiver<FeedMessage>,
    state: Arc<RwLock<StreamState>>,
    shutdown: Arc<AtomicBool>,
) {
    debug!("Sensor dispatcher started");

    loop {
        if shutdown.load(Ordering::Relaxed) {
            break;
        }

        match rx.recv_timeout(DISPATCH_POLL) {
            Ok(message) => {
                let mut state = state.write();
                if state.generation != message.generation || !state.snapshot.monitoring {
                    trace!(generation = message.generation, "Discarding stale sample");
                    continue;
                }
                state.snapshot.apply(message.sample);
            }
            Err(flume::RecvTimeoutError::Timeout) => continue,
            Err(flume::RecvTimeoutError::Disconnected) => break,
        }
    }

    debug!("Sensor dispatcher stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Sample, SensorReading};
    use parking_lot::Mutex;
    use std::time::Instant;

    /// Provider that never lets go of its sinks, like a host API that keeps
    /// firing callbacks after being asked to stop.
    #[derive(Default)]
    struct LeakyProvider {
        sinks: Mutex<Vec<FeedSink>>,
    }

    struct NoopSubscription;

    impl Subscription for NoopSubscription {
        fn cancel(&mut self) {}
    }

    impl MotionProvider for LeakyProvider {
        fn is_available(&self, kind: SensorKind) -> bool {
            kind == SensorKind::Accelerometer
        }

        fn subscribe(
            &self,
            _kind: SensorKind,
            _interval: Duration,
            sink: FeedSink,
        ) -> Result<Box<dyn Subscription>> {
            self.sinks.lock().push(sink);
            Ok(Box::new(NoopSubscription))
        }
    }

    fn wait_until(mut cond: impl FnMut() -> bool) -> bool {
        let deadline = Instant::now() + Duration::from_secs(2);
        while Instant::now() < deadline {
            if cond() {
                return true;
            }
            thread::sleep(Duration::from_millis(5));
        }
        false
    }

    #[test]
    fn test_late_samples_after_stop_are_discarded() {
        let provider = Arc::new(LeakyProvider::default());
        let mut stream = SensorStream::new(provider.clone(), DEFAULT_INTERVAL).unwrap();

        stream.start();
        let sink = provider.sinks.lock()[0].clone();
        assert!(sink.deliver(Some(Sample::Acceleration(SensorReading::new(1.0, 0.0, 0.0)))));
        assert!(wait_until(|| stream.snapshot().accelerometer.active));

        stream.stop();
        sink.deliver(Some(Sample::Acceleration(SensorReading::new(9.0, 9.0, 9.0))));
        // Give the dispatcher time to see (and drop) the late sample
        thread::sleep(Duration::from_millis(50));

        let snapshot = stream.snapshot();
        assert_eq!(snapshot.acceleration, SensorReading::ZERO);
        assert!(!snapshot.accelerometer.active);
    }

    #[test]
    fn test_restart_ignores_previous_session() {
        let provider = Arc::new(LeakyProvider::default());
        let mut stream = SensorStream::new(provider.clone(), DEFAULT_INTERVAL).unwrap();

        stream.start();
        stream.stop();
        stream.start();

        let sinks = provider.sinks.lock().clone();
        assert_eq!(sinks.len(), 2);
        sinks[0].deliver(Some(Sample::Acceleration(SensorReading::new(5.0, 5.0, 5.0))));
        sinks[1].deliver(Some(Sample::Acceleration(SensorReading::new(0.0, 3.0, 4.0))));

        assert!(wait_until(|| stream.snapshot().acceleration_magnitude() == 5.0));
        assert_eq!(stream.snapshot().acceleration, SensorReading::new(0.0, 3.0, 4.0));
    }

    #[test]
    fn test_sink_reports_closed_stream() {
        let provider = Arc::new(LeakyProvider::default());
        let mut stream = SensorStream::new(provider.clone(), DEFAULT_INTERVAL).unwrap();
        stream.start();
        let sink = provider.sinks.lock()[0].clone();
        drop(stream);

        assert!(!sink.deliver(Some(Sample::Acceleration(SensorReading::ZERO))));
        assert!(!sink.deliver(None));
    }
}
