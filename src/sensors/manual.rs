//! Caller-driven motion provider for tests and replaying recorded samples

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

use super::feed::{FeedSink, MotionProvider, Subscription};
use crate::data::{Sample, SensorKind};
use crate::error::{ProbeError, Result};

#[derive(Default)]
struct Inner {
    available: HashSet<SensorKind>,
    failing: HashSet<SensorKind>,
    live: HashMap<SensorKind, (u64, FeedSink)>,
    next_id: u64,
}

/// Provider whose samples are pushed by hand.
#[derive(Clone, Default)]
pub struct ManualProvider {
    inner: Arc<Mutex<Inner>>,
}

impl ManualProvider {
    pub fn new(available: &[SensorKind]) -> Self {
        let provider = Self::default();
        provider.inner.lock().available = available.iter().copied().collect();
        provider
    }

    /// Make future subscriptions for `kind` fail
    pub fn fail_subscriptions(&self, kind: SensorKind) {
        self.inner.lock().failing.insert(kind);
    }

    pub fn is_subscribed(&self, kind: SensorKind) -> bool {
        self.inner.lock().live.contains_key(&kind)
    }

    /// Deliver a sample to its live subscription.
    ///
    /// Returns `false` if nothing is subscribed to that sensor.
    pub fn push(&self, sample: Sample) -> bool {
        self.deliver(sample.kind(), Some(sample))
    }

    /// Deliver an empty tick (host callback without data)
    pub fn push_empty(&self, kind: SensorKind) -> bool {
        self.deliver(kind, None)
    }

    fn deliver(&self, kind: SensorKind, sample: Option<Sample>) -> bool {
        let sink = match self.inner.lock().live.get(&kind) {
            Some((_, sink)) => sink.clone(),
            None => return false,
        };
        sink.deliver(sample)
    }
}

impl MotionProvider for ManualProvider {
    fn is_available(&self, kind: SensorKind) -> bool {
        self.inner.lock().available.contains(&kind)
    }

    fn subscribe(
        &self,
        kind: SensorKind,
        _interval: Duration,
        sink: FeedSink,
    ) -> Result<Box<dyn Subscription>> {
        let mut inner = self.inner.lock();
        if inner.failing.contains(&kind) {
            return Err(ProbeError::Sensor(format!("{} subscription refused", kind.label())));
        }
        let id = inner.next_id;
        inner.next_id += 1;
        inner.live.insert(kind, (id, sink));

        Ok(Box::new(ManualSubscription {
            inner: Arc::clone(&self.inner),
            kind,
            id,
        }))
    }
}

struct ManualSubscription {
    inner: Arc<Mutex<Inner>>,
    kind: SensorKind,
    id: u64,
}

impl Subscription for ManualSubscription {
    fn cancel(&mut self) {
        let mut inner = self.inner.lock();
        if matches!(inner.live.get(&self.kind), Some((id, _)) if *id == self.id) {
            inner.live.remove(&self.kind);
        }
    }
}
