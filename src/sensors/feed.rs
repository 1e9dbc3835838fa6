//! Provider-facing side of the sensor stream

use std::time::Duration;

use flume::Sender;
use tracing::{trace, warn};

use crate::data::{Sample, SensorKind};
use crate::error::Result;

/// A sample tagged with the monitoring session it was produced for.
#[derive(Debug, Clone, Copy)]
pub(crate) struct FeedMessage {
    pub generation: u64,
    pub sample: Sample,
}

/// Handle a provider uses to push samples for one sensor into the stream.
#[derive(Debug, Clone)]
pub struct FeedSink {
    kind: SensorKind,
    generation: u64,
    tx: Sender<FeedMessage>,
}

impl FeedSink {
    pub(crate) fn new(kind: SensorKind, generation: u64, tx: Sender<FeedMessage>) -> Self {
        Self { kind, generation, tx }
    }

    /// Deliver one tick of a feed.
    ///
    /// `None` means the host produced no data this tick; the stream keeps its
    /// last value. Returns `false` once the stream is gone and the feed should stop.
    pub fn deliver(&self, sample: Option<Sample>) -> bool {
        let Some(sample) = sample else {
            trace!(kind = ?self.kind, "Feed tick without data");
            return !self.tx.is_disconnected();
        };

        if sample.kind() != self.kind {
            warn!(expected = ?self.kind, got = ?sample.kind(), "Dropping sample for wrong sensor");
            return true;
        }

        self.tx
            .send(FeedMessage {
                generation: self.generation,
                sample,
            })
            .is_ok()
    }
}

/// A live feed registration.
pub trait Subscription: Send {
    /// Stop delivering samples
    fn cancel(&mut self);
}

/// Source of motion data, injected into `SensorStream`.
pub trait MotionProvider: Send + Sync {
    /// Fixed hardware support for a sensor
    fn is_available(&self, kind: SensorKind) -> bool;

    /// Start delivering samples for `kind` roughly every `interval`
    fn subscribe(
        &self,
        kind: SensorKind,
        interval: Duration,
        sink: FeedSink,
    ) -> Result<Box<dyn Subscription>>;
}
