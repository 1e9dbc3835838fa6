//! Live motion-sensor streaming.
//!
//! - Providers turn a host sensor API into per-sensor feeds
//! - Every feed writes into one channel drained by a single dispatcher thread
//! - The dispatcher applies samples to one authoritative snapshot
//! - Callers poll `SensorStream::snapshot()`

pub mod feed;
pub mod iio;
pub mod manual;
pub mod stream;

pub use feed::{FeedSink, MotionProvider, Subscription};
pub use iio::IioProvider;
pub use manual::ManualProvider;
pub use stream::{SensorStream, DEFAULT_INTERVAL};
