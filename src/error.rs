//! Centralized error handling for devprobe

use std::io;

use thiserror::Error;

/// Custom error type for devprobe operations
#[derive(Debug, Error)]
pub enum ProbeError {
    /// I/O errors (sysfs reads, scratch files)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    /// Parsing errors (invalid data format)
    #[error("Parse error: {0}")]
    Parse(String),
    /// Configuration errors
    #[error("Config error: {0}")]
    Config(String),
    /// Hardware detection errors
    #[error("Detection error: {0}")]
    Detection(String),
    /// Sensor subscription errors
    #[error("Sensor error: {0}")]
    Sensor(String),
    /// Rejected benchmark state transitions
    #[error(transparent)]
    Benchmark(#[from] BenchmarkError),
}

/// Benchmark state transitions that are refused rather than performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BenchmarkError {
    #[error("a benchmark run is already in progress")]
    AlreadyRunning,
    #[error("results cannot be reset while a benchmark is running")]
    Busy,
}

/// Type alias for Results in devprobe
pub type Result<T> = std::result::Result<T, ProbeError>;
