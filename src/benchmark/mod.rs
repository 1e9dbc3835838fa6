//! Synthetic CPU, memory and disk micro-benchmarks run off the calling thread

pub mod engine;
pub mod stages;

pub use engine::BenchmarkEngine;
