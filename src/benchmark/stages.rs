//! The four benchmark workloads and their scoring

use std::fs;
use std::hint::black_box;
use std::io;
use std::path::Path;
use std::time::{Duration, Instant};

use tracing::warn;

use crate::config::BenchmarkConfig;
use crate::data::Stage;

/// Shortest elapsed time a score is computed from.
pub const MIN_ELAPSED: Duration = Duration::from_micros(1);

/// Score for a stage finishing within `MIN_ELAPSED`.
pub const MAX_SCORE: u64 = 1_000_000_000;

/// `round(1000 / seconds)`, clamped so a zero duration scores `MAX_SCORE`
pub fn score(elapsed: Duration) -> u64 {
    let secs = elapsed.max(MIN_ELAPSED).as_secs_f64();
    ((1000.0 / secs).round() as u64).min(MAX_SCORE)
}

/// Square root times sine of the loop index, accumulated
pub fn cpu_arithmetic(iterations: u64) -> f64 {
    let mut acc = 0.0f64;
    for i in 0..iterations {
        let x = black_box(i) as f64;
        acc += x.sqrt() * x.sin();
    }
    black_box(acc)
}

/// Plain integer accumulation
pub fn cpu_loop(iterations: u64) -> u64 {
    let mut sum = 0u64;
    for i in 0..iterations {
        sum = sum.wrapping_add(black_box(i));
    }
    black_box(sum)
}

/// Allocate `rounds` vectors of `len` integers, then release them all
pub fn memory_allocation(rounds: usize, len: usize) -> usize {
    let mut arrays: Vec<Vec<i64>> = Vec::new();
    for _ in 0..rounds {
        arrays.push((0..len as i64).collect());
    }
    let held = black_box(&arrays).iter().map(Vec::len).sum();
    drop(arrays);
    held
}

/// Write `bytes` zeros to `path`, then delete the file
pub fn disk_write(path: &Path, bytes: usize) -> io::Result<()> {
    let write = fs::write(path, vec![0u8; bytes]);
    let remove = fs::remove_file(path);
    write?;
    remove
}

/// Run one stage and return how long it took.
///
/// Disk failures are logged; the stage is still timed and scored.
pub fn run_stage(stage: Stage, config: &BenchmarkConfig, scratch_file: &Path) -> Duration {
    let start = Instant::now();
    match stage {
        Stage::CpuArithmetic => {
            cpu_arithmetic(config.arithmetic_iterations);
        }
        Stage::CpuLoop => {
            cpu_loop(config.loop_iterations);
        }
        Stage::MemoryAllocation => {
            memory_allocation(config.allocation_rounds, config.allocation_len);
        }
        Stage::DiskWrite => {
            if let Err(e) = disk_write(scratch_file, config.disk_bytes) {
                warn!(path = %scratch_file.display(), error = %e, "Disk stage write failed");
            }
        }
    }
    start.elapsed()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_score_formula() {
        assert_eq!(score(Duration::from_secs(1)), 1000);
        assert_eq!(score(Duration::from_millis(250)), 4000);
        assert_eq!(score(Duration::from_secs(3)), 333);
        assert_eq!(score(Duration::from_millis(1500)), 667);
    }

    #[test]
    fn test_score_guards_zero_elapsed() {
        assert_eq!(score(Duration::ZERO), MAX_SCORE);
        assert_eq!(score(Duration::from_nanos(1)), MAX_SCORE);
    }

    #[test]
    fn test_cpu_loop_sums_indices() {
        assert_eq!(cpu_loop(10), 45);
        assert_eq!(cpu_loop(0), 0);
    }

    #[test]
    fn test_memory_allocation_counts_elements() {
        assert_eq!(memory_allocation(10, 100), 1000);
    }

    #[test]
    fn test_cpu_arithmetic_matches_direct_sum() {
        let expected: f64 = (0..100u64).map(|i| (i as f64).sqrt() * (i as f64).sin()).sum();
        assert!((cpu_arithmetic(100) - expected).abs() < 1e-9);
    }

    #[test]
    fn test_disk_write_cleans_up() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("scratch.bin");
        disk_write(&path, 4096).unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn test_disk_stage_tolerates_missing_dir() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing").join("scratch.bin");
        let config = BenchmarkConfig {
            disk_bytes: 16,
            ..Default::default()
        };
        assert!(disk_write(&path, 16).is_err());
        // Still timed, still scoreable
        let elapsed = run_stage(Stage::DiskWrite, &config, &path);
        assert!(score(elapsed) > 0);
    }
}
