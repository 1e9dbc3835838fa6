//! Process memory and CPU usage sampling

use std::time::{Duration, Instant};

use crate::collectors::hardware;
use crate::data::{SystemLoad, NOT_AVAILABLE};
use crate::error::{ProbeError, Result};
use crate::utils::file::read_first_line;
use crate::utils::parsing::bytes_to_gib;

/// CPU usage from the process's CPU-time delta over wall-clock time.
#[derive(Debug)]
pub struct CpuUsageSampler {
    cores: usize,
    last: Option<(Duration, Instant)>,
}

impl CpuUsageSampler {
    pub fn new() -> Self {
        Self {
            cores: hardware::cpu_cores().unwrap_or(1),
            last: None,
        }
    }

    /// Percent of total CPU capacity used since the previous call.
    ///
    /// The first call only records a baseline and returns `None`.
    pub fn sample(&mut self) -> Option<f64> {
        let cpu = process_cpu_time().ok()?;
        let now = Instant::now();
        let previous = self.last.replace((cpu, now));

        let (last_cpu, last_wall) = previous?;
        let wall = now.duration_since(last_wall).as_secs_f64();
        if wall <= 0.0 {
            return None;
        }
        let busy = cpu.saturating_sub(last_cpu).as_secs_f64();
        Some(usage_percent(busy, wall, self.cores))
    }
}

impl Default for CpuUsageSampler {
    fn default() -> Self {
        Self::new()
    }
}

fn usage_percent(busy_secs: f64, wall_secs: f64, cores: usize) -> f64 {
    let capacity = wall_secs * cores.max(1) as f64;
    (busy_secs / capacity * 100.0).clamp(0.0, 100.0)
}

/// User + system CPU time consumed by this process
fn process_cpu_time() -> Result<Duration> {
    // SAFETY: getrusage fills a zeroed POD struct.
    unsafe {
        let mut usage: libc::rusage = std::mem::zeroed();
        if libc::getrusage(libc::RUSAGE_SELF, &mut usage) != 0 {
            return Err(ProbeError::from(std::io::Error::last_os_error()));
        }
        let to_duration = |tv: libc::timeval| {
            Duration::from_secs(tv.tv_sec as u64) + Duration::from_micros(tv.tv_usec as u64)
        };
        Ok(to_duration(usage.ru_utime) + to_duration(usage.ru_stime))
    }
}

/// Resident set size of this process in bytes (`/proc/self/statm`)
pub fn resident_memory() -> Result<u64> {
    let statm = read_first_line("/proc/self/statm")?;
    let pages: u64 = statm
        .split_whitespace()
        .nth(1)
        .and_then(|v| v.parse().ok())
        .ok_or_else(|| ProbeError::Parse(format!("Bad statm: {}", statm)))?;
    Ok(pages * hardware::page_size())
}

/// Memory used by this process, memory left, and CPU usage
pub fn collect_system_load(sampler: &mut CpuUsageSampler) -> SystemLoad {
    let used = resident_memory().ok();
    let total = hardware::read_physical_memory().ok();

    let format = |bytes: u64| format!("{:.2} GB", bytes_to_gib(bytes));
    let memory_used = used.map(format).unwrap_or_else(|| NOT_AVAILABLE.to_string());
    let memory_available = match (total, used) {
        (Some(total), Some(used)) => format(total.saturating_sub(used)),
        _ => NOT_AVAILABLE.to_string(),
    };

    SystemLoad {
        cpu_usage: sampler.sample(),
        memory_used,
        memory_available,
    }
}
