//! Benchmark scores and progress

use std::fmt;

/// One of the four sequential benchmark workloads
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    CpuArithmetic,
    CpuLoop,
    MemoryAllocation,
    DiskWrite,
}

impl Stage {
    /// Stages in execution order
    pub const ORDER: [Stage; 4] = [
        Stage::CpuArithmetic,
        Stage::CpuLoop,
        Stage::MemoryAllocation,
        Stage::DiskWrite,
    ];

    /// Progress reported once this stage finishes
    pub fn checkpoint(&self) -> f64 {
        match self {
            Stage::CpuArithmetic => 0.25,
            Stage::CpuLoop => 0.5,
            Stage::MemoryAllocation => 0.75,
            Stage::DiskWrite => 0.9,
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::CpuArithmetic => f.write_str("CPU - Arithmetic"),
            Stage::CpuLoop => f.write_str("CPU - Loop"),
            Stage::MemoryAllocation => f.write_str("Memory - Allocation"),
            Stage::DiskWrite => f.write_str("Disk - Write"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BenchmarkPhase {
    #[default]
    Idle,
    Running,
}

/// Per-stage scores; the total is always derived
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BenchmarkResult {
    pub cpu: u64,
    pub loop_: u64,
    pub memory: u64,
    pub disk: u64,
}

impl BenchmarkResult {
    pub fn total(&self) -> u64 {
        self.cpu + self.loop_ + self.memory + self.disk
    }

    pub fn score(&self, stage: Stage) -> u64 {
        match stage {
            Stage::CpuArithmetic => self.cpu,
            Stage::CpuLoop => self.loop_,
            Stage::MemoryAllocation => self.memory,
            Stage::DiskWrite => self.disk,
        }
    }

    pub(crate) fn set_score(&mut self, stage: Stage, score: u64) {
        match stage {
            Stage::CpuArithmetic => self.cpu = score,
            Stage::CpuLoop => self.loop_ = score,
            Stage::MemoryAllocation => self.memory = score,
            Stage::DiskWrite => self.disk = score,
        }
    }
}

/// Observable benchmark state
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BenchmarkSnapshot {
    pub phase: BenchmarkPhase,
    /// Fraction in `[0, 1]`; exactly `1.0` only together with `has_results`
    pub progress: f64,
    /// Stage currently executing, if any
    pub stage: Option<Stage>,
    pub result: BenchmarkResult,
    pub has_results: bool,
}

impl BenchmarkSnapshot {
    pub fn is_running(&self) -> bool {
        self.phase == BenchmarkPhase::Running
    }

    pub fn total_score(&self) -> u64 {
        self.result.total()
    }
}
