//! Live system load figures shown alongside benchmark results

/// Process memory and CPU usage at one instant
#[derive(Debug, Clone, PartialEq)]
pub struct SystemLoad {
    /// Percent of total CPU capacity used by this process since the previous sample
    pub cpu_usage: Option<f64>,
    pub memory_used: String,
    pub memory_available: String,
}
