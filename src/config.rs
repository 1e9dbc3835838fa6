use serde::Deserialize;
use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
    time::Duration,
};
use dirs::config_dir;

use crate::error::{ProbeError, Result};

#[derive(Deserialize, Debug, Default)]
#[serde(default)]
pub struct Config {
    pub display: DisplayConfig,
    /// Named colors (hex like `#88c0d0` or ANSI names) referenced by `display`
    pub colors: HashMap<String, String>,
    pub sensors: SensorConfig,
    pub benchmark: BenchmarkConfig,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct DisplayConfig {
    pub separator: String,
    pub key_color: Option<String>,
    pub value_color: Option<String>,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            separator: ": ".to_string(),
            key_color: Some("cyan".to_string()),
            value_color: None,
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct SensorConfig {
    pub interval_ms: u64,
    /// How long the `sensors` mode monitors before stopping
    pub duration_secs: u64,
}

impl SensorConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms.max(1))
    }
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            interval_ms: 100,
            duration_secs: 5,
        }
    }
}

/// Largest arithmetic or integer-loop iteration count a run will use.
pub const MAX_ITERATIONS: u64 = 10_000_000_000;

/// Largest number of integers the allocation stage holds at once.
pub const MAX_ALLOCATED_INTS: usize = 16_000_000;

/// Largest scratch file the disk stage writes (256 MiB).
pub const MAX_DISK_BYTES: usize = 1 << 28;

/// Workload sizes for the benchmark stages
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct BenchmarkConfig {
    pub arithmetic_iterations: u64,
    pub loop_iterations: u64,
    pub allocation_rounds: usize,
    pub allocation_len: usize,
    pub disk_bytes: usize,
    /// Directory for the disk stage's scratch file; `~` is expanded
    pub scratch_dir: Option<String>,
}

impl BenchmarkConfig {
    pub fn scratch_dir(&self) -> PathBuf {
        match self.scratch_dir.as_deref().map(str::trim).filter(|p| !p.is_empty()) {
            Some(dir) => PathBuf::from(shellexpand::tilde(dir).to_string()),
            None => std::env::temp_dir(),
        }
    }

    /// Cap workload sizes so a stage can neither overflow an allocation nor run for days
    pub fn within_limits(mut self) -> Self {
        let original = self.clone();

        self.arithmetic_iterations = self.arithmetic_iterations.min(MAX_ITERATIONS);
        self.loop_iterations = self.loop_iterations.min(MAX_ITERATIONS);
        self.allocation_rounds = self.allocation_rounds.min(MAX_ALLOCATED_INTS);
        self.allocation_len = self
            .allocation_len
            .min(MAX_ALLOCATED_INTS / self.allocation_rounds.max(1));
        self.disk_bytes = self.disk_bytes.min(MAX_DISK_BYTES);

        if self != original {
            tracing::warn!(?original, capped = ?self, "Benchmark workload capped");
        }
        self
    }
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        Self {
            arithmetic_iterations: 1_000_000,
            loop_iterations: 10_000_000,
            allocation_rounds: 1000,
            allocation_len: 1000,
            disk_bytes: 1_000_000,
            scratch_dir: None,
        }
    }
}

pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|p| p.join("devprobe/config.toml"))
}

pub fn parse_config(data: &str) -> Result<Config> {
    toml::de::from_str(data).map_err(|e| ProbeError::Config(e.to_string()))
}

/// Load the user config, falling back to defaults when none exists
pub fn load_config() -> Result<Config> {
    match config_path() {
        Some(path) => load_config_from(&path),
        None => Ok(Config::default()),
    }
}

/// Load a config file; a missing file yields defaults
pub fn load_config_from(path: &Path) -> Result<Config> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "No config file, using defaults");
        return Ok(Config::default());
    }

    let config_data = fs::read_to_string(path)?;
    let config = parse_config(&config_data).map_err(|e| match e {
        ProbeError::Config(msg) => ProbeError::Config(format!("{}: {}", path.display(), msg)),
        other => other,
    })?;
    tracing::debug!(path = %path.display(), "Loaded config");
    Ok(config)
}
