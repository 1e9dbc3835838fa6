//! Benchmark run lifecycle: start, progress, cancellation, reset.
//!
//! - One worker thread per run executes the stages strictly in sequence
//! - The worker is the only writer of scores and progress while running
//! - Every commit re-checks the run id under the state lock, so nothing from a
//!   cancelled run ever becomes visible

use std::panic::{self, AssertUnwindSafe};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use parking_lot::{Mutex, RwLock};
use tracing::{debug, info, warn};

use super::stages;
use crate::config::BenchmarkConfig;
use crate::data::{BenchmarkPhase, BenchmarkSnapshot, Stage};
use crate::error::{BenchmarkError, Result};

struct EngineState {
    /// Identifies the run allowed to commit; bumped on every run and cancel.
    run_id: u64,
    snapshot: BenchmarkSnapshot,
}

/// Explicitly owned benchmark runner. Idle → Running → Idle.
pub struct BenchmarkEngine {
    config: Arc<BenchmarkConfig>,
    state: Arc<RwLock<EngineState>>,
    cancel: Mutex<Arc<AtomicBool>>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl BenchmarkEngine {
    /// Workload sizes beyond `BenchmarkConfig::within_limits` are capped.
    pub fn new(config: BenchmarkConfig) -> Self {
        Self {
            config: Arc::new(config.within_limits()),
            state: Arc::new(RwLock::new(EngineState {
                run_id: 0,
                snapshot: BenchmarkSnapshot::default(),
            })),
            cancel: Mutex::new(Arc::new(AtomicBool::new(false))),
            worker: Mutex::new(None),
        }
    }

    pub fn config(&self) -> &BenchmarkConfig {
        &self.config
    }

    pub fn snapshot(&self) -> BenchmarkSnapshot {
        self.state.read().snapshot.clone()
    }

    pub fn is_running(&self) -> bool {
        self.state.read().snapshot.is_running()
    }

    /// Start a run in the background.
    ///
    /// Scores, progress and `has_results` are cleared immediately. Rejected with
    /// `AlreadyRunning` while another run is active. A run started right after
    /// `cancel()` waits for the cancelled worker to exit before its first stage.
    pub fn run(&self) -> Result<()> {
        let mut worker = self.worker.lock();

        let run_id = {
            let mut state = self.state.write();
            if state.snapshot.is_running() {
                return Err(BenchmarkError::AlreadyRunning.into());
            }
            state.run_id += 1;
            state.snapshot = BenchmarkSnapshot {
                phase: BenchmarkPhase::Running,
                ..BenchmarkSnapshot::default()
            };
            state.run_id
        };

        let cancel = Arc::new(AtomicBool::new(false));
        *self.cancel.lock() = Arc::clone(&cancel);

        let previous = worker.take();
        let config = Arc::clone(&self.config);
        let state = Arc::clone(&self.state);
        let scratch_file = config
            .scratch_dir()
            .join(format!("devprobe-bench-{}-{}.bin", std::process::id(), run_id));

        let spawned = thread::Builder::new()
            .name(format!("benchmark-{}", run_id))
            .spawn(move || {
                if let Some(previous) = previous {
                    let _ = previous.join();
                }
                run_guarded(run_id, &state, || {
                    run_stages(run_id, &config, &state, &cancel, scratch_file)
                });
            });

        match spawned {
            Ok(handle) => {
                *worker = Some(handle);
                debug!(run_id, "Benchmark started");
                Ok(())
            }
            Err(e) => {
                let mut state = self.state.write();
                state.run_id += 1;
                state.snapshot = BenchmarkSnapshot::default();
                Err(e.into())
            }
        }
    }

    /// Stop the active run at the next stage boundary and discard its results.
    ///
    /// The engine is Idle with no results and zero progress as soon as this returns.
    pub fn cancel(&self) {
        let mut state = self.state.write();
        if !state.snapshot.is_running() {
            return;
        }
        self.cancel.lock().store(true, Ordering::SeqCst);
        state.run_id += 1;
        state.snapshot = BenchmarkSnapshot::default();
        debug!("Benchmark cancelled");
    }

    /// Clear scores, progress and `has_results`. Rejected with `Busy` while running.
    pub fn reset(&self) -> Result<()> {
        let mut state = self.state.write();
        if state.snapshot.is_running() {
            return Err(BenchmarkError::Busy.into());
        }
        state.snapshot = BenchmarkSnapshot::default();
        Ok(())
    }

    /// Block until the background worker (if any) has exited
    pub fn wait(&self) {
        let handle = self.worker.lock().take();
        if let Some(handle) = handle {
            let _ = handle.join();
        }
    }
}

impl Drop for BenchmarkEngine {
    fn drop(&mut self) {
        self.cancel();
        self.wait();
    }
}

/// Run `body` and put the engine back to Idle if it panics.
///
/// Only the run that still owns the state is reset; a newer run is left alone.
fn run_guarded(run_id: u64, state: &RwLock<EngineState>, body: impl FnOnce()) {
    if panic::catch_unwind(AssertUnwindSafe(body)).is_err() {
        let mut state = state.write();
        if state.run_id == run_id {
            state.run_id += 1;
            state.snapshot = BenchmarkSnapshot::default();
        }
        warn!(run_id, "Benchmark worker failed, results discarded");
    }
}

fn run_stages(
    run_id: u64,
    config: &BenchmarkConfig,
    state: &RwLock<EngineState>,
    cancel: &AtomicBool,
    scratch_file: PathBuf,
) {
    for stage in Stage::ORDER {
        if cancel.load(Ordering::SeqCst) {
            debug!(run_id, ?stage, "Benchmark stopping before stage");
            return;
        }

        {
            let mut state = state.write();
            if state.run_id != run_id {
                return;
            }
            state.snapshot.stage = Some(stage);
        }

        let elapsed = stages::run_stage(stage, config, &scratch_file);
        let score = stages::score(elapsed);
        debug!(
            run_id,
            %stage,
            elapsed_ms = elapsed.as_secs_f64() * 1000.0,
            score,
            "Stage finished"
        );

        let mut state = state.write();
        if state.run_id != run_id || cancel.load(Ordering::SeqCst) {
            // Cancelled mid-stage: the timing is thrown away
            return;
        }
        state.snapshot.result.set_score(stage, score);
        state.snapshot.progress = stage.checkpoint();
    }

    let mut state = state.write();
    if state.run_id != run_id {
        return;
    }
    state.snapshot.phase = BenchmarkPhase::Idle;
    state.snapshot.stage = None;
    state.snapshot.progress = 1.0;
    state.snapshot.has_results = true;
    info!(run_id, total = state.snapshot.result.total(), "Benchmark complete");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProbeError;
    use tempfile::tempdir;

    fn tiny_config(dir: &std::path::Path) -> BenchmarkConfig {
        BenchmarkConfig {
            arithmetic_iterations: 1_000,
            loop_iterations: 1_000,
            allocation_rounds: 10,
            allocation_len: 10,
            disk_bytes: 1_000,
            scratch_dir: Some(dir.to_string_lossy().into_owned()),
        }
    }

    #[test]
    fn test_completed_run_has_all_scores() {
        let dir = tempdir().unwrap();
        let engine = BenchmarkEngine::new(tiny_config(dir.path()));
        engine.run().unwrap();
        engine.wait();

        let snapshot = engine.snapshot();
        assert!(snapshot.has_results);
        assert_eq!(snapshot.phase, BenchmarkPhase::Idle);
        assert_eq!(snapshot.progress, 1.0);
        assert_eq!(snapshot.stage, None);
        let r = snapshot.result;
        assert_eq!(snapshot.total_score(), r.cpu + r.loop_ + r.memory + r.disk);
        assert!(r.cpu > 0 && r.loop_ > 0 && r.memory > 0 && r.disk > 0);
        // Scratch file removed
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_reset_while_running_is_rejected() {
        let dir = tempdir().unwrap();
        let engine = BenchmarkEngine::new(BenchmarkConfig {
            arithmetic_iterations: 20_000_000,
            ..tiny_config(dir.path())
        });
        engine.run().unwrap();

        assert!(matches!(engine.reset(), Err(ProbeError::Benchmark(BenchmarkError::Busy))));
        assert!(matches!(
            engine.run(),
            Err(ProbeError::Benchmark(BenchmarkError::AlreadyRunning))
        ));
        engine.cancel();
        assert!(!engine.is_running());
    }

    #[test]
    fn test_panicking_worker_returns_engine_to_idle() {
        let state = RwLock::new(EngineState {
            run_id: 3,
            snapshot: BenchmarkSnapshot {
                phase: BenchmarkPhase::Running,
                progress: 0.75,
                ..Default::default()
            },
        });

        run_guarded(3, &state, || panic!("stage failed"));

        let state = state.read();
        assert_eq!(state.snapshot, BenchmarkSnapshot::default());
        assert!(!state.snapshot.is_running());
        assert_ne!(state.run_id, 3);
    }

    #[test]
    fn test_panic_from_stale_run_leaves_newer_run_alone() {
        let running = BenchmarkSnapshot {
            phase: BenchmarkPhase::Running,
            progress: 0.25,
            ..Default::default()
        };
        let state = RwLock::new(EngineState {
            run_id: 5,
            snapshot: running.clone(),
        });

        run_guarded(4, &state, || panic!("old worker failed"));

        assert_eq!(state.read().snapshot, running);
        assert_eq!(state.read().run_id, 5);
    }

    #[test]
    fn test_oversized_workloads_are_capped() {
        let dir = tempdir().unwrap();
        let engine = BenchmarkEngine::new(BenchmarkConfig {
            disk_bytes: usize::MAX,
            allocation_rounds: usize::MAX,
            allocation_len: usize::MAX,
            ..tiny_config(dir.path())
        });

        let config = engine.config();
        assert!(config.disk_bytes <= crate::config::MAX_DISK_BYTES);
        assert!(
            config.allocation_rounds.saturating_mul(config.allocation_len)
                <= crate::config::MAX_ALLOCATED_INTS
        );
    }

    #[test]
    fn test_cancel_when_idle_is_noop() {
        let dir = tempdir().unwrap();
        let engine = BenchmarkEngine::new(tiny_config(dir.path()));
        engine.run().unwrap();
        engine.wait();
        engine.cancel();
        assert!(engine.snapshot().has_results);
    }
}
