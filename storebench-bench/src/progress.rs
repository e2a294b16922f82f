//! Benchmark progress reporting.

use crate::harness::{BenchmarkResult, HarnessState};

/// Trait for receiving harness progress updates.
pub trait BenchProgress {
    /// Called on every harness state transition.
    fn on_state(&self, state: &HarnessState);

    /// Called after each timed call is recorded.
    fn on_result(&self, result: &BenchmarkResult);

    /// Called when a run finishes or aborts.
    fn on_complete(&self, message: &str);
}

/// A no-op progress reporter that discards all updates.
pub struct SilentProgress;

impl BenchProgress for SilentProgress {
    fn on_state(&self, _state: &HarnessState) {}
    fn on_result(&self, _result: &BenchmarkResult) {}
    fn on_complete(&self, _message: &str) {}
}

/// A progress reporter that logs to the `log` crate.
pub struct LogProgress;

impl BenchProgress for LogProgress {
    fn on_state(&self, state: &HarnessState) {
        log::debug!("{}", state);
    }

    fn on_result(&self, result: &BenchmarkResult) {
        log::info!(
            "  {:<10} {:<8} {:>6} rows  {:>10.3} ms",
            result.operation,
            result.layer,
            result.count,
            result.duration_ms
        );
    }

    fn on_complete(&self, message: &str) {
        log::info!("{}", message);
    }
}
