//! Spinner that follows the benchmark harness.

use std::time::Duration;

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use storebench_bench::{BenchProgress, BenchmarkResult, HarnessState};

/// Shows the current harness phase on a single spinner line.
///
/// Hidden when `quiet` is set; per-call results are logged at debug level
/// so they stay out of the way of the final table.
pub(crate) struct SpinnerProgress {
    pb: ProgressBar,
}

impl SpinnerProgress {
    pub(crate) fn new(quiet: bool) -> Self {
        let pb = ProgressBar::new_spinner();
        if quiet {
            pb.set_draw_target(ProgressDrawTarget::hidden());
        }
        if let Ok(style) = ProgressStyle::with_template("  {spinner:.cyan} {msg}") {
            pb.set_style(style.tick_chars("/-\\|"));
        }
        pb.enable_steady_tick(Duration::from_millis(100));
        Self { pb }
    }
}

impl BenchProgress for SpinnerProgress {
    fn on_state(&self, state: &HarnessState) {
        self.pb.set_message(state.to_string());
    }

    fn on_result(&self, result: &BenchmarkResult) {
        log::debug!(
            "{} on {}: {} rows in {:.3} ms",
            result.operation,
            result.layer,
            result.count,
            result.duration_ms
        );
    }

    fn on_complete(&self, _message: &str) {
        self.pb.disable_steady_tick();
        self.pb.finish_and_clear();
    }
}
