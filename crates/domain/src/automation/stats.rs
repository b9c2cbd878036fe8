//! Rolling execution statistics, updated after every run.

use serde::{Deserialize, Serialize};

/// Per-automation run counters and timing.
///
/// Counters are monotonic; they are reset only through explicit
/// administrative action outside this core. The average execution time
/// is maintained as an incremental running mean so each update stays
/// O(1) regardless of history length.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RunStats {
    /// Total number of recorded runs.
    pub total_runs: u64,
    /// Runs that completed every action.
    pub successful_runs: u64,
    /// Runs aborted by a failing action.
    pub failed_runs: u64,
    /// Message of the most recent failure. A later success does not
    /// clear it; it is a diagnostic breadcrumb, not current status.
    pub last_error: Option<String>,
    /// Running mean of execution time in milliseconds.
    pub average_execution_time: f64,
}

impl RunStats {
    /// Record a successful run.
    pub fn record_success(&mut self, execution_time_ms: u64) {
        self.roll_average(execution_time_ms);
        self.successful_runs += 1;
    }

    /// Record a failed run, remembering its error message.
    pub fn record_failure(&mut self, execution_time_ms: u64, message: impl Into<String>) {
        self.roll_average(execution_time_ms);
        self.failed_runs += 1;
        self.last_error = Some(message.into());
    }

    /// `avg' = (avg * (n-1) + t) / n` — computed from the previous
    /// average and count, never by replaying history.
    #[allow(clippy::cast_precision_loss)]
    fn roll_average(&mut self, execution_time_ms: u64) {
        self.total_runs += 1;
        let n = self.total_runs as f64;
        self.average_execution_time =
            (self.average_execution_time * (n - 1.0) + execution_time_ms as f64) / n;
    }
}
