//! Run logger — durable execution records and rolling statistics.

use givehub_domain::automation::Automation;
use givehub_domain::error::GiveHubError;
use givehub_domain::id::AutomationId;
use givehub_domain::run_log::RunLog;
use givehub_domain::time::Timestamp;

use crate::ports::RunLogStore;

/// Persists one [`RunLog`] per execution and maintains per-automation
/// statistics.
///
/// Recording is part of the scheduler's durability guarantee: a failure
/// to append is not swallowed — it surfaces as a storage error, logged
/// at a higher severity than ordinary action failures.
pub struct RunLogger<S> {
    store: S,
}

impl<S: RunLogStore> RunLogger<S> {
    /// Create a new logger backed by the given store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Append a run record.
    ///
    /// # Errors
    ///
    /// Propagates the store's failure; losing the ability to record runs
    /// undermines auditability, so callers must not ignore it.
    pub async fn record(&self, log: RunLog) -> Result<RunLog, GiveHubError> {
        let automation_id = log.automation_id;
        match self.store.append(log).await {
            Ok(log) => {
                tracing::debug!(%automation_id, status = %log.status, "run recorded");
                Ok(log)
            }
            Err(err) => {
                tracing::error!(%automation_id, error = %err, "failed to persist run log");
                Err(err)
            }
        }
    }

    /// Fold one run outcome into the automation's rolling statistics.
    ///
    /// On failure the error message becomes `stats.last_error`; on
    /// success the previous error message is left untouched.
    pub fn update_stats(
        automation: &mut Automation,
        success: bool,
        execution_time_ms: u64,
        error: Option<&str>,
    ) {
        if success {
            automation.stats.record_success(execution_time_ms);
        } else {
            automation
                .stats
                .record_failure(execution_time_ms, error.unwrap_or("unknown error"));
        }
    }

    /// The most recent runs of one automation, newest-first.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the store.
    pub async fn recent(
        &self,
        automation_id: AutomationId,
        limit: usize,
    ) -> Result<Vec<RunLog>, GiveHubError> {
        self.store.find_by_automation(automation_id, limit).await
    }

    /// Delete run records older than `cutoff` — the retention hook the
    /// external cleanup policy drives.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the store.
    pub async fn prune_before(&self, cutoff: Timestamp) -> Result<u64, GiveHubError> {
        let removed = self.store.prune_older_than(cutoff).await?;
        tracing::info!(removed, "pruned run logs");
        Ok(removed)
    }
}
