//! Run log store port — append-only persistence for execution records.

use std::future::Future;
use std::sync::Arc;

use givehub_domain::error::GiveHubError;
use givehub_domain::id::AutomationId;
use givehub_domain::run_log::RunLog;
use givehub_domain::time::Timestamp;

/// Store for persisting and querying [`RunLog`] entries.
///
/// Entries are append-only; the only removal path is the retention hook.
pub trait RunLogStore {
    /// Persist a new run log entry.
    fn append(&self, log: RunLog) -> impl Future<Output = Result<RunLog, GiveHubError>> + Send;

    /// Find the most recent entries for one automation, newest-first.
    fn find_by_automation(
        &self,
        automation_id: AutomationId,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<RunLog>, GiveHubError>> + Send;

    /// Delete entries recorded before `cutoff`, returning how many were
    /// removed. This is the hook the external retention policy drives.
    fn prune_older_than(
        &self,
        cutoff: Timestamp,
    ) -> impl Future<Output = Result<u64, GiveHubError>> + Send;
}

impl<T: RunLogStore + Send + Sync> RunLogStore for Arc<T> {
    fn append(&self, log: RunLog) -> impl Future<Output = Result<RunLog, GiveHubError>> + Send {
        (**self).append(log)
    }

    fn find_by_automation(
        &self,
        automation_id: AutomationId,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<RunLog>, GiveHubError>> + Send {
        (**self).find_by_automation(automation_id, limit)
    }

    fn prune_older_than(
        &self,
        cutoff: Timestamp,
    ) -> impl Future<Output = Result<u64, GiveHubError>> + Send {
        (**self).prune_older_than(cutoff)
    }
}
