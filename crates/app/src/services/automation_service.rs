//! Automation service — use-cases for managing automations.
//!
//! The external admin surface drives automations through this service,
//! which keeps persistence and live timers coherent: activating a
//! schedule registers its timer, deactivating or deleting one stops it.

use std::sync::Arc;

use givehub_domain::automation::{Automation, AutomationKind};
use givehub_domain::error::{GiveHubError, NotFoundError};
use givehub_domain::id::AutomationId;
use givehub_domain::run_log::RunLog;
use givehub_domain::time::Timestamp;

use crate::ports::{AutomationRepository, RunLogStore};
use crate::scheduler::Scheduler;

/// Application service for automation CRUD and manual execution.
pub struct AutomationService<R, S> {
    repo: R,
    scheduler: Arc<Scheduler<R, S>>,
}

impl<R, S> AutomationService<R, S>
where
    R: AutomationRepository + Send + Sync + 'static,
    S: RunLogStore + Send + Sync + 'static,
{
    /// Create a new service backed by the given repository and scheduler.
    pub fn new(repo: R, scheduler: Arc<Scheduler<R, S>>) -> Self {
        Self { repo, scheduler }
    }

    /// Create a new automation after validating domain invariants.
    ///
    /// An active schedule automation gets its timer registered
    /// immediately.
    ///
    /// # Errors
    ///
    /// Returns [`GiveHubError::Validation`] if invariants fail, or a
    /// storage error propagated from the repository.
    #[tracing::instrument(skip(self, automation), fields(automation_name = %automation.name))]
    pub async fn create_automation(
        &self,
        automation: Automation,
    ) -> Result<Automation, GiveHubError> {
        automation.validate()?;
        let automation = self.repo.create(automation).await?;
        if automation.kind() == AutomationKind::Schedule {
            self.scheduler.schedule_automation(&automation);
        }
        Ok(automation)
    }

    /// Look up an automation by id, returning an error if not found.
    ///
    /// # Errors
    ///
    /// Returns [`GiveHubError::NotFound`] when no automation with `id`
    /// exists, or a storage error from the repository.
    #[tracing::instrument(skip(self))]
    pub async fn get_automation(&self, id: AutomationId) -> Result<Automation, GiveHubError> {
        self.repo.get_by_id(id).await?.ok_or_else(|| {
            NotFoundError {
                entity: "Automation",
                id: id.to_string(),
            }
            .into()
        })
    }

    /// List all automations.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn list_automations(&self) -> Result<Vec<Automation>, GiveHubError> {
        self.repo.get_all().await
    }

    /// List all active automations of one kind.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn list_active(&self, kind: AutomationKind) -> Result<Vec<Automation>, GiveHubError> {
        self.repo.load_active(kind).await
    }

    /// Update an existing automation and bring its timer in line.
    ///
    /// The old timer (if any) is stopped; an active schedule automation
    /// is re-registered with its current expression.
    ///
    /// # Errors
    ///
    /// Returns [`GiveHubError::Validation`] if invariants fail, or a
    /// storage error from the repository.
    #[tracing::instrument(skip(self, automation), fields(automation_id = %automation.id))]
    pub async fn update_automation(
        &self,
        automation: Automation,
    ) -> Result<Automation, GiveHubError> {
        automation.validate()?;
        let automation = self.repo.update(automation).await?;
        self.scheduler.stop(automation.id);
        if automation.is_active && automation.kind() == AutomationKind::Schedule {
            self.scheduler.schedule_automation(&automation);
        }
        Ok(automation)
    }

    /// Delete an automation, deregistering any live timer.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    #[tracing::instrument(skip(self))]
    pub async fn delete_automation(&self, id: AutomationId) -> Result<(), GiveHubError> {
        self.scheduler.stop(id);
        self.repo.delete(id).await
    }

    /// Execute an automation immediately with the given payload — the
    /// admin "run now".
    ///
    /// # Errors
    ///
    /// Returns [`GiveHubError::NotFound`] when the automation does not
    /// exist, or a storage error from recording the run.
    #[tracing::instrument(skip(self, payload))]
    pub async fn run_now(
        &self,
        id: AutomationId,
        payload: serde_json::Value,
    ) -> Result<RunLog, GiveHubError> {
        let automation = self.get_automation(id).await?;
        self.scheduler.execute_automation(automation, payload).await
    }

    /// The most recent runs of one automation, newest-first.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the log store.
    pub async fn recent_runs(
        &self,
        id: AutomationId,
        limit: usize,
    ) -> Result<Vec<RunLog>, GiveHubError> {
        self.scheduler.recent_runs(id, limit).await
    }

    /// Delete run logs older than `cutoff` — the hook the external
    /// retention policy drives.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the log store.
    #[tracing::instrument(skip(self))]
    pub async fn prune_logs(&self, cutoff: Timestamp) -> Result<u64, GiveHubError> {
        self.scheduler.prune_logs(cutoff).await
    }
}
