//! Scheduler — boot registration, execution, and next-run bookkeeping.
//!
//! The scheduler loads every active schedule automation at startup and
//! registers a timer for each. A timer fire re-reads the automation by
//! id (so statistics accumulate across fires) and runs its action
//! pipeline. Trigger and webhook automations reuse the same execution
//! path with their event or request payload as trigger data.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError, Weak};
use std::time::Instant;

use givehub_domain::automation::{Automation, AutomationConfig, AutomationKind};
use givehub_domain::cron::CronExpression;
use givehub_domain::error::GiveHubError;
use givehub_domain::id::AutomationId;
use givehub_domain::run_log::{RunLog, RunStatus};
use givehub_domain::time::Timestamp;

use crate::action_executor::ActionExecutor;
use crate::ports::{AutomationRepository, RunLogStore};
use crate::run_logger::RunLogger;
use crate::schedule_registry::{FireCallback, ScheduleRegistry};

/// The scheduling core: registration, execution, statistics.
///
/// Conceptually each automation cycles through
/// Unregistered → Scheduled → Running → (Success | Failed) → Scheduled;
/// inactive automations never enter the cycle, and deactivating one
/// mid-cycle deregisters its timer.
pub struct Scheduler<R, S> {
    repo: R,
    logger: RunLogger<S>,
    executor: ActionExecutor,
    registry: ScheduleRegistry,
    /// Serializes concurrent runs of the *same* automation so its
    /// stats read-modify-write cannot lose an update. Runs of distinct
    /// automations stay concurrent.
    run_locks: Mutex<HashMap<AutomationId, Arc<tokio::sync::Mutex<()>>>>,
    /// Handed to fire callbacks as a weak reference so the registry's
    /// timers never keep the scheduler alive.
    self_ref: Weak<Self>,
}

impl<R, S> Scheduler<R, S>
where
    R: AutomationRepository + Send + Sync + 'static,
    S: RunLogStore + Send + Sync + 'static,
{
    /// Create a scheduler over the given collaborators.
    pub fn new(repo: R, log_store: S, executor: ActionExecutor) -> Arc<Self> {
        Arc::new_cyclic(|self_ref| Self {
            repo,
            logger: RunLogger::new(log_store),
            executor,
            registry: ScheduleRegistry::new(),
            run_locks: Mutex::new(HashMap::new()),
            self_ref: Weak::clone(self_ref),
        })
    }

    /// The registry of live timers.
    #[must_use]
    pub fn registry(&self) -> &ScheduleRegistry {
        &self.registry
    }

    /// Load all active schedule automations and register their timers.
    ///
    /// A failure to schedule one automation is logged and skipped; it
    /// never prevents the others from being registered.
    ///
    /// # Errors
    ///
    /// Returns a storage error when the initial load itself fails.
    pub async fn start(&self) -> Result<usize, GiveHubError> {
        let automations = self.repo.load_active(AutomationKind::Schedule).await?;
        let total = automations.len();
        let mut registered = 0_usize;
        for automation in automations {
            if self.schedule_automation(&automation) {
                registered += 1;
            }
        }
        tracing::info!(registered, total, "scheduler started");
        Ok(registered)
    }

    /// Register a live timer for a schedule automation.
    ///
    /// Anything unschedulable — wrong kind, inactive, invalid cron — is
    /// logged and skipped rather than treated as fatal. Returns whether
    /// a timer is now registered.
    pub fn schedule_automation(&self, automation: &Automation) -> bool {
        let id = automation.id;
        if !automation.is_active {
            tracing::debug!(%id, "automation is inactive, not scheduling");
            return false;
        }
        let AutomationConfig::Schedule {
            cron_expression, ..
        } = &automation.config
        else {
            tracing::warn!(%id, kind = %automation.kind(), "only schedule automations can be registered");
            return false;
        };

        let scheduler = Weak::clone(&self.self_ref);
        let on_fire: FireCallback = Arc::new(move || {
            let scheduler = Weak::clone(&scheduler);
            Box::pin(async move {
                // The scheduler outlives its timers in normal operation;
                // a fire after teardown is silently skipped.
                if let Some(scheduler) = scheduler.upgrade() {
                    scheduler.fire(id).await;
                }
            })
        });

        match self.registry.register(id, cron_expression, on_fire) {
            Ok(()) => {
                tracing::info!(%id, name = %automation.name, cron = %cron_expression, "schedule registered");
                true
            }
            Err(err) => {
                tracing::warn!(%id, name = %automation.name, error = %err, "skipping unschedulable automation");
                false
            }
        }
    }

    /// Timer-fire entry point. Re-reads the automation and executes it,
    /// catching every failure so nothing escapes into the timer loop.
    async fn fire(&self, id: AutomationId) {
        let automation = match self.repo.get_by_id(id).await {
            Ok(Some(automation)) if automation.is_active => automation,
            Ok(_) => {
                tracing::debug!(%id, "automation gone or inactive, skipping fire");
                return;
            }
            Err(err) => {
                tracing::error!(%id, error = %err, "failed to load automation for scheduled run");
                return;
            }
        };
        if let Err(err) = self
            .execute_automation(automation, serde_json::Value::Null)
            .await
        {
            tracing::error!(%id, error = %err, "scheduled run could not be recorded");
        }
    }

    /// Execute an automation's action pipeline once.
    ///
    /// Actions run sequentially and fail-fast; the run's output is the
    /// last action's output. Whatever the outcome, the run is folded
    /// into the automation's statistics and appended to the run log —
    /// success and failure alike — and `last_run`/`next_run` are
    /// persisted back through the repository.
    ///
    /// # Errors
    ///
    /// Returns a storage error when the run log or the automation update
    /// cannot be persisted. Action failures are not errors here: they
    /// yield an `error`-status [`RunLog`].
    pub async fn execute_automation(
        &self,
        mut automation: Automation,
        trigger_data: serde_json::Value,
    ) -> Result<RunLog, GiveHubError> {
        let lock = self.run_lock(automation.id);
        let _guard = lock.lock().await;

        let id = automation.id;
        let started_at = givehub_domain::time::now();
        let started = Instant::now();

        let outcome = self
            .executor
            .run_all(automation.actions(), &trigger_data)
            .await;
        let execution_time_ms =
            u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

        let (status, error, output, details) = match outcome {
            Ok(output) => (
                RunStatus::Success,
                None,
                output,
                format!("executed {} action(s)", automation.actions().len()),
            ),
            Err(err) => {
                tracing::warn!(%id, error = %err, "automation run failed");
                (
                    RunStatus::Error,
                    Some(err.to_string()),
                    serde_json::Value::Null,
                    "action pipeline aborted".to_string(),
                )
            }
        };
        let success = status == RunStatus::Success;

        RunLogger::<S>::update_stats(&mut automation, success, execution_time_ms, error.as_deref());

        let mut log = RunLog::builder()
            .automation_id(id)
            .status(status)
            .execution_time_ms(execution_time_ms)
            .details(details)
            .input(trigger_data)
            .output(output)
            .metadata(serde_json::json!({ "kind": automation.kind() }))
            .recorded_at(started_at);
        if let Some(message) = &error {
            log = log.error(message.clone());
        }
        let log = self.logger.record(log.build()).await?;

        automation.last_run = Some(givehub_domain::time::now());
        automation.next_run = Self::calculate_next_run(&automation);
        self.repo.update(automation).await?;

        Ok(log)
    }

    /// The next fire time after now, for schedule automations.
    ///
    /// Returns `None` for other kinds, and `None` (with a warning) for
    /// an invalid cron expression — this never propagates a failure.
    #[must_use]
    pub fn calculate_next_run(automation: &Automation) -> Option<Timestamp> {
        let AutomationConfig::Schedule {
            cron_expression, ..
        } = &automation.config
        else {
            return None;
        };
        match cron_expression.parse::<CronExpression>() {
            Ok(cron) => cron.next_after(&givehub_domain::time::now()),
            Err(err) => {
                tracing::warn!(id = %automation.id, error = %err, "cannot compute next run");
                None
            }
        }
    }

    /// The most recent runs of one automation, newest-first.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the log store.
    pub async fn recent_runs(
        &self,
        automation_id: AutomationId,
        limit: usize,
    ) -> Result<Vec<RunLog>, GiveHubError> {
        self.logger.recent(automation_id, limit).await
    }

    /// Delete run records older than `cutoff` (retention hook).
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the log store.
    pub async fn prune_logs(&self, cutoff: Timestamp) -> Result<u64, GiveHubError> {
        self.logger.prune_before(cutoff).await
    }

    /// Stop the live timer for one automation, if any.
    pub fn stop(&self, id: AutomationId) -> bool {
        self.registry.stop(id)
    }

    /// Stop every live timer. In-flight runs are not aborted — only the
    /// scheduling of future runs stops.
    pub fn shutdown(&self) {
        self.registry.stop_all();
        tracing::info!("scheduler shut down");
    }

    fn run_lock(&self, id: AutomationId) -> Arc<tokio::sync::Mutex<()>> {
        let mut locks = self
            .run_locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        Arc::clone(locks.entry(id).or_default())
    }
}

impl<R, S> std::fmt::Debug for Scheduler<R, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scheduler")
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}
