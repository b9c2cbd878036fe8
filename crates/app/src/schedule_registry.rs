//! Schedule registry — owns the live timer per schedule automation.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::task::JoinHandle;

use givehub_domain::cron::CronExpression;
use givehub_domain::error::ValidationError;
use givehub_domain::id::AutomationId;

/// Future returned by a fire callback.
pub type FireFuture = Pin<Box<dyn Future<Output = ()> + Send>>;

/// Callback invoked every time a registered timer fires.
///
/// The callback owns its own error handling; nothing may escape it into
/// the timer loop.
pub type FireCallback = Arc<dyn Fn() -> FireFuture + Send + Sync>;

struct Entry {
    expression: String,
    handle: JoinHandle<()>,
}

/// Mapping from automation id to its live scheduled-job handle.
///
/// The mapping is private state owned exclusively by this component;
/// callers interact only through `register`/`stop`/`stop_all`.
#[derive(Default)]
pub struct ScheduleRegistry {
    jobs: Mutex<HashMap<AutomationId, Entry>>,
}

impl ScheduleRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a timer for `id`, replacing any existing one.
    ///
    /// The cron expression is validated first; an invalid expression
    /// registers nothing. When an entry already exists for this id, its
    /// timer is stopped before the replacement starts, so an automation
    /// can never fire twice per tick.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidCron`] when the expression does
    /// not parse.
    pub fn register(
        &self,
        id: AutomationId,
        expression: &str,
        on_fire: FireCallback,
    ) -> Result<(), ValidationError> {
        let cron: CronExpression = expression.parse().map_err(ValidationError::InvalidCron)?;

        let mut jobs = self.lock();
        if let Some(previous) = jobs.remove(&id) {
            previous.handle.abort();
            tracing::debug!(%id, "replaced existing schedule timer");
        }
        let handle = tokio::spawn(run_timer(id, cron, on_fire));
        jobs.insert(
            id,
            Entry {
                expression: expression.to_string(),
                handle,
            },
        );
        Ok(())
    }

    /// Stop and remove the timer for `id`. No-op when absent.
    ///
    /// Returns whether a timer was actually stopped.
    pub fn stop(&self, id: AutomationId) -> bool {
        match self.lock().remove(&id) {
            Some(entry) => {
                entry.handle.abort();
                tracing::debug!(%id, "stopped schedule timer");
                true
            }
            None => false,
        }
    }

    /// Stop and clear every timer. Used at shutdown.
    pub fn stop_all(&self) {
        let mut jobs = self.lock();
        let stopped = jobs.len();
        for (_, entry) in jobs.drain() {
            entry.handle.abort();
        }
        tracing::debug!(stopped, "stopped all schedule timers");
    }

    /// Number of live timers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether no timers are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Whether a timer is registered for `id`.
    #[must_use]
    pub fn contains(&self, id: AutomationId) -> bool {
        self.lock().contains_key(&id)
    }

    /// The cron expression the timer for `id` currently runs on.
    #[must_use]
    pub fn expression(&self, id: AutomationId) -> Option<String> {
        self.lock().get(&id).map(|entry| entry.expression.clone())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<AutomationId, Entry>> {
        // A panic while holding the lock only loses timer bookkeeping;
        // recover the map rather than poisoning every later call.
        self.jobs.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for ScheduleRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScheduleRegistry")
            .field("jobs", &self.len())
            .finish()
    }
}

/// Sleep until each next fire time and invoke the callback.
async fn run_timer(id: AutomationId, cron: CronExpression, on_fire: FireCallback) {
    loop {
        let now = givehub_domain::time::now();
        let Some(next) = cron.next_after(&now) else {
            tracing::warn!(%id, "cron expression has no future fire time, stopping timer");
            break;
        };
        let wait = (next - now).to_std().unwrap_or_default();
        tokio::time::sleep(wait).await;
        on_fire().await;
    }
}
