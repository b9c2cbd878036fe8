//! Action executor — typed dispatch to a registry of pluggable handlers.

use std::collections::HashMap;
use std::sync::Arc;

use givehub_domain::automation::{ActionDescriptor, ActionKind};
use givehub_domain::error::ActionError;

use crate::ports::ActionHandler;

/// Dispatches action descriptors to the handler registered for their type.
///
/// The executor owns only the routing table; the concrete side effects
/// live behind the [`ActionHandler`] port, injected at construction.
#[derive(Default)]
pub struct ActionExecutor {
    handlers: HashMap<ActionKind, Arc<dyn ActionHandler>>,
}

impl ActionExecutor {
    /// Create an executor with no handlers registered.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) the handler for an action type.
    pub fn register(&mut self, kind: ActionKind, handler: Arc<dyn ActionHandler>) {
        self.handlers.insert(kind, handler);
    }

    /// Whether a handler is registered for the given type.
    #[must_use]
    pub fn has_handler(&self, kind: ActionKind) -> bool {
        self.handlers.contains_key(&kind)
    }

    /// Execute a single action against the run's event context.
    ///
    /// # Errors
    ///
    /// Returns [`ActionError::UnknownActionType`] when no handler is
    /// registered for the action's type, or the handler's own failure.
    pub async fn execute(
        &self,
        action: &ActionDescriptor,
        event_data: &serde_json::Value,
    ) -> Result<serde_json::Value, ActionError> {
        let handler = self
            .handlers
            .get(&action.kind)
            .ok_or(ActionError::UnknownActionType(action.kind))?;
        tracing::debug!(action = %action.kind, "executing action");
        handler.call(&action.config, event_data).await
    }

    /// Execute an action pipeline sequentially, in declaration order.
    ///
    /// The output of the run is the output of the **last** action;
    /// intermediate outputs are discarded. A later action may depend on
    /// state an earlier one changed, so actions are never parallelized.
    ///
    /// # Errors
    ///
    /// Fails fast: the first failing action aborts the pipeline and the
    /// remaining actions are not invoked.
    pub async fn run_all(
        &self,
        actions: &[ActionDescriptor],
        event_data: &serde_json::Value,
    ) -> Result<serde_json::Value, ActionError> {
        let mut output = serde_json::Value::Null;
        for action in actions {
            output = self.execute(action, event_data).await?;
        }
        Ok(output)
    }
}

impl std::fmt::Debug for ActionExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActionExecutor")
            .field("handlers", &self.handlers.keys().collect::<Vec<_>>())
            .finish()
    }
}
