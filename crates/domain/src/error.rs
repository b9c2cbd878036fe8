//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into
//! [`GiveHubError`] via `#[from]`. Adapters wrap their infrastructure
//! errors into the [`GiveHubError::Storage`] variant.

use crate::automation::ActionKind;
use crate::cron::CronError;

/// Top-level error type shared by the application layer and adapters.
#[derive(Debug, thiserror::Error)]
pub enum GiveHubError {
    /// A domain invariant was violated.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A requested record does not exist.
    #[error(transparent)]
    NotFound(#[from] NotFoundError),

    /// An action handler failed or was not registered.
    #[error(transparent)]
    Action(#[from] ActionError),

    /// The persistence layer failed. Losing the ability to record runs
    /// undermines auditability, so callers log this at a higher severity
    /// than ordinary action failures.
    #[error("storage error")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Domain invariant violations, surfaced before persistence.
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    /// The automation name is empty.
    #[error("automation name must not be empty")]
    EmptyName,

    /// The automation declares no actions to run.
    #[error("automation must declare at least one action")]
    NoActions,

    /// The automation was built without a config.
    #[error("automation requires a config matching its type")]
    MissingConfig,

    /// A trigger automation names no event to listen for.
    #[error("trigger automation must name a non-empty event")]
    EmptyEvent,

    /// A webhook automation has no endpoint.
    #[error("webhook automation must declare a non-empty endpoint")]
    EmptyEndpoint,

    /// The schedule's cron expression does not parse.
    #[error("invalid cron expression")]
    InvalidCron(#[from] CronError),
}

/// A lookup failed to find the named record.
#[derive(Debug, thiserror::Error)]
#[error("{entity} not found: {id}")]
pub struct NotFoundError {
    /// Human-readable record kind, e.g. `"Automation"`.
    pub entity: &'static str,
    /// The identifier that was looked up.
    pub id: String,
}

/// Failures raised while executing a single action.
#[derive(Debug, thiserror::Error)]
pub enum ActionError {
    /// No handler is registered for this action type.
    #[error("no handler registered for action type `{0}`")]
    UnknownActionType(ActionKind),

    /// The handler ran and reported a failure.
    #[error("{kind} action failed: {message}")]
    Handler {
        /// Which action type failed.
        kind: ActionKind,
        /// The handler's failure message.
        message: String,
    },
}

impl ActionError {
    /// Build a handler failure from any displayable cause.
    pub fn handler(kind: ActionKind, cause: impl std::fmt::Display) -> Self {
        Self::Handler {
            kind,
            message: cause.to_string(),
        }
    }
}
