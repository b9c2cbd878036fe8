//! Action handler port — the seam where action side effects happen.
//!
//! One handler is registered per [`ActionKind`](givehub_domain::automation::ActionKind);
//! the HTTP call, email send, module invocation, or record write lives in
//! the handler, never in the scheduler core. The core's contract is only
//! that handlers are called with the right arguments, in order, fail-fast.

use std::future::Future;
use std::pin::Pin;

use givehub_domain::error::ActionError;

/// Future returned by a handler invocation.
///
/// Boxed (rather than an associated `impl Future`) so heterogeneous
/// handlers can live behind `dyn` in the executor's registry.
pub type ActionFuture<'a> =
    Pin<Box<dyn Future<Output = Result<serde_json::Value, ActionError>> + Send + 'a>>;

/// One pluggable side-effecting handler for a single action type.
pub trait ActionHandler: Send + Sync {
    /// Execute the action.
    ///
    /// `config` is the action's raw configuration, forwarded verbatim
    /// from the automation definition; `event_data` is the run's trigger
    /// context. Returns the action's output value.
    fn call<'a>(
        &'a self,
        config: &'a serde_json::Value,
        event_data: &'a serde_json::Value,
    ) -> ActionFuture<'a>;
}
