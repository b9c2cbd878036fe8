//! Event bus port — publish named system events to subscribers.

use std::future::Future;
use std::sync::Arc;

use givehub_domain::error::GiveHubError;
use givehub_domain::event::Event;

/// Publishes system events to interested subscribers.
///
/// Injected explicitly wherever events are emitted; there is no global
/// emitter.
pub trait EventPublisher {
    /// Publish an event to all current subscribers.
    fn publish(&self, event: Event) -> impl Future<Output = Result<(), GiveHubError>> + Send;
}

impl<T: EventPublisher + Send + Sync> EventPublisher for Arc<T> {
    fn publish(&self, event: Event) -> impl Future<Output = Result<(), GiveHubError>> + Send {
        (**self).publish(event)
    }
}
