//! Automation repository port — persistence for automation definitions.

use std::future::Future;
use std::sync::Arc;

use givehub_domain::automation::{Automation, AutomationKind};
use givehub_domain::error::GiveHubError;
use givehub_domain::id::AutomationId;

/// Repository for persisting and querying [`Automation`]s.
///
/// The store must serialize updates to a single automation's row; no
/// cross-automation locking is expected of it.
pub trait AutomationRepository {
    /// Create a new automation in storage.
    fn create(
        &self,
        automation: Automation,
    ) -> impl Future<Output = Result<Automation, GiveHubError>> + Send;

    /// Get an automation by its unique identifier.
    fn get_by_id(
        &self,
        id: AutomationId,
    ) -> impl Future<Output = Result<Option<Automation>, GiveHubError>> + Send;

    /// Get all automations.
    fn get_all(&self) -> impl Future<Output = Result<Vec<Automation>, GiveHubError>> + Send;

    /// Get all active automations of the given kind.
    fn load_active(
        &self,
        kind: AutomationKind,
    ) -> impl Future<Output = Result<Vec<Automation>, GiveHubError>> + Send;

    /// Update an existing automation (config, activity flag, stats,
    /// `last_run`, `next_run`).
    fn update(
        &self,
        automation: Automation,
    ) -> impl Future<Output = Result<Automation, GiveHubError>> + Send;

    /// Delete an automation by its unique identifier.
    fn delete(&self, id: AutomationId) -> impl Future<Output = Result<(), GiveHubError>> + Send;
}

impl<T: AutomationRepository + Send + Sync> AutomationRepository for Arc<T> {
    fn create(
        &self,
        automation: Automation,
    ) -> impl Future<Output = Result<Automation, GiveHubError>> + Send {
        (**self).create(automation)
    }

    fn get_by_id(
        &self,
        id: AutomationId,
    ) -> impl Future<Output = Result<Option<Automation>, GiveHubError>> + Send {
        (**self).get_by_id(id)
    }

    fn get_all(&self) -> impl Future<Output = Result<Vec<Automation>, GiveHubError>> + Send {
        (**self).get_all()
    }

    fn load_active(
        &self,
        kind: AutomationKind,
    ) -> impl Future<Output = Result<Vec<Automation>, GiveHubError>> + Send {
        (**self).load_active(kind)
    }

    fn update(
        &self,
        automation: Automation,
    ) -> impl Future<Output = Result<Automation, GiveHubError>> + Send {
        (**self).update(automation)
    }

    fn delete(&self, id: AutomationId) -> impl Future<Output = Result<(), GiveHubError>> + Send {
        (**self).delete(id)
    }
}
