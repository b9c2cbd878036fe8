//! Event — a named system event carrying a JSON payload.
//!
//! Events are emitted by unrelated subsystems (payment completion,
//! module updates, ...) and consumed by the trigger dispatcher. The
//! catalog of names is open-ended; the core never enumerates it.

use serde::{Deserialize, Serialize};

use crate::time::{Timestamp, now};

/// An immutable record of something that happened in the platform.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    /// Event name, e.g. `"transactionCompleted"` or `"moduleUpdated"`.
    pub name: String,
    /// Arbitrary payload; conditions resolve their field paths on it.
    pub data: serde_json::Value,
    /// When the event was emitted.
    pub occurred_at: Timestamp,
}

impl Event {
    /// Create an event occurring now.
    #[must_use]
    pub fn new(name: impl Into<String>, data: serde_json::Value) -> Self {
        Self {
            name: name.into(),
            data,
            occurred_at: now(),
        }
    }
}
