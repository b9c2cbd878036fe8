//! Run log — one append-only record per automation execution attempt.

use serde::{Deserialize, Serialize};

use crate::id::{AutomationId, RunLogId};
use crate::time::Timestamp;

/// Outcome of a single run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    /// Every action completed.
    #[default]
    Success,
    /// An action failed and the run was aborted.
    Error,
    /// The run completed with a non-fatal anomaly.
    Warning,
}

impl RunStatus {
    /// The wire name of this status.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
            Self::Warning => "warning",
        }
    }
}

impl std::fmt::Display for RunStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A record of one execution attempt. Never mutated after creation;
/// removal happens only through the external retention policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunLog {
    pub id: RunLogId,
    pub automation_id: AutomationId,
    pub status: RunStatus,
    /// Wall-clock duration of the run in milliseconds.
    pub execution_time_ms: u64,
    pub details: Option<String>,
    pub error: Option<String>,
    /// The trigger data the run was invoked with.
    pub input: serde_json::Value,
    /// The last action's output (intermediate outputs are discarded).
    pub output: serde_json::Value,
    pub metadata: serde_json::Value,
    pub recorded_at: Timestamp,
}

impl RunLog {
    /// Create a builder for constructing a [`RunLog`].
    #[must_use]
    pub fn builder() -> RunLogBuilder {
        RunLogBuilder::default()
    }
}

/// Step-by-step builder for [`RunLog`].
#[derive(Debug, Default)]
pub struct RunLogBuilder {
    id: Option<RunLogId>,
    automation_id: Option<AutomationId>,
    status: RunStatus,
    execution_time_ms: u64,
    details: Option<String>,
    error: Option<String>,
    input: Option<serde_json::Value>,
    output: Option<serde_json::Value>,
    metadata: Option<serde_json::Value>,
    recorded_at: Option<Timestamp>,
}

impl RunLogBuilder {
    #[must_use]
    pub fn id(mut self, id: RunLogId) -> Self {
        self.id = Some(id);
        self
    }

    #[must_use]
    pub fn automation_id(mut self, automation_id: AutomationId) -> Self {
        self.automation_id = Some(automation_id);
        self
    }

    #[must_use]
    pub fn status(mut self, status: RunStatus) -> Self {
        self.status = status;
        self
    }

    #[must_use]
    pub fn execution_time_ms(mut self, execution_time_ms: u64) -> Self {
        self.execution_time_ms = execution_time_ms;
        self
    }

    #[must_use]
    pub fn details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    #[must_use]
    pub fn error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }

    #[must_use]
    pub fn input(mut self, input: serde_json::Value) -> Self {
        self.input = Some(input);
        self
    }

    #[must_use]
    pub fn output(mut self, output: serde_json::Value) -> Self {
        self.output = Some(output);
        self
    }

    #[must_use]
    pub fn metadata(mut self, metadata: serde_json::Value) -> Self {
        self.metadata = Some(metadata);
        self
    }

    #[must_use]
    pub fn recorded_at(mut self, recorded_at: Timestamp) -> Self {
        self.recorded_at = Some(recorded_at);
        self
    }

    /// Consume the builder and return a [`RunLog`].
    #[must_use]
    pub fn build(self) -> RunLog {
        RunLog {
            id: self.id.unwrap_or_default(),
            automation_id: self.automation_id.unwrap_or_default(),
            status: self.status,
            execution_time_ms: self.execution_time_ms,
            details: self.details,
            error: self.error,
            input: self.input.unwrap_or(serde_json::Value::Null),
            output: self.output.unwrap_or(serde_json::Value::Null),
            metadata: self.metadata.unwrap_or(serde_json::Value::Null),
            recorded_at: self.recorded_at.unwrap_or_else(crate::time::now),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn should_build_run_log_with_all_fields() {
        let automation_id = AutomationId::new();
        let recorded = crate::time::now();

        let log = RunLog::builder()
            .automation_id(automation_id)
            .status(RunStatus::Error)
            .execution_time_ms(42)
            .details("action pipeline aborted")
            .error("httpRequest action failed: timeout")
            .input(json!({"amount": 50}))
            .metadata(json!({"source": "event:transactionCompleted"}))
            .recorded_at(recorded)
            .build();

        assert_eq!(log.automation_id, automation_id);
        assert_eq!(log.status, RunStatus::Error);
        assert_eq!(log.execution_time_ms, 42);
        assert_eq!(log.error.as_deref(), Some("httpRequest action failed: timeout"));
        assert_eq!(log.input["amount"], 50);
        assert!(log.output.is_null());
        assert_eq!(log.recorded_at, recorded);
    }

    #[test]
    fn should_use_defaults_when_fields_not_provided() {
        let log = RunLog::builder().build();
        assert_eq!(log.status, RunStatus::Success);
        assert_eq!(log.execution_time_ms, 0);
        assert!(log.details.is_none());
        assert!(log.error.is_none());
        assert!(log.input.is_null());
    }

    #[test]
    fn should_serialize_status_with_lowercase_wire_names() {
        assert_eq!(
            serde_json::to_string(&RunStatus::Success).unwrap(),
            "\"success\""
        );
        assert_eq!(
            serde_json::to_string(&RunStatus::Error).unwrap(),
            "\"error\""
        );
        assert_eq!(
            serde_json::to_string(&RunStatus::Warning).unwrap(),
            "\"warning\""
        );
    }

    #[test]
    fn should_roundtrip_run_log_through_serde_json() {
        let log = RunLog::builder()
            .automation_id(AutomationId::new())
            .status(RunStatus::Success)
            .execution_time_ms(7)
            .output(json!({"created": true}))
            .build();

        let json = serde_json::to_string(&log).unwrap();
        let parsed: RunLog = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.id, log.id);
        assert_eq!(parsed.automation_id, log.automation_id);
        assert_eq!(parsed.status, log.status);
        assert_eq!(parsed.output, log.output);
    }
}
