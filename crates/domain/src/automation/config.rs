//! Automation configuration — a discriminated union keyed by type.
//!
//! The platform stores one JSON config blob per automation whose shape
//! depends on the automation type. Modeling it as a tagged enum makes a
//! config/type mismatch unrepresentable once deserialized; the remaining
//! semantic checks live in [`Automation::validate`](super::Automation::validate).

use serde::{Deserialize, Serialize};

use super::action::ActionDescriptor;
use super::condition::Condition;

/// The automation's activation style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AutomationKind {
    /// Activated by a matching named system event plus passing conditions.
    Trigger,
    /// Activated by cron timing.
    Schedule,
    /// Activated by an inbound call on a registered endpoint.
    Webhook,
}

impl AutomationKind {
    /// The wire name of this kind.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Trigger => "trigger",
            Self::Schedule => "schedule",
            Self::Webhook => "webhook",
        }
    }
}

impl std::fmt::Display for AutomationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Type-specific configuration, tagged on the automation type.
///
/// Field names serialize in the platform's stored camelCase form
/// (`cronExpression`, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum AutomationConfig {
    /// Cron-timed execution.
    #[serde(rename_all = "camelCase")]
    Schedule {
        /// Standard cron expression, five fields plus optional seconds.
        cron_expression: String,
        /// Actions to run, in declaration order.
        actions: Vec<ActionDescriptor>,
    },
    /// Event-driven execution, gated by conditions.
    #[serde(rename_all = "camelCase")]
    Trigger {
        /// Name of the system event to react to.
        event: String,
        /// Rules that must all pass against the event payload.
        #[serde(default)]
        conditions: Vec<Condition>,
        /// Actions to run, in declaration order.
        actions: Vec<ActionDescriptor>,
    },
    /// Execution driven by an inbound webhook call.
    #[serde(rename_all = "camelCase")]
    Webhook {
        /// Endpoint path the platform registers for this automation.
        endpoint: String,
        /// Expected HTTP method.
        method: String,
        /// Actions to run, in declaration order.
        actions: Vec<ActionDescriptor>,
    },
}

impl AutomationConfig {
    /// Which automation kind this config belongs to.
    #[must_use]
    pub fn kind(&self) -> AutomationKind {
        match self {
            Self::Schedule { .. } => AutomationKind::Schedule,
            Self::Trigger { .. } => AutomationKind::Trigger,
            Self::Webhook { .. } => AutomationKind::Webhook,
        }
    }

    /// The action pipeline, in declaration order.
    #[must_use]
    pub fn actions(&self) -> &[ActionDescriptor] {
        match self {
            Self::Schedule { actions, .. }
            | Self::Trigger { actions, .. }
            | Self::Webhook { actions, .. } => actions,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::action::ActionKind;
    use super::*;
    use serde_json::json;

    #[test]
    fn should_deserialize_schedule_config_from_tagged_json() {
        let json = json!({
            "type": "schedule",
            "cronExpression": "0 0 * * *",
            "actions": [{"type": "createRecord", "config": {"collection": "reports"}}]
        });
        let config: AutomationConfig = serde_json::from_value(json).unwrap();
        assert_eq!(config.kind(), AutomationKind::Schedule);
        assert_eq!(config.actions().len(), 1);
        assert_eq!(config.actions()[0].kind, ActionKind::CreateRecord);
    }

    #[test]
    fn should_deserialize_trigger_config_with_default_conditions() {
        let json = json!({
            "type": "trigger",
            "event": "transactionCompleted",
            "actions": [{"type": "emailNotification", "config": {}}]
        });
        let config: AutomationConfig = serde_json::from_value(json).unwrap();
        match &config {
            AutomationConfig::Trigger {
                event, conditions, ..
            } => {
                assert_eq!(event, "transactionCompleted");
                assert!(conditions.is_empty());
            }
            _ => panic!("expected trigger config"),
        }
    }

    #[test]
    fn should_deserialize_webhook_config() {
        let json = json!({
            "type": "webhook",
            "endpoint": "/hooks/donation-received",
            "method": "POST",
            "actions": [{"type": "moduleFunction", "config": {"name": "syncDonors"}}]
        });
        let config: AutomationConfig = serde_json::from_value(json).unwrap();
        assert_eq!(config.kind(), AutomationKind::Webhook);
    }

    #[test]
    fn should_reject_config_missing_fields_for_its_type() {
        // A schedule config without a cron expression must not deserialize.
        let json = json!({
            "type": "schedule",
            "actions": []
        });
        assert!(serde_json::from_value::<AutomationConfig>(json).is_err());
    }

    #[test]
    fn should_serialize_with_camel_case_field_names() {
        let config = AutomationConfig::Schedule {
            cron_expression: "0 8 * * 1".to_string(),
            actions: vec![],
        };
        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json["type"], "schedule");
        assert_eq!(json["cronExpression"], "0 8 * * 1");
    }

    #[test]
    fn should_roundtrip_kind_through_serde() {
        for kind in [
            AutomationKind::Trigger,
            AutomationKind::Schedule,
            AutomationKind::Webhook,
        ] {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{kind}\""));
            let parsed: AutomationKind = serde_json::from_str(&json).unwrap();
            assert_eq!(parsed, kind);
        }
    }
}
