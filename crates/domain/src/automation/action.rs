//! Action — one typed side-effecting step within an automation run.

use serde::{Deserialize, Serialize};

/// The closed set of action types the platform dispatches on.
///
/// Serialized names match the platform's stored configuration
/// (`httpRequest`, `emailNotification`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ActionKind {
    /// Perform an HTTP request described by the action config.
    HttpRequest,
    /// Send an email through the platform's notification service.
    EmailNotification,
    /// Invoke a function exported by an extension module.
    ModuleFunction,
    /// Update an existing record in a module's data store.
    UpdateRecord,
    /// Create a new record in a module's data store.
    CreateRecord,
    /// Deliver a payload to an external webhook endpoint.
    Webhook,
}

impl ActionKind {
    /// The wire name of this action type.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::HttpRequest => "httpRequest",
            Self::EmailNotification => "emailNotification",
            Self::ModuleFunction => "moduleFunction",
            Self::UpdateRecord => "updateRecord",
            Self::CreateRecord => "createRecord",
            Self::Webhook => "webhook",
        }
    }
}

impl std::fmt::Display for ActionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One step of an automation's action pipeline.
///
/// The `config` shape is specific to the action type and opaque to the
/// scheduler core; it is forwarded verbatim to the registered handler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionDescriptor {
    /// Which handler this action dispatches to.
    #[serde(rename = "type")]
    pub kind: ActionKind,
    /// Handler-specific configuration, forwarded untouched.
    #[serde(default)]
    pub config: serde_json::Value,
}

impl ActionDescriptor {
    /// Create a descriptor from a kind and its raw config.
    #[must_use]
    pub fn new(kind: ActionKind, config: serde_json::Value) -> Self {
        Self { kind, config }
    }
}

impl std::fmt::Display for ActionDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} action", self.kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_serialize_kind_with_camel_case_wire_names() {
        let json = serde_json::to_string(&ActionKind::EmailNotification).unwrap();
        assert_eq!(json, "\"emailNotification\"");
        let json = serde_json::to_string(&ActionKind::HttpRequest).unwrap();
        assert_eq!(json, "\"httpRequest\"");
    }

    #[test]
    fn should_deserialize_descriptor_from_tagged_json() {
        let json = serde_json::json!({
            "type": "createRecord",
            "config": {"collection": "donations", "values": {"amount": 25}}
        });
        let action: ActionDescriptor = serde_json::from_value(json).unwrap();
        assert_eq!(action.kind, ActionKind::CreateRecord);
        assert_eq!(action.config["collection"], "donations");
    }

    #[test]
    fn should_default_config_to_null_when_absent() {
        let json = serde_json::json!({"type": "webhook"});
        let action: ActionDescriptor = serde_json::from_value(json).unwrap();
        assert_eq!(action.kind, ActionKind::Webhook);
        assert!(action.config.is_null());
    }

    #[test]
    fn should_roundtrip_descriptor_through_serde_json() {
        let action = ActionDescriptor::new(
            ActionKind::UpdateRecord,
            serde_json::json!({"collection": "causes", "recordId": "42"}),
        );
        let json = serde_json::to_string(&action).unwrap();
        let parsed: ActionDescriptor = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, action);
    }

    #[test]
    fn should_display_descriptor_with_wire_name() {
        let action = ActionDescriptor::new(ActionKind::ModuleFunction, serde_json::json!({}));
        assert_eq!(action.to_string(), "moduleFunction action");
    }
}
