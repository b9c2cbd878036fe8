//! Automation — a stored job definition with actions to run.
//!
//! An automation is activated by cron timing (`schedule`), by a named
//! system event plus passing conditions (`trigger`), or by an inbound
//! call on a registered endpoint (`webhook`). Each carries an action
//! pipeline, rolling run statistics, and the scheduler's bookkeeping
//! timestamps.

mod action;
mod condition;
mod config;
mod stats;

pub use action::{ActionDescriptor, ActionKind};
pub use condition::{Condition, Operator, evaluate_all};
pub use config::{AutomationConfig, AutomationKind};
pub use stats::RunStats;

use serde::{Deserialize, Serialize};

use crate::cron::CronExpression;
use crate::error::{GiveHubError, ValidationError};
use crate::id::{AutomationId, ModuleId};
use crate::time::Timestamp;

/// A stored job definition of type schedule, trigger, or webhook.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Automation {
    pub id: AutomationId,
    pub name: String,
    pub description: Option<String>,
    /// Owning extension module, when the automation belongs to one.
    pub module_id: Option<ModuleId>,
    pub config: AutomationConfig,
    /// Inactive automations are neither scheduled nor dispatched.
    pub is_active: bool,
    /// Set by the scheduler after each run.
    pub last_run: Option<Timestamp>,
    /// Set by the scheduler after each run; `None` for non-schedule kinds.
    pub next_run: Option<Timestamp>,
    pub stats: RunStats,
}

impl Automation {
    /// Create a builder for constructing an [`Automation`].
    #[must_use]
    pub fn builder() -> AutomationBuilder {
        AutomationBuilder::default()
    }

    /// The automation's kind, derived from its config.
    #[must_use]
    pub fn kind(&self) -> AutomationKind {
        self.config.kind()
    }

    /// The action pipeline, in declaration order.
    #[must_use]
    pub fn actions(&self) -> &[ActionDescriptor] {
        self.config.actions()
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`GiveHubError::Validation`] when:
    /// - `name` is empty ([`ValidationError::EmptyName`])
    /// - the config declares no actions ([`ValidationError::NoActions`])
    /// - a schedule's cron expression does not parse
    ///   ([`ValidationError::InvalidCron`])
    /// - a trigger names no event ([`ValidationError::EmptyEvent`])
    /// - a webhook has no endpoint ([`ValidationError::EmptyEndpoint`])
    pub fn validate(&self) -> Result<(), GiveHubError> {
        if self.name.is_empty() {
            return Err(ValidationError::EmptyName.into());
        }
        if self.actions().is_empty() {
            return Err(ValidationError::NoActions.into());
        }
        match &self.config {
            AutomationConfig::Schedule {
                cron_expression, ..
            } => {
                cron_expression
                    .parse::<CronExpression>()
                    .map_err(ValidationError::InvalidCron)?;
            }
            AutomationConfig::Trigger { event, .. } => {
                if event.trim().is_empty() {
                    return Err(ValidationError::EmptyEvent.into());
                }
            }
            AutomationConfig::Webhook { endpoint, .. } => {
                if endpoint.trim().is_empty() {
                    return Err(ValidationError::EmptyEndpoint.into());
                }
            }
        }
        Ok(())
    }
}

/// Step-by-step builder for [`Automation`].
#[derive(Debug, Default)]
pub struct AutomationBuilder {
    id: Option<AutomationId>,
    name: Option<String>,
    description: Option<String>,
    module_id: Option<ModuleId>,
    config: Option<AutomationConfig>,
    is_active: Option<bool>,
    stats: Option<RunStats>,
}

impl AutomationBuilder {
    #[must_use]
    pub fn id(mut self, id: AutomationId) -> Self {
        self.id = Some(id);
        self
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn module_id(mut self, module_id: ModuleId) -> Self {
        self.module_id = Some(module_id);
        self
    }

    #[must_use]
    pub fn config(mut self, config: AutomationConfig) -> Self {
        self.config = Some(config);
        self
    }

    #[must_use]
    pub fn is_active(mut self, is_active: bool) -> Self {
        self.is_active = Some(is_active);
        self
    }

    #[must_use]
    pub fn stats(mut self, stats: RunStats) -> Self {
        self.stats = Some(stats);
        self
    }

    /// Consume the builder, validate, and return an [`Automation`].
    ///
    /// # Errors
    ///
    /// Returns [`GiveHubError::Validation`] if required fields are
    /// missing or invariants fail.
    pub fn build(self) -> Result<Automation, GiveHubError> {
        let automation = Automation {
            id: self.id.unwrap_or_default(),
            name: self.name.unwrap_or_default(),
            description: self.description,
            module_id: self.module_id,
            config: self.config.ok_or(ValidationError::MissingConfig)?,
            is_active: self.is_active.unwrap_or(true),
            last_run: None,
            next_run: None,
            stats: self.stats.unwrap_or_default(),
        };
        automation.validate()?;
        Ok(automation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record_action() -> ActionDescriptor {
        ActionDescriptor::new(
            ActionKind::CreateRecord,
            json!({"collection": "reports", "values": {}}),
        )
    }

    fn schedule_config(cron: &str) -> AutomationConfig {
        AutomationConfig::Schedule {
            cron_expression: cron.to_string(),
            actions: vec![record_action()],
        }
    }

    fn trigger_config(event: &str) -> AutomationConfig {
        AutomationConfig::Trigger {
            event: event.to_string(),
            conditions: vec![],
            actions: vec![record_action()],
        }
    }

    #[test]
    fn should_build_valid_schedule_automation() {
        let auto = Automation::builder()
            .name("Nightly donation digest")
            .config(schedule_config("0 0 * * *"))
            .build()
            .unwrap();
        assert_eq!(auto.name, "Nightly donation digest");
        assert_eq!(auto.kind(), AutomationKind::Schedule);
        assert!(auto.is_active);
        assert!(auto.last_run.is_none());
        assert!(auto.next_run.is_none());
        assert_eq!(auto.stats, RunStats::default());
    }

    #[test]
    fn should_default_to_active_when_not_specified() {
        let auto = Automation::builder()
            .name("Rule")
            .config(trigger_config("donationReceived"))
            .build()
            .unwrap();
        assert!(auto.is_active);
    }

    #[test]
    fn should_build_inactive_automation_when_requested() {
        let auto = Automation::builder()
            .name("Paused rule")
            .config(trigger_config("donationReceived"))
            .is_active(false)
            .build()
            .unwrap();
        assert!(!auto.is_active);
    }

    #[test]
    fn should_return_validation_error_when_name_is_empty() {
        let result = Automation::builder()
            .config(trigger_config("donationReceived"))
            .build();
        assert!(matches!(
            result,
            Err(GiveHubError::Validation(ValidationError::EmptyName))
        ));
    }

    #[test]
    fn should_return_validation_error_when_config_is_missing() {
        let result = Automation::builder().name("No config").build();
        assert!(matches!(
            result,
            Err(GiveHubError::Validation(ValidationError::MissingConfig))
        ));
    }

    #[test]
    fn should_return_validation_error_when_actions_are_empty() {
        let result = Automation::builder()
            .name("No actions")
            .config(AutomationConfig::Trigger {
                event: "donationReceived".to_string(),
                conditions: vec![],
                actions: vec![],
            })
            .build();
        assert!(matches!(
            result,
            Err(GiveHubError::Validation(ValidationError::NoActions))
        ));
    }

    #[test]
    fn should_return_validation_error_when_cron_is_invalid() {
        let result = Automation::builder()
            .name("Bad cron")
            .config(schedule_config("not a cron"))
            .build();
        assert!(matches!(
            result,
            Err(GiveHubError::Validation(ValidationError::InvalidCron(_)))
        ));
    }

    #[test]
    fn should_return_validation_error_when_trigger_event_is_blank() {
        let result = Automation::builder()
            .name("Blank event")
            .config(trigger_config("  "))
            .build();
        assert!(matches!(
            result,
            Err(GiveHubError::Validation(ValidationError::EmptyEvent))
        ));
    }

    #[test]
    fn should_return_validation_error_when_webhook_endpoint_is_blank() {
        let result = Automation::builder()
            .name("Blank endpoint")
            .config(AutomationConfig::Webhook {
                endpoint: String::new(),
                method: "POST".to_string(),
                actions: vec![record_action()],
            })
            .build();
        assert!(matches!(
            result,
            Err(GiveHubError::Validation(ValidationError::EmptyEndpoint))
        ));
    }

    #[test]
    fn should_set_custom_id_and_module_via_builder() {
        let id = AutomationId::new();
        let module_id = ModuleId::new();
        let auto = Automation::builder()
            .id(id)
            .module_id(module_id)
            .name("Owned rule")
            .config(trigger_config("donationReceived"))
            .build()
            .unwrap();
        assert_eq!(auto.id, id);
        assert_eq!(auto.module_id, Some(module_id));
    }

    #[test]
    fn should_roundtrip_automation_through_serde_json() {
        let auto = Automation::builder()
            .name("Large donation alert")
            .description("Notify staff about donations over 1000")
            .config(AutomationConfig::Trigger {
                event: "transactionCompleted".to_string(),
                conditions: vec![Condition {
                    field: "amount".to_string(),
                    operator: Operator::GreaterThan,
                    value: json!(1000),
                }],
                actions: vec![record_action()],
            })
            .build()
            .unwrap();

        let json = serde_json::to_string(&auto).unwrap();
        let parsed: Automation = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.id, auto.id);
        assert_eq!(parsed.name, auto.name);
        assert_eq!(parsed.config, auto.config);
        assert_eq!(parsed.stats, auto.stats);
    }

    #[test]
    fn should_expose_actions_for_every_kind() {
        let schedule = Automation::builder()
            .name("s")
            .config(schedule_config("*/5 * * * *"))
            .build()
            .unwrap();
        assert_eq!(schedule.actions().len(), 1);

        let webhook = Automation::builder()
            .name("w")
            .config(AutomationConfig::Webhook {
                endpoint: "/hooks/in".to_string(),
                method: "POST".to_string(),
                actions: vec![record_action(), record_action()],
            })
            .build()
            .unwrap();
        assert_eq!(webhook.actions().len(), 2);
        assert_eq!(webhook.kind(), AutomationKind::Webhook);
    }
}
