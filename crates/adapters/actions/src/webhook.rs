//! Handler for `webhook` actions.

use std::collections::HashMap;
use std::time::Duration;

use serde::Deserialize;

use givehub_app::ports::{ActionFuture, ActionHandler};
use givehub_domain::automation::ActionKind;
use givehub_domain::error::ActionError;

/// Configuration shape of a `webhook` action.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WebhookConfig {
    /// Endpoint to deliver to.
    url: String,
    /// Extra request headers.
    #[serde(default)]
    headers: HashMap<String, String>,
}

/// Delivers the run's event payload to the configured endpoint as a
/// JSON POST.
pub struct WebhookHandler {
    client: reqwest::Client,
    timeout: Duration,
}

impl WebhookHandler {
    /// Create a handler with the given delivery timeout.
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::new(),
            timeout,
        }
    }
}

impl ActionHandler for WebhookHandler {
    fn call<'a>(
        &'a self,
        config: &'a serde_json::Value,
        event_data: &'a serde_json::Value,
    ) -> ActionFuture<'a> {
        Box::pin(async move {
            let config: WebhookConfig = serde_json::from_value(config.clone()).map_err(|err| {
                ActionError::handler(
                    ActionKind::Webhook,
                    format!("invalid webhook config: {err}"),
                )
            })?;

            let mut request = self.client.post(&config.url).json(event_data);
            for (name, value) in &config.headers {
                request = request.header(name.as_str(), value.as_str());
            }

            let response = request
                .timeout(self.timeout)
                .send()
                .await
                .map_err(|err| ActionError::handler(ActionKind::Webhook, err))?;
            let status = response.status();
            if !status.is_success() {
                return Err(ActionError::handler(
                    ActionKind::Webhook,
                    format!("delivery to {} returned {status}", config.url),
                ));
            }
            tracing::debug!(url = %config.url, status = %status, "webhook delivered");

            Ok(serde_json::json!({ "status": status.as_u16() }))
        })
    }
}
