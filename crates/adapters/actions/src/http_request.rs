//! Handler for `httpRequest` actions.

use std::collections::HashMap;
use std::time::Duration;

use serde::Deserialize;

use givehub_app::ports::{ActionFuture, ActionHandler};
use givehub_domain::automation::ActionKind;
use givehub_domain::error::ActionError;

/// Configuration shape of an `httpRequest` action.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct HttpRequestConfig {
    /// Target URL.
    url: String,
    /// HTTP method; defaults to GET.
    #[serde(default)]
    method: Option<String>,
    /// Extra request headers.
    #[serde(default)]
    headers: HashMap<String, String>,
    /// JSON body, sent when present.
    #[serde(default)]
    body: Option<serde_json::Value>,
    /// Per-request timeout override in seconds.
    #[serde(default)]
    timeout_secs: Option<u64>,
}

/// Performs the HTTP call described by the action config.
///
/// A non-success status fails the action, which aborts the rest of the
/// automation's pipeline.
pub struct HttpRequestHandler {
    client: reqwest::Client,
    default_timeout: Duration,
}

impl HttpRequestHandler {
    /// Create a handler with the given default request timeout.
    #[must_use]
    pub fn new(default_timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::new(),
            default_timeout,
        }
    }

    async fn send(&self, config: HttpRequestConfig) -> Result<serde_json::Value, ActionError> {
        let method = config
            .method
            .as_deref()
            .unwrap_or("GET")
            .to_ascii_uppercase();
        let mut request = match method.as_str() {
            "POST" => self.client.post(&config.url),
            "PUT" => self.client.put(&config.url),
            "PATCH" => self.client.patch(&config.url),
            "DELETE" => self.client.delete(&config.url),
            _ => self.client.get(&config.url),
        };
        for (name, value) in &config.headers {
            request = request.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &config.body {
            request = request.json(body);
        }
        let timeout = config
            .timeout_secs
            .map_or(self.default_timeout, Duration::from_secs);

        let response = request
            .timeout(timeout)
            .send()
            .await
            .map_err(|err| ActionError::handler(ActionKind::HttpRequest, err))?;
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|err| ActionError::handler(ActionKind::HttpRequest, err))?;

        if !status.is_success() {
            return Err(ActionError::handler(
                ActionKind::HttpRequest,
                format!("{method} {} returned {status}", config.url),
            ));
        }
        tracing::debug!(%method, url = %config.url, status = %status, "http request completed");

        let body = serde_json::from_str(&text).unwrap_or(serde_json::Value::String(text));
        Ok(serde_json::json!({
            "status": status.as_u16(),
            "body": body,
        }))
    }
}

impl ActionHandler for HttpRequestHandler {
    fn call<'a>(
        &'a self,
        config: &'a serde_json::Value,
        _event_data: &'a serde_json::Value,
    ) -> ActionFuture<'a> {
        Box::pin(async move {
            let config: HttpRequestConfig = serde_json::from_value(config.clone()).map_err(|err| {
                ActionError::handler(
                    ActionKind::HttpRequest,
                    format!("invalid httpRequest config: {err}"),
                )
            })?;
            self.send(config).await
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn should_fail_with_config_error_when_url_is_missing() {
        let handler = HttpRequestHandler::new(Duration::from_secs(30));
        let result = handler.call(&json!({"method": "GET"}), &json!({})).await;

        match result {
            Err(ActionError::Handler { kind, message }) => {
                assert_eq!(kind, ActionKind::HttpRequest);
                assert!(message.contains("invalid httpRequest config"));
            }
            other => panic!("expected handler error, got {other:?}"),
        }
    }

    #[test]
    fn should_parse_full_config() {
        let config: HttpRequestConfig = serde_json::from_value(json!({
            "url": "https://api.example.org/sync",
            "method": "post",
            "headers": {"authorization": "Bearer token"},
            "body": {"cause": "clean-water"},
            "timeoutSecs": 5
        }))
        .unwrap();

        assert_eq!(config.url, "https://api.example.org/sync");
        assert_eq!(config.method.as_deref(), Some("post"));
        assert_eq!(config.headers.len(), 1);
        assert_eq!(config.timeout_secs, Some(5));
    }

    #[test]
    fn should_default_optional_config_fields() {
        let config: HttpRequestConfig =
            serde_json::from_value(json!({"url": "https://example.org"})).unwrap();
        assert!(config.method.is_none());
        assert!(config.headers.is_empty());
        assert!(config.body.is_none());
        assert!(config.timeout_secs.is_none());
    }
}
