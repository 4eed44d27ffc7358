// * Notifier - pushes the report to a DingTalk-style robot webhook
// * Delivery counts only when the webhook answers 200 with `errcode == 0`

use crate::config::constants::REPORT_TITLE;
use crate::config::TransportOptions;
use crate::network::client::{build_client, send_with_retries};
use crate::network::errors::NetworkError;
use reqwest::{Client, StatusCode};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{error, info};

#[derive(Debug, Error)]
pub enum NotificationError {
    #[error("Webhook rejected message (errcode {code}): {message}")]
    Rejected { code: i64, message: String },

    #[error("Webhook returned HTTP {0}")]
    Status(u16),

    #[error("Webhook response is not valid JSON: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("Webhook request failed: {0}")]
    Request(#[from] NetworkError),
}

/// Markdown message body understood by the robot webhook.
#[derive(Debug, Clone, Serialize)]
pub struct WebhookPayload<'a> {
    pub msgtype: &'static str,
    pub markdown: MarkdownBody<'a>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MarkdownBody<'a> {
    pub title: &'a str,
    pub text: &'a str,
}

impl<'a> WebhookPayload<'a> {
    pub fn markdown(title: &'a str, text: &'a str) -> Self {
        Self {
            msgtype: "markdown",
            markdown: MarkdownBody { title, text },
        }
    }
}

/// Webhook acknowledgement, read leniently from the reply body.
///
/// Only `errcode` decides the outcome; `errmsg` is kept for logging and may
/// be absent or of any type.
#[derive(Debug, Clone, PartialEq)]
pub struct WebhookResponse {
    pub errcode: Option<i64>,
    pub errmsg: Option<String>,
}

impl WebhookResponse {
    pub fn from_value(body: &Value) -> Self {
        let errcode = body.get("errcode").and_then(|code| {
            code.as_i64()
                .or_else(|| code.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64))
        });
        let errmsg = body.get("errmsg").map(|msg| match msg.as_str() {
            Some(text) => text.to_string(),
            None => msg.to_string(),
        });
        Self { errcode, errmsg }
    }

    /// A missing `errcode` counts as failure.
    pub fn is_success(&self) -> bool {
        self.errcode == Some(0)
    }
}

pub struct WebhookNotifier {
    client: Client,
    webhook_url: String,
    max_retries: u32,
}

impl WebhookNotifier {
    pub fn new(
        webhook_url: impl Into<String>,
        options: &TransportOptions,
    ) -> Result<Self, NetworkError> {
        Ok(Self {
            client: build_client(None, options)?,
            webhook_url: webhook_url.into(),
            max_retries: options.max_retries,
        })
    }

    /// Sends `text` and reports the outcome as a boolean; failures are logged.
    pub async fn send(&self, text: &str) -> bool {
        match self.deliver(text).await {
            Ok(()) => {
                info!("Webhook message delivered");
                true
            }
            Err(e) => {
                error!(error = %e, "Webhook delivery failed");
                false
            }
        }
    }

    /// Sends `text` as a markdown message.
    pub async fn deliver(&self, text: &str) -> Result<(), NotificationError> {
        info!("Sending report to webhook");

        let payload = WebhookPayload::markdown(REPORT_TITLE, text);
        let request = self.client.post(&self.webhook_url).json(&payload);
        let response = send_with_retries(request, self.max_retries).await?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(NotificationError::Status(status.as_u16()));
        }

        let body = response.text().await.map_err(NetworkError::from)?;
        let body: Value = serde_json::from_str(&body).map_err(NotificationError::Decode)?;
        let ack = WebhookResponse::from_value(&body);

        if ack.is_success() {
            return Ok(());
        }
        Err(NotificationError::Rejected {
            code: ack.errcode.unwrap_or(-1),
            message: ack.errmsg.unwrap_or_else(|| "no errmsg".to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_shape() {
        let payload = WebhookPayload::markdown("Traffic Report", "### hi");
        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "msgtype": "markdown",
                "markdown": {"title": "Traffic Report", "text": "### hi"}
            })
        );
    }

    #[test]
    fn test_response_parsing() {
        let ok = WebhookResponse::from_value(&serde_json::json!({"errcode": 0, "errmsg": "ok"}));
        assert!(ok.is_success());
        assert_eq!(ok.errmsg.as_deref(), Some("ok"));

        let bare = WebhookResponse::from_value(&serde_json::json!({}));
        assert_eq!(bare.errcode, None);
        assert!(!bare.is_success());
    }

    #[test]
    fn test_response_parsing_is_lenient_on_types() {
        let numeric_msg =
            WebhookResponse::from_value(&serde_json::json!({"errcode": 0, "errmsg": 123}));
        assert!(numeric_msg.is_success());
        assert_eq!(numeric_msg.errmsg.as_deref(), Some("123"));

        let float_code = WebhookResponse::from_value(&serde_json::json!({"errcode": 0.0}));
        assert!(float_code.is_success());

        let text_code = WebhookResponse::from_value(&serde_json::json!({"errcode": "0"}));
        assert!(!text_code.is_success());

        let fractional = WebhookResponse::from_value(&serde_json::json!({"errcode": 0.5}));
        assert!(!fractional.is_success());
    }

    #[test]
    fn test_rejected_display_includes_message() {
        let err = NotificationError::Rejected {
            code: 310000,
            message: "keywords not in content".to_string(),
        };
        assert!(err.to_string().contains("310000"));
        assert!(err.to_string().contains("keywords not in content"));
    }
}
