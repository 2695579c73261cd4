//! Outbound automation webhooks.
//!
//! Two fixed endpoints receive site events as JSON `POST`s:
//!
//! - **chat**: `{ message, sessionId, timestamp }` → `{ reply?: string }`
//! - **contact**: form fields plus `timestamp` → only the status is read
//!
//! The transports sit behind [`ChatTransport`] and [`ContactTransport`] so
//! the chat widget and contact form can be driven without a network.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::WebhookError;

/// Body of one chat webhook call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    pub message: String,
    pub session_id: String,
    /// ISO-8601, taken when the request is built.
    pub timestamp: String,
}

impl ChatRequest {
    pub fn new(message: impl Into<String>, session_id: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            session_id: session_id.into(),
            timestamp: iso_now(),
        }
    }
}

/// Parsed chat webhook response. `reply` is `None` when the field is
/// missing, empty, or not a string.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChatReply {
    pub reply: Option<String>,
}

impl ChatReply {
    /// Interpret a raw response body.
    pub fn parse(body: &str) -> Result<Self, WebhookError> {
        let value: Value =
            serde_json::from_str(body).map_err(|e| WebhookError::Decode(e.to_string()))?;
        if value.is_null() {
            return Err(WebhookError::Decode("response body is null".to_string()));
        }
        let reply = value
            .get("reply")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_string);
        Ok(Self { reply })
    }
}

/// Contact form fields as submitted by the site.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub message: String,
}

/// Body of one contact webhook call.
#[derive(Debug, Clone, Serialize)]
pub struct ContactSubmission<'a> {
    #[serde(flatten)]
    pub form: &'a ContactForm,
    pub timestamp: String,
}

#[async_trait]
pub trait ChatTransport: Send + Sync {
    async fn send(&self, request: &ChatRequest) -> Result<ChatReply, WebhookError>;
}

#[async_trait]
pub trait ContactTransport: Send + Sync {
    async fn submit(&self, form: &ContactForm) -> Result<(), WebhookError>;
}

fn build_client(timeout_secs: Option<u64>) -> Result<reqwest::Client, WebhookError> {
    let mut builder = reqwest::Client::builder();
    if let Some(secs) = timeout_secs {
        builder = builder.timeout(Duration::from_secs(secs));
    }
    Ok(builder.build()?)
}

fn iso_now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// HTTP transport for the chat webhook.
pub struct ChatWebhook {
    url: String,
    client: reqwest::Client,
}

impl ChatWebhook {
    pub fn new(url: impl Into<String>, timeout_secs: Option<u64>) -> Result<Self, WebhookError> {
        Ok(Self {
            url: url.into(),
            client: build_client(timeout_secs)?,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl ChatTransport for ChatWebhook {
    async fn send(&self, request: &ChatRequest) -> Result<ChatReply, WebhookError> {
        debug!(url = %self.url, session = %request.session_id, "posting chat message");
        let response = self
            .client
            .post(&self.url)
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await?;

        // The status is not checked: any JSON body is read for a reply.
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            debug!(%status, "chat webhook returned a non-success status");
        }
        ChatReply::parse(&body).inspect_err(|e| warn!(error = %e, "unreadable chat reply"))
    }
}

/// HTTP transport for the contact webhook.
pub struct ContactWebhook {
    url: String,
    client: reqwest::Client,
}

impl ContactWebhook {
    pub fn new(url: impl Into<String>, timeout_secs: Option<u64>) -> Result<Self, WebhookError> {
        Ok(Self {
            url: url.into(),
            client: build_client(timeout_secs)?,
        })
    }
}

#[async_trait]
impl ContactTransport for ContactWebhook {
    async fn submit(&self, form: &ContactForm) -> Result<(), WebhookError> {
        let body = ContactSubmission {
            form,
            timestamp: iso_now(),
        };
        debug!(url = %self.url, "posting contact form");
        let response = self
            .client
            .post(&self.url)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            warn!(%status, "contact webhook rejected submission");
            Err(WebhookError::Status(status.as_u16()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_request_wire_shape() {
        let req = ChatRequest::new("hello", "session_1_abc");
        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(value["message"], "hello");
        assert_eq!(value["sessionId"], "session_1_abc");
        let ts = value["timestamp"].as_str().unwrap();
        assert!(chrono::DateTime::parse_from_rfc3339(ts).is_ok());
        assert!(ts.ends_with('Z'));
    }

    #[test]
    fn test_parse_reply_present() {
        let reply = ChatReply::parse(r#"{"reply":"Hi there"}"#).unwrap();
        assert_eq!(reply.reply.as_deref(), Some("Hi there"));
    }

    #[test]
    fn test_parse_reply_absent_or_unusable() {
        assert_eq!(ChatReply::parse("{}").unwrap().reply, None);
        assert_eq!(ChatReply::parse(r#"{"reply":""}"#).unwrap().reply, None);
        assert_eq!(ChatReply::parse(r#"{"reply":7}"#).unwrap().reply, None);
        assert_eq!(ChatReply::parse("[1,2]").unwrap().reply, None);
    }

    #[test]
    fn test_parse_reply_not_json() {
        assert!(matches!(
            ChatReply::parse("<html>502</html>"),
            Err(WebhookError::Decode(_))
        ));
        assert!(matches!(ChatReply::parse(""), Err(WebhookError::Decode(_))));
        assert!(matches!(ChatReply::parse("null"), Err(WebhookError::Decode(_))));
    }

    #[test]
    fn test_contact_submission_is_flat() {
        let form = ContactForm {
            name: "Asha".into(),
            email: "asha@example.com".into(),
            message: "Need a chatbot".into(),
            ..Default::default()
        };
        let value = serde_json::to_value(ContactSubmission {
            form: &form,
            timestamp: "2024-01-01T00:00:00.000Z".into(),
        })
        .unwrap();
        assert_eq!(value["name"], "Asha");
        assert_eq!(value["phone"], "");
        assert_eq!(value["company"], "");
        assert_eq!(value["timestamp"], "2024-01-01T00:00:00.000Z");
    }
}
