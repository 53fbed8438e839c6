//! Client for the webhook that fronts the language model.
//!
//! Every call ends in a [`GatewayResult`]. Transport failures, non-2xx
//! statuses and malformed bodies are folded into an error-shaped contract at
//! this boundary so the chat loop never has to handle a fault.

use std::error::Error;
use std::fmt;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::StatusCode;
use serde_json::Value;
use tracing::{debug, warn};

use crate::api::{WebhookReplyItem, WebhookRequest};
use crate::core::config::settings::GatewaySettings;
use crate::core::message::GatewayResult;

/// Longest slice of an error body quoted back to the user.
const ERROR_BODY_PREVIEW_CHARS: usize = 200;

#[async_trait]
pub trait Gateway: Send + Sync {
    async fn send_message(&self, session_id: &str, message: &str) -> GatewayResult;
}

#[derive(Debug)]
pub enum GatewayError {
    /// The request could not be sent or the body could not be read.
    Transport(reqwest::Error),
    /// The webhook answered with a non-success status.
    Status { status: StatusCode, body: String },
    /// The body was not valid JSON.
    Decode(serde_json::Error),
    /// The body was JSON but not the expected `[{"output": ...}]` shape.
    UnexpectedShape(&'static str),
}

impl fmt::Display for GatewayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GatewayError::Transport(err) => write!(f, "{err}"),
            GatewayError::Status { status, body } if body.is_empty() => {
                write!(f, "HTTP {status}")
            }
            GatewayError::Status { status, body } => write!(f, "HTTP {status}: {body}"),
            GatewayError::Decode(err) => write!(f, "invalid JSON in response: {err}"),
            GatewayError::UnexpectedShape(what) => write!(f, "unexpected response: {what}"),
        }
    }
}

impl Error for GatewayError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            GatewayError::Transport(err) => Some(err),
            GatewayError::Decode(err) => Some(err),
            _ => None,
        }
    }
}

#[derive(Clone)]
pub struct WebhookGateway {
    client: reqwest::Client,
    settings: GatewaySettings,
}

impl WebhookGateway {
    pub fn new(settings: GatewaySettings) -> Result<Self, reqwest::Error> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = settings.request_timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self::with_client(builder.build()?, settings))
    }

    pub fn with_client(client: reqwest::Client, settings: GatewaySettings) -> Self {
        Self { client, settings }
    }

    pub fn settings(&self) -> &GatewaySettings {
        &self.settings
    }

    async fn post(&self, session_id: &str, message: &str) -> Result<GatewayResult, GatewayError> {
        let request = WebhookRequest::new(session_id, message);

        let response = self
            .client
            .post(self.settings.webhook_url.clone())
            .bearer_auth(&self.settings.bearer_token)
            .header(CONTENT_TYPE, "application/json")
            .json(&request)
            .send()
            .await
            .map_err(GatewayError::Transport)?;

        let status = response.status();
        let body = response.text().await.map_err(GatewayError::Transport)?;
        debug!(session_id, %status, body = %body, "webhook response");

        if !status.is_success() {
            return Err(GatewayError::Status {
                status,
                body: preview(&body),
            });
        }

        extract_contract(&body)
    }
}

#[async_trait]
impl Gateway for WebhookGateway {
    async fn send_message(&self, session_id: &str, message: &str) -> GatewayResult {
        match self.post(session_id, message).await {
            Ok(result) => result,
            Err(err) => {
                warn!(session_id, error = %err, "webhook call failed");
                GatewayResult::failure(err)
            }
        }
    }
}

/// Pull the reply text out of a successful webhook body.
pub fn extract_contract(body: &str) -> Result<GatewayResult, GatewayError> {
    let value: Value = serde_json::from_str(body).map_err(GatewayError::Decode)?;

    let Value::Array(items) = value else {
        return Err(GatewayError::UnexpectedShape("expected a JSON array"));
    };
    let first = items
        .into_iter()
        .next()
        .ok_or(GatewayError::UnexpectedShape("empty JSON array"))?;
    if !first.is_object() {
        return Err(GatewayError::UnexpectedShape(
            "first array element is not an object",
        ));
    }

    let item: WebhookReplyItem = serde_json::from_value(first).map_err(GatewayError::Decode)?;
    Ok(match item.output {
        None => GatewayResult::no_output(),
        Some(Value::String(text)) => GatewayResult::reply(text),
        Some(other) => GatewayResult::reply(other.to_string()),
    })
}

fn preview(body: &str) -> String {
    let trimmed = body.trim();
    let mut preview: String = trimmed.chars().take(ERROR_BODY_PREVIEW_CHARS).collect();
    if trimmed.chars().count() > ERROR_BODY_PREVIEW_CHARS {
        preview.push('…');
    }
    preview
}
