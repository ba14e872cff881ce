//! Model client: one Messages API request per loop iteration.
//!
//! [`ModelClient`] is the seam the conversation loop talks to.
//! [`HttpModelClient`] implements it over reqwest, sending the whole history,
//! the system prompt and the tool schemas on every call.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

use super::error::ModelError;
use super::kind::ProviderKind;
use crate::config::Config;
use crate::constants::ANTHROPIC_VERSION;
use crate::message::{ContentBlock, Message};
use crate::tools::ToolSchema;

/// Sends the conversation to a model and returns its single turn.
#[async_trait]
pub trait ModelClient: Send + Sync {
    /// Sends `history` with `system_prompt` and returns the response blocks in order.
    async fn send(
        &self,
        history: &[Message],
        system_prompt: &str,
    ) -> Result<Vec<ContentBlock>, ModelError>;
}

/// A configured provider endpoint ready to handle completion requests.
pub struct HttpModelClient {
    http: Client,
    provider: ProviderKind,
    api_url: String,
    api_key: String,
    model: String,
    max_tokens: u32,
    timeout: Duration,
    tools: Vec<ToolSchema>,
}

/// Request body for the Messages API.
#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: &'a [Message],
    tools: &'a [ToolSchema],
}

/// The parts of the Messages API response this client reads.
#[derive(Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<Value>,
    #[serde(default)]
    stop_reason: Option<String>,
}

impl HttpModelClient {
    /// Creates a client from the resolved config and the registry's tool schemas.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &Config, tools: Vec<ToolSchema>) -> Result<Self> {
        let http = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            http,
            provider: config.provider,
            api_url: config.api_url.clone(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            timeout: config.request_timeout,
            tools,
        })
    }

    /// Builds the JSON body for one request.
    fn build_request_body(&self, history: &[Message], system_prompt: &str) -> Result<Value, ModelError> {
        let request = MessagesRequest {
            model: &self.model,
            max_tokens: self.max_tokens,
            system: system_prompt,
            messages: history,
            tools: &self.tools,
        };
        serde_json::to_value(&request)
            .map_err(|e| ModelError::InvalidResponse(format!("failed to encode request: {}", e)))
    }
}

#[async_trait]
impl ModelClient for HttpModelClient {
    async fn send(
        &self,
        history: &[Message],
        system_prompt: &str,
    ) -> Result<Vec<ContentBlock>, ModelError> {
        debug!(model = %self.model, messages = history.len(), "send: called");
        let body = self.build_request_body(history, system_prompt)?;
        let (auth_name, auth_value) = self.provider.auth_header(&self.api_key);

        let response = self
            .http
            .post(&self.api_url)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header(auth_name, auth_value)
            .json(&body)
            .send()
            .await
            .map_err(|e| ModelError::from_transport(e, self.timeout))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ModelError::from_transport(e, self.timeout))?;

        if !status.is_success() {
            warn!(status = status.as_u16(), "send: non-success status");
            return Err(ModelError::Status {
                status: status.as_u16(),
                message: extract_error_message(&text),
            });
        }

        parse_response(&text)
    }
}

/// Parses a Messages API response body into content blocks.
///
/// Only `text` and `tool_use` blocks are kept. Anything else, including a
/// `tool_result` the model has no business sending, is skipped; a kept block
/// that fails to decode makes the whole response invalid.
pub fn parse_response(body: &str) -> Result<Vec<ContentBlock>, ModelError> {
    let response: MessagesResponse =
        serde_json::from_str(body).map_err(|e| ModelError::InvalidResponse(e.to_string()))?;
    debug!(stop_reason = ?response.stop_reason, blocks = response.content.len(), "parse_response: called");

    let mut blocks = Vec::with_capacity(response.content.len());
    for raw in response.content {
        let kind = raw.get("type").and_then(Value::as_str).unwrap_or_default().to_string();
        if !ContentBlock::RESPONSE_TYPES.contains(&kind.as_str()) {
            warn!(kind = %kind, "parse_response: skipping block type");
            continue;
        }
        let block: ContentBlock = serde_json::from_value(raw)
            .map_err(|e| ModelError::InvalidResponse(format!("malformed {} block: {}", kind, e)))?;
        blocks.push(block);
    }
    Ok(blocks)
}

/// Pulls `error.message` out of an error body, falling back to the raw text.
fn extract_error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.pointer("/error/message").and_then(Value::as_str).map(str::to_string))
        .unwrap_or_else(|| body.trim().to_string())
}
