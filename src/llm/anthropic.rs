//! Anthropic Messages API client.

use super::{ChatModel, ChatRequest, ChatResponse, ContentBlock};
use crate::error::{LektorError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, instrument};

const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
const API_VERSION: &str = "2023-06-01";

/// Chat model backed by the Anthropic Messages API.
pub struct AnthropicChat {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl AnthropicChat {
    pub fn new(api_key: String, model: &str, timeout: Duration) -> Result<Self> {
        if api_key.is_empty() {
            return Err(LektorError::Config("Anthropic API key cannot be empty".to_string()));
        }

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LektorError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key,
            model: model.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
        })
    }

    /// Point the client at a different API host.
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    fn build_body(&self, request: &ChatRequest) -> MessagesRequest {
        let content = request
            .blocks
            .iter()
            .map(|block| TextBlockParam {
                kind: "text",
                text: block.text.clone(),
                cache_control: block.cacheable.then_some(CacheControl { kind: "ephemeral" }),
            })
            .collect();

        MessagesRequest {
            model: self.model.clone(),
            max_tokens: request.max_tokens,
            temperature: request.temperature,
            messages: vec![MessageParam {
                role: "user",
                content,
            }],
        }
    }
}

#[async_trait]
impl ChatModel for AnthropicChat {
    #[instrument(skip(self, request), fields(model = %self.model, blocks = request.blocks.len()))]
    async fn complete(&self, request: ChatRequest) -> Result<ChatResponse> {
        let body = self.build_body(&request);

        let response = self
            .client
            .post(format!("{}/v1/messages", self.base_url))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .json(&body)
            .send()
            .await
            .map_err(|e| LektorError::Llm(format!("Request to Anthropic failed: {}", e)))?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorEnvelope>(&text)
                .map(|e| format!("{}: {}", e.error.kind, e.error.message))
                .unwrap_or(text);
            return Err(LektorError::Llm(format!("Anthropic API returned {}: {}", status, message)));
        }

        let parsed: MessagesResponse = serde_json::from_str(&text)
            .map_err(|e| LektorError::Llm(format!("Unexpected response from Anthropic: {}", e)))?;

        if let Some(usage) = &parsed.usage {
            debug!(
                input_tokens = usage.input_tokens,
                output_tokens = usage.output_tokens,
                cache_read = usage.cache_read_input_tokens.unwrap_or(0),
                cache_write = usage.cache_creation_input_tokens.unwrap_or(0),
                "Anthropic usage"
            );
        }
        info!(
            "Received {} content blocks (stop reason: {})",
            parsed.content.len(),
            parsed.stop_reason.as_deref().unwrap_or("none")
        );

        Ok(ChatResponse {
            content: parsed.content,
        })
    }

    fn model(&self) -> &str {
        &self.model
    }
}

// === Wire types ===

#[derive(Debug, Serialize)]
struct MessagesRequest {
    model: String,
    max_tokens: u32,
    temperature: f32,
    messages: Vec<MessageParam>,
}

#[derive(Debug, Serialize)]
struct MessageParam {
    role: &'static str,
    content: Vec<TextBlockParam>,
}

#[derive(Debug, Serialize)]
struct TextBlockParam {
    #[serde(rename = "type")]
    kind: &'static str,
    text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    cache_control: Option<CacheControl>,
}

#[derive(Debug, Serialize)]
struct CacheControl {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
    stop_reason: Option<String>,
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    input_tokens: u64,
    output_tokens: u64,
    cache_creation_input_tokens: Option<u64>,
    cache_read_input_tokens: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ApiError,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    #[serde(rename = "type")]
    kind: String,
    message: String,
}
