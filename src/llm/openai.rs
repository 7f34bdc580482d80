//! OpenAI chat completions.

use super::{ChatModel, ChatRequest, ChatResponse, ContentBlock};
use crate::error::{LektorError, Result};
use crate::openai::create_client_with_timeout;
use async_openai::types::{
    ChatCompletionRequestMessage, ChatCompletionRequestUserMessageArgs,
    CreateChatCompletionRequestArgs,
};
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, instrument};

/// Chat model backed by OpenAI chat completions.
///
/// OpenAI caches long prompt prefixes automatically, so the cacheable flag on
/// prompt blocks is not forwarded.
pub struct OpenAIChat {
    client: async_openai::Client<async_openai::config::OpenAIConfig>,
    model: String,
}

impl OpenAIChat {
    pub fn new(model: &str, base_url: Option<&str>, timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: create_client_with_timeout(base_url, timeout)?,
            model: model.to_string(),
        })
    }
}

/// Join the request blocks into a single user message.
fn flatten_blocks(request: &ChatRequest) -> String {
    request
        .blocks
        .iter()
        .map(|b| b.text.as_str())
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[async_trait]
impl ChatModel for OpenAIChat {
    #[instrument(skip(self, request), fields(model = %self.model))]
    async fn complete(&self, request: ChatRequest) -> Result<ChatResponse> {
        let messages: Vec<ChatCompletionRequestMessage> = vec![
            ChatCompletionRequestUserMessageArgs::default()
                .content(flatten_blocks(&request))
                .build()
                .map_err(|e| LektorError::Llm(e.to_string()))?
                .into(),
        ];

        let api_request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .max_completion_tokens(request.max_tokens)
            .temperature(request.temperature)
            .build()
            .map_err(|e| LektorError::Llm(e.to_string()))?;

        let response = self
            .client
            .chat()
            .create(api_request)
            .await
            .map_err(|e| LektorError::Llm(format!("Failed to generate response: {}", e)))?;

        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| LektorError::Llm("Empty response from LLM".to_string()))?;

        debug!("Finish reason: {:?}", choice.finish_reason);

        let content = choice
            .message
            .content
            .map(|text| vec![ContentBlock::Text { text }])
            .unwrap_or_default();

        Ok(ChatResponse { content })
    }

    fn model(&self) -> &str {
        &self.model
    }
}
