//! Hosted chat-completion models.
//!
//! Both flows send exactly one user turn. A turn is a list of text blocks;
//! blocks marked cacheable ask the provider to cache that prefix of the prompt
//! so repeated requests over the same transcript are cheaper.

mod anthropic;
mod openai;

pub use anthropic::AnthropicChat;
pub use openai::OpenAIChat;

use crate::config::{LlmProvider, LlmSettings};
use crate::error::{LektorError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

/// One text block of the user turn.
#[derive(Debug, Clone, PartialEq)]
pub struct PromptBlock {
    pub text: String,
    /// Ask the provider to cache the prompt up to and including this block.
    pub cacheable: bool,
}

impl PromptBlock {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            cacheable: false,
        }
    }

    pub fn cached(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            cacheable: true,
        }
    }
}

/// A single-turn chat request.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatRequest {
    pub blocks: Vec<PromptBlock>,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl ChatRequest {
    /// A request whose user turn is one plain text block.
    pub fn single(text: impl Into<String>, max_tokens: u32, temperature: f32) -> Self {
        Self {
            blocks: vec![PromptBlock::text(text)],
            max_tokens,
            temperature,
        }
    }
}

/// A typed content block of a model response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    Text { text: String },
    #[serde(other)]
    Other,
}

/// The model's reply.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ChatResponse {
    pub content: Vec<ContentBlock>,
}

impl ChatResponse {
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            content: vec![ContentBlock::Text { text: text.into() }],
        }
    }

    /// Concatenated text of all text blocks; other block kinds are skipped.
    pub fn text(&self) -> String {
        self.content
            .iter()
            .filter_map(|block| match block {
                ContentBlock::Text { text } => Some(text.as_str()),
                ContentBlock::Other => None,
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Trait for chat model implementations.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Send one request and return the reply.
    async fn complete(&self, request: ChatRequest) -> Result<ChatResponse>;

    /// Model identifier, for logging.
    fn model(&self) -> &str;
}

/// Build the chat model selected in the settings.
pub fn create_chat_model(settings: &LlmSettings) -> Result<Arc<dyn ChatModel>> {
    let timeout = Duration::from_secs(settings.timeout_secs);

    match settings.provider {
        LlmProvider::Anthropic => {
            let api_key = settings.api_key().ok_or_else(|| {
                LektorError::Config(
                    "CLAUDE_API_KEY not set. Set it with: export CLAUDE_API_KEY='sk-ant-...'"
                        .to_string(),
                )
            })?;
            let mut chat = AnthropicChat::new(api_key, &settings.model, timeout)?;
            if let Some(url) = &settings.base_url {
                chat = chat.with_base_url(url);
            }
            Ok(Arc::new(chat))
        }
        LlmProvider::OpenAI => Ok(Arc::new(OpenAIChat::new(
            &settings.model,
            settings.base_url.as_deref(),
            timeout,
        )?)),
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Scripted chat model for tests.

    use super::*;
    use std::sync::Mutex;

    /// Replies with a fixed text, or fails, and records every request.
    pub struct ScriptedChat {
        reply: std::result::Result<String, String>,
        pub requests: Mutex<Vec<ChatRequest>>,
    }

    impl ScriptedChat {
        pub fn replying(text: &str) -> Self {
            Self {
                reply: Ok(text.to_string()),
                requests: Mutex::new(Vec::new()),
            }
        }

        pub fn failing(message: &str) -> Self {
            Self {
                reply: Err(message.to_string()),
                requests: Mutex::new(Vec::new()),
            }
        }

        pub fn request_count(&self) -> usize {
            self.requests.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl ChatModel for ScriptedChat {
        async fn complete(&self, request: ChatRequest) -> Result<ChatResponse> {
            self.requests.lock().unwrap().push(request);
            match &self.reply {
                Ok(text) => Ok(ChatResponse::from_text(text.clone())),
                Err(message) => Err(LektorError::Llm(message.clone())),
            }
        }

        fn model(&self) -> &str {
            "scripted"
        }
    }
}
