//! Answer generation.

use super::context::{context_string, ContextBuilder};
use crate::config::{Prompts, RagSettings};
use crate::embedding::Embedder;
use crate::error::{LektorError, Result};
use crate::llm::{ChatModel, ChatRequest};
use crate::vector_store::{ScoredFragment, VectorStore};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{error, info, instrument};

/// Outcome of the model call.
#[derive(Debug, Clone, PartialEq)]
pub enum Answer {
    /// The model's reply.
    Text(String),
    /// The model call failed; the message is meant for the user.
    Failed(String),
}

impl Answer {
    /// The answer text, if the model produced one.
    pub fn text(&self) -> Option<&str> {
        match self {
            Answer::Text(text) => Some(text),
            Answer::Failed(_) => None,
        }
    }
}

/// An answer together with the fragments it was grounded on.
#[derive(Debug, Clone)]
pub struct RagResponse {
    pub answer: Answer,
    /// Retrieved fragments, best first. Present even when the model call failed.
    pub fragments: Vec<ScoredFragment>,
}

/// RAG engine for question answering.
pub struct RagEngine {
    chat: Arc<dyn ChatModel>,
    context_builder: ContextBuilder,
    prompts: Prompts,
    max_tokens: u32,
    temperature: f32,
}

impl RagEngine {
    /// Create a new RAG engine.
    pub fn new(
        vector_store: Arc<dyn VectorStore>,
        embedder: Arc<dyn Embedder>,
        chat: Arc<dyn ChatModel>,
        settings: &RagSettings,
    ) -> Self {
        let context_builder = ContextBuilder::new(vector_store, embedder)
            .with_k(settings.k)
            .with_min_score(settings.min_score);

        Self {
            chat,
            context_builder,
            prompts: Prompts::default(),
            max_tokens: settings.max_tokens,
            temperature: settings.temperature,
        }
    }

    /// Set custom prompts (with user-defined variables).
    pub fn with_prompts(mut self, prompts: Prompts) -> Self {
        self.prompts = prompts;
        self
    }

    /// Override the number of fragments to retrieve.
    pub fn with_k(mut self, k: usize) -> Self {
        self.context_builder = self.context_builder.with_k(k);
        self
    }

    /// Fill the QA template for a question and its context string.
    pub fn build_prompt(&self, query: &str, context: &str) -> String {
        let mut vars = HashMap::new();
        vars.insert("input".to_string(), query.to_string());
        vars.insert("context".to_string(), context.to_string());
        self.prompts.render_with_custom(&self.prompts.rag.template, &vars)
    }

    /// Answer a question from the knowledge base.
    ///
    /// Retrieval failures are returned as errors. A failed model call is not:
    /// it yields [`Answer::Failed`] so the fragments can still be shown.
    #[instrument(skip(self), fields(query = %query))]
    pub async fn ask(&self, query: &str) -> Result<RagResponse> {
        let query = query.trim();
        if query.is_empty() {
            return Err(LektorError::InvalidInput("Please enter a question.".to_string()));
        }

        let fragments = self.context_builder.retrieve(query).await?;
        let context = context_string(&fragments);
        let prompt = self.build_prompt(query, &context);

        info!("Asking {} with {} fragments", self.chat.model(), fragments.len());

        let request = ChatRequest::single(prompt, self.max_tokens, self.temperature);
        let answer = match self.chat.complete(request).await {
            Ok(response) => Answer::Text(response.text()),
            Err(e) => {
                error!("Model call failed: {}", e);
                Answer::Failed(e.to_string())
            }
        };

        Ok(RagResponse { answer, fragments })
    }
}
