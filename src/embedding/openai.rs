//! OpenAI embeddings implementation.

use super::Embedder;
use crate::config::EmbeddingSettings;
use crate::error::{LektorError, Result};
use crate::openai::create_client;
use async_openai::types::{CreateEmbeddingRequestArgs, EmbeddingInput};
use async_trait::async_trait;
use tracing::{debug, instrument};

/// Embedder for OpenAI or any OpenAI-compatible embeddings endpoint.
pub struct OpenAIEmbedder {
    client: async_openai::Client<async_openai::config::OpenAIConfig>,
    model: String,
    dimensions: Option<u32>,
    query_prefix: String,
}

impl OpenAIEmbedder {
    /// Create an embedder from settings.
    pub fn from_settings(settings: &EmbeddingSettings) -> Result<Self> {
        Ok(Self {
            client: create_client(settings.base_url.as_deref())?,
            model: settings.model.clone(),
            dimensions: settings.dimensions,
            query_prefix: settings.query_prefix.clone(),
        })
    }

    /// The exact text sent to the embeddings endpoint for a query.
    fn query_input(&self, text: &str) -> String {
        format!("{}{}", self.query_prefix, text)
    }
}

#[async_trait]
impl Embedder for OpenAIEmbedder {
    #[instrument(skip(self, text), fields(model = %self.model))]
    async fn embed_query(&self, text: &str) -> Result<Vec<f32>> {
        let mut args = CreateEmbeddingRequestArgs::default();
        args.model(&self.model)
            .input(EmbeddingInput::String(self.query_input(text)));
        if let Some(dimensions) = self.dimensions {
            args.dimensions(dimensions);
        }

        let request = args
            .build()
            .map_err(|e| LektorError::Embedding(format!("Failed to build request: {}", e)))?;

        let response = self
            .client
            .embeddings()
            .create(request)
            .await
            .map_err(|e| LektorError::Embedding(format!("Embedding API error: {}", e)))?;

        let embedding = response
            .data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .ok_or_else(|| LektorError::Embedding("Empty embedding response".to_string()))?;

        debug!("Generated query embedding with {} dimensions", embedding.len());
        Ok(embedding)
    }
}
