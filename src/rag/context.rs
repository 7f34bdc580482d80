//! Context retrieval for knowledge-base answers.

use crate::embedding::Embedder;
use crate::error::Result;
use crate::vector_store::{ScoredFragment, VectorStore};
use std::sync::Arc;
use tracing::debug;

/// Retrieves the fragments most similar to a query.
pub struct ContextBuilder {
    vector_store: Arc<dyn VectorStore>,
    embedder: Arc<dyn Embedder>,
    k: usize,
    min_score: f32,
}

impl ContextBuilder {
    /// Create a new context builder.
    pub fn new(vector_store: Arc<dyn VectorStore>, embedder: Arc<dyn Embedder>) -> Self {
        Self {
            vector_store,
            embedder,
            k: 10,
            min_score: 0.0,
        }
    }

    /// Set the number of fragments to retrieve.
    pub fn with_k(mut self, k: usize) -> Self {
        self.k = k;
        self
    }

    /// Set the minimum similarity score threshold.
    pub fn with_min_score(mut self, min_score: f32) -> Self {
        self.min_score = min_score;
        self
    }

    /// Retrieve fragments for a query, best first.
    pub async fn retrieve(&self, query: &str) -> Result<Vec<ScoredFragment>> {
        let query_embedding = self.embedder.embed_query(query).await?;

        let results = self
            .vector_store
            .search(&query_embedding, self.k, self.min_score)
            .await?;

        debug!("Retrieved {} fragments (k={})", results.len(), self.k);
        Ok(results)
    }
}

/// Join fragment texts with single spaces, in retrieval order.
pub fn context_string(fragments: &[ScoredFragment]) -> String {
    fragments
        .iter()
        .map(|r| r.fragment.content.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}
