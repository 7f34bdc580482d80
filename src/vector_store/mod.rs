//! Vector store abstraction for Lektor.
//!
//! The knowledge base is a pre-built index of text fragments and their
//! embeddings. Lektor only reads it.

mod memory;
mod sqlite;

pub use memory::MemoryVectorStore;
pub use sqlite::SqliteVectorStore;

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A stored passage of text with its embedding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fragment {
    /// Unique fragment ID.
    pub id: Uuid,
    /// Text content.
    pub content: String,
    /// Where the passage came from (file, lecture, URL), if recorded.
    pub source: Option<String>,
    /// Embedding vector.
    #[serde(skip_serializing)]
    #[serde(default)]
    pub embedding: Vec<f32>,
}

impl Fragment {
    /// Create a new fragment with a fresh ID.
    pub fn new(content: impl Into<String>, source: Option<String>, embedding: Vec<f32>) -> Self {
        Self {
            id: Uuid::new_v4(),
            content: content.into(),
            source,
            embedding,
        }
    }
}

/// A search result with score.
#[derive(Debug, Clone)]
pub struct ScoredFragment {
    /// The matched fragment.
    pub fragment: Fragment,
    /// Similarity score (higher is better).
    pub score: f32,
}

/// Read access to a vector index.
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Return up to `limit` fragments most similar to the query, best first,
    /// skipping those scoring below `min_score`.
    async fn search(
        &self,
        query_embedding: &[f32],
        limit: usize,
        min_score: f32,
    ) -> Result<Vec<ScoredFragment>>;
}

/// Compute cosine similarity between two vectors.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot_product / (norm_a * norm_b)
}

/// Score every fragment against the query and keep the best `limit`.
pub(crate) fn rank(
    fragments: impl IntoIterator<Item = Fragment>,
    query_embedding: &[f32],
    limit: usize,
    min_score: f32,
) -> Vec<ScoredFragment> {
    let mut results: Vec<ScoredFragment> = fragments
        .into_iter()
        .map(|fragment| {
            let score = cosine_similarity(query_embedding, &fragment.embedding);
            ScoredFragment { fragment, score }
        })
        .filter(|r| r.score >= min_score)
        .collect();

    results.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
    results.truncate(limit);
    results
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cosine_similarity() {
        let a = vec![1.0, 0.0, 0.0];
        let b = vec![1.0, 0.0, 0.0];
        assert!((cosine_similarity(&a, &b) - 1.0).abs() < 0.001);

        let c = vec![0.0, 1.0, 0.0];
        assert!((cosine_similarity(&a, &c)).abs() < 0.001);

        let d = vec![-1.0, 0.0, 0.0];
        assert!((cosine_similarity(&a, &d) + 1.0).abs() < 0.001);
    }

    #[test]
    fn test_mismatched_dimensions_score_zero() {
        assert_eq!(cosine_similarity(&[1.0, 0.0], &[1.0, 0.0, 0.0]), 0.0);
    }

    #[test]
    fn test_rank_orders_and_truncates() {
        let fragments = vec![
            Fragment::new("far", None, vec![0.0, 1.0]),
            Fragment::new("near", None, vec![1.0, 0.1]),
            Fragment::new("exact", None, vec![1.0, 0.0]),
        ];

        let ranked = rank(fragments, &[1.0, 0.0], 2, 0.0);
        let contents: Vec<_> = ranked.iter().map(|r| r.fragment.content.as_str()).collect();
        assert_eq!(contents, vec!["exact", "near"]);
    }

    #[test]
    fn test_rank_applies_threshold() {
        let fragments = vec![
            Fragment::new("orthogonal", None, vec![0.0, 1.0]),
            Fragment::new("aligned", None, vec![1.0, 0.0]),
        ];

        let ranked = rank(fragments, &[1.0, 0.0], 10, 0.5);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].fragment.content, "aligned");
    }
}
