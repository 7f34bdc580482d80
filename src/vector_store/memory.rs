//! In-memory vector store implementation.
//!
//! Useful for testing and small datasets.

use super::{rank, Fragment, ScoredFragment, VectorStore};
use crate::error::Result;
use async_trait::async_trait;

/// In-memory vector store.
#[derive(Default)]
pub struct MemoryVectorStore {
    fragments: Vec<Fragment>,
}

impl MemoryVectorStore {
    /// Create a store over the given fragments.
    pub fn new(fragments: Vec<Fragment>) -> Self {
        Self { fragments }
    }
}

#[async_trait]
impl VectorStore for MemoryVectorStore {
    async fn search(
        &self,
        query_embedding: &[f32],
        limit: usize,
        min_score: f32,
    ) -> Result<Vec<ScoredFragment>> {
        Ok(rank(self.fragments.iter().cloned(), query_embedding, limit, min_score))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_vector_store() {
        let store = MemoryVectorStore::new(vec![
            Fragment::new("Hello world", None, vec![1.0, 0.0, 0.0]),
            Fragment::new("Goodbye world", Some("notes.md".to_string()), vec![0.0, 1.0, 0.0]),
        ]);

        let results = store.search(&[1.0, 0.0, 0.0], 10, 0.0).await.unwrap();
        assert_eq!(results.len(), 2);
        assert!(results[0].score > results[1].score);
        assert_eq!(results[0].fragment.content, "Hello world");
    }

    #[tokio::test]
    async fn test_empty_store() {
        let store = MemoryVectorStore::default();
        assert!(store.search(&[1.0], 10, 0.0).await.unwrap().is_empty());
    }
}
