//! SQLite-based vector store implementation.
//!
//! Fragments live in a single `fragments` table with little-endian `f32`
//! embedding blobs. The index is built elsewhere and only ever read here.
//! Similarity is computed in Rust over a full scan.

use super::{rank, Fragment, ScoredFragment, VectorStore};
use crate::error::{LektorError, Result};
use async_trait::async_trait;
use rusqlite::{Connection, OpenFlags};
use std::path::Path;
use std::sync::Mutex;
use tracing::{debug, info, instrument};

/// SQLite-based vector store.
pub struct SqliteVectorStore {
    conn: Mutex<Connection>,
}

impl SqliteVectorStore {
    /// Open an existing index read-only.
    #[instrument(skip_all, fields(path = %path.display()))]
    pub fn open_read_only(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(LektorError::Config(format!(
                "Knowledge base index not found at {}. Set [index] path in the config file.",
                path.display()
            )));
        }

        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;

        let has_table: i64 = conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'fragments'",
            [],
            |row| row.get(0),
        )?;
        if has_table == 0 {
            return Err(LektorError::VectorStore(format!(
                "{} is not a knowledge base index (missing 'fragments' table)",
                path.display()
            )));
        }

        info!("Opened knowledge base index");

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| LektorError::VectorStore(format!("Failed to acquire lock: {}", e)))
    }

    /// Deserialize embedding from bytes.
    fn bytes_to_embedding(bytes: &[u8]) -> Vec<f32> {
        bytes
            .chunks_exact(4)
            .map(|chunk| {
                let arr: [u8; 4] = chunk.try_into().unwrap_or_default();
                f32::from_le_bytes(arr)
            })
            .collect()
    }
}

#[async_trait]
impl VectorStore for SqliteVectorStore {
    #[instrument(skip(self, query_embedding))]
    async fn search(
        &self,
        query_embedding: &[f32],
        limit: usize,
        min_score: f32,
    ) -> Result<Vec<ScoredFragment>> {
        let conn = self.lock()?;

        let mut stmt = conn.prepare("SELECT id, content, source, embedding FROM fragments")?;

        let rows = stmt.query_map([], |row| {
            let id_str: String = row.get(0)?;
            let embedding_bytes: Vec<u8> = row.get(3)?;
            Ok(Fragment {
                id: uuid::Uuid::parse_str(&id_str).unwrap_or_default(),
                content: row.get(1)?,
                source: row.get(2)?,
                embedding: Self::bytes_to_embedding(&embedding_bytes),
            })
        })?;

        let fragments = rows.collect::<rusqlite::Result<Vec<_>>>()?;
        let results = rank(fragments, query_embedding, limit, min_score);

        debug!("Found {} matching fragments", results.len());
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::params;

    /// Write an index file the way the external indexer lays it out.
    fn write_index(path: &Path, fragments: &[Fragment]) {
        let conn = Connection::open(path).unwrap();
        conn.execute_batch(
            "CREATE TABLE fragments (
                id TEXT PRIMARY KEY,
                content TEXT NOT NULL,
                source TEXT,
                embedding BLOB NOT NULL
            );",
        )
        .unwrap();
        for fragment in fragments {
            let blob: Vec<u8> = fragment.embedding.iter().flat_map(|f| f.to_le_bytes()).collect();
            conn.execute(
                "INSERT INTO fragments (id, content, source, embedding) VALUES (?1, ?2, ?3, ?4)",
                params![fragment.id.to_string(), fragment.content, fragment.source, blob],
            )
            .unwrap();
        }
    }

    #[tokio::test]
    async fn test_search_ranks_by_cosine() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.db");
        write_index(
            &path,
            &[
                Fragment::new("Gradient descent", Some("lecture-3".to_string()), vec![1.0, 0.0, 0.0]),
                Fragment::new("Decision trees", None, vec![0.0, 1.0, 0.0]),
            ],
        );

        let store = SqliteVectorStore::open_read_only(&path).unwrap();
        let results = store.search(&[1.0, 0.0, 0.0], 10, 0.0).await.unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].fragment.content, "Gradient descent");
        assert_eq!(results[0].fragment.source.as_deref(), Some("lecture-3"));
        assert!((results[0].score - 1.0).abs() < 0.001);
    }

    #[tokio::test]
    async fn test_embedding_blob_decoded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.db");
        write_index(&path, &[Fragment::new("Bias and variance", None, vec![0.6, 0.8])]);

        let store = SqliteVectorStore::open_read_only(&path).unwrap();
        let results = store.search(&[0.6, 0.8], 1, 0.0).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].fragment.embedding, vec![0.6, 0.8]);
    }

    #[test]
    fn test_missing_index_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = SqliteVectorStore::open_read_only(&dir.path().join("absent.db"));
        assert!(matches!(result, Err(LektorError::Config(_))));
    }

    #[test]
    fn test_foreign_database_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("other.db");
        Connection::open(&path)
            .unwrap()
            .execute_batch("CREATE TABLE notes (body TEXT);")
            .unwrap();

        let result = SqliteVectorStore::open_read_only(&path);
        assert!(matches!(result, Err(LektorError::VectorStore(_))));
    }
}
