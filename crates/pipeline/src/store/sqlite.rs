//! SQLite-backed vector store for the legal corpus.
//!
//! Embeddings are stored as little-endian f32 blobs and compared with
//! brute-force cosine similarity. Adequate for corpora in the tens of
//! thousands of documents.

use crate::store::{cosine_similarity, StoreDocument, StoreMatch, StoreStats, VectorStore};
use chrono::{DateTime, Utc};
use juris_core::{AppError, AppResult};
use rusqlite::{params, Connection};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// SQLite vector store.
///
/// The connection is guarded by a mutex so the store can be shared across
/// concurrent pipeline invocations behind an `Arc`.
pub struct SqliteStore {
    conn: Mutex<Connection>,
    db_path: PathBuf,
}

impl SqliteStore {
    /// Open (or create) a store at the given path.
    pub fn open(db_path: &Path) -> AppResult<Self> {
        // Ensure parent directory exists
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                AppError::Retrieval(format!("Failed to create store directory: {}", e))
            })?;
        }

        let conn = Connection::open(db_path)
            .map_err(|e| AppError::Retrieval(format!("Failed to open SQLite store: {}", e)))?;

        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS documents (
                id TEXT PRIMARY KEY,
                title TEXT NOT NULL,
                content TEXT NOT NULL,
                embedding BLOB NOT NULL,
                metadata TEXT,
                indexed_at TEXT NOT NULL
            );
            "#,
        )
        .map_err(|e| AppError::Retrieval(format!("Failed to create tables: {}", e)))?;

        tracing::debug!("Initialized SQLite store at {:?}", db_path);

        Ok(Self {
            conn: Mutex::new(conn),
            db_path: db_path.to_path_buf(),
        })
    }
}

impl VectorStore for SqliteStore {
    fn query(&self, vector: &[f32], k: usize) -> AppResult<Vec<StoreMatch>> {
        let conn = self
            .conn
            .lock()
            .map_err(|_| AppError::Retrieval("Store lock poisoned".to_string()))?;

        let mut stmt = conn
            .prepare("SELECT id, title, content, embedding, metadata FROM documents")
            .map_err(|e| AppError::Retrieval(format!("Failed to prepare query: {}", e)))?;

        let rows = stmt
            .query_map([], |row| {
                let embedding_bytes: Vec<u8> = row.get(3)?;
                let metadata_json: Option<String> = row.get(4)?;

                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    embedding_bytes,
                    metadata_json,
                ))
            })
            .map_err(|e| AppError::Retrieval(format!("Failed to query documents: {}", e)))?;

        let mut results: Vec<StoreMatch> = Vec::new();

        for row in rows {
            let (id, title, content, embedding_bytes, metadata_json) =
                row.map_err(|e| AppError::Retrieval(format!("Failed to read row: {}", e)))?;

            let embedding = bytes_to_embedding(&embedding_bytes)?;
            let score = cosine_similarity(vector, &embedding);

            let metadata = metadata_json
                .and_then(|json| serde_json::from_str(&json).ok())
                .unwrap_or(serde_json::Value::Null);

            results.push(StoreMatch {
                id,
                title,
                content,
                score,
                metadata,
            });
        }

        // Sort by score descending; ties keep insertion order (stable sort)
        results.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        results.truncate(k);

        tracing::debug!("Store returned {} matches (requested top-{})", results.len(), k);

        Ok(results)
    }

    fn upsert(&self, document: &StoreDocument) -> AppResult<()> {
        let conn = self
            .conn
            .lock()
            .map_err(|_| AppError::Retrieval("Store lock poisoned".to_string()))?;

        let embedding_bytes = embedding_to_bytes(&document.embedding);
        let metadata_json = serde_json::to_string(&document.metadata)
            .map_err(|e| AppError::Retrieval(format!("Failed to serialize metadata: {}", e)))?;

        conn.execute(
            "INSERT OR REPLACE INTO documents (id, title, content, embedding, metadata, indexed_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                document.id,
                document.title,
                document.content,
                embedding_bytes,
                metadata_json,
                document.indexed_at.to_rfc3339(),
            ],
        )
        .map_err(|e| AppError::Retrieval(format!("Failed to insert document: {}", e)))?;

        Ok(())
    }

    fn stats(&self) -> AppResult<StoreStats> {
        let conn = self
            .conn
            .lock()
            .map_err(|_| AppError::Retrieval("Store lock poisoned".to_string()))?;

        let documents: u32 = conn
            .query_row("SELECT COUNT(*) FROM documents", [], |row| {
                row.get::<_, i64>(0).map(|v| v as u32)
            })
            .map_err(|e| AppError::Retrieval(format!("Failed to count documents: {}", e)))?;

        let size_bytes = std::fs::metadata(&self.db_path).map(|m| m.len()).unwrap_or(0);

        Ok(StoreStats {
            documents,
            size_bytes,
        })
    }

    fn reset(&self) -> AppResult<()> {
        let conn = self
            .conn
            .lock()
            .map_err(|_| AppError::Retrieval("Store lock poisoned".to_string()))?;

        conn.execute("DELETE FROM documents", [])
            .map_err(|e| AppError::Retrieval(format!("Failed to delete documents: {}", e)))?;

        tracing::info!("Reset corpus store");
        Ok(())
    }
}

/// Convert embedding vector to bytes for storage.
fn embedding_to_bytes(embedding: &[f32]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(embedding.len() * 4);
    for &value in embedding {
        bytes.extend_from_slice(&value.to_le_bytes());
    }
    bytes
}

/// Convert bytes back to embedding vector.
fn bytes_to_embedding(bytes: &[u8]) -> AppResult<Vec<f32>> {
    if bytes.len() % 4 != 0 {
        return Err(AppError::Retrieval(
            "Invalid embedding bytes length".to_string(),
        ));
    }

    let mut embedding = Vec::with_capacity(bytes.len() / 4);
    for chunk in bytes.chunks_exact(4) {
        let value = f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
        embedding.push(value);
    }

    Ok(embedding)
}

/// Build a document with the current timestamp.
pub fn document(
    id: impl Into<String>,
    title: impl Into<String>,
    content: impl Into<String>,
    embedding: Vec<f32>,
) -> StoreDocument {
    StoreDocument {
        id: id.into(),
        title: title.into(),
        content: content.into(),
        embedding,
        metadata: serde_json::Value::Null,
        indexed_at: now(),
    }
}

fn now() -> DateTime<Utc> {
    Utc::now()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    fn normalize(v: &[f32]) -> Vec<f32> {
        let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            v.iter().map(|x| x / norm).collect()
        } else {
            v.to_vec()
        }
    }

    #[test]
    fn test_open_creates_tables() {
        let temp_file = NamedTempFile::new().unwrap();
        let store = SqliteStore::open(temp_file.path()).unwrap();
        assert_eq!(store.stats().unwrap().documents, 0);
    }

    #[test]
    fn test_insert_and_query() {
        let temp_file = NamedTempFile::new().unwrap();
        let store = SqliteStore::open(temp_file.path()).unwrap();

        store
            .upsert(&document(
                "doc1",
                "Code des hydrocarbures, art. 12",
                "Les activités gazières sont soumises à autorisation.",
                vec![1.0, 0.0, 0.0],
            ))
            .unwrap();

        let results = store.query(&[1.0, 0.0, 0.0], 5).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, "doc1");
        assert!((results[0].score - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_scores_ordered_descending() {
        let temp_file = NamedTempFile::new().unwrap();
        let store = SqliteStore::open(temp_file.path()).unwrap();

        let vectors = [
            ("a", vec![1.0, 0.0, 0.0]),
            ("b", vec![0.7, 0.7, 0.0]),
            ("c", vec![0.0, 1.0, 0.0]),
            ("d", vec![-1.0, 0.0, 0.0]),
        ];

        for (id, v) in &vectors {
            store
                .upsert(&document(*id, "t", "c", normalize(v)))
                .unwrap();
        }

        let results = store.query(&normalize(&[1.0, 0.0, 0.0]), 10).unwrap();
        assert_eq!(results.len(), 4);
        for pair in results.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
        assert_eq!(results[0].id, "a");
    }

    #[test]
    fn test_top_k_limit_respected() {
        let temp_file = NamedTempFile::new().unwrap();
        let store = SqliteStore::open(temp_file.path()).unwrap();

        for i in 0..10 {
            store
                .upsert(&document(
                    format!("doc{}", i),
                    "t",
                    "c",
                    normalize(&[i as f32 / 10.0, 1.0, 0.0]),
                ))
                .unwrap();
        }

        let results = store.query(&normalize(&[1.0, 0.0, 0.0]), 3).unwrap();
        assert_eq!(results.len(), 3);
    }

    #[test]
    fn test_reset_clears_documents() {
        let temp_file = NamedTempFile::new().unwrap();
        let store = SqliteStore::open(temp_file.path()).unwrap();

        store
            .upsert(&document("doc1", "t", "c", vec![1.0, 0.0]))
            .unwrap();
        assert_eq!(store.stats().unwrap().documents, 1);

        store.reset().unwrap();
        assert_eq!(store.stats().unwrap().documents, 0);
    }
}
