//! Vector store abstraction.
//!
//! Defines a provider-agnostic interface for nearest-neighbor lookups over
//! an indexed legal corpus. The pipeline only queries; document lifecycle
//! (upsert, reset) belongs to the store owner.

pub mod memory;
pub mod sqlite;

pub use memory::InMemoryStore;
pub use sqlite::SqliteStore;

use chrono::{DateTime, Utc};
use juris_core::AppResult;
use serde::{Deserialize, Serialize};

/// A document stored in the vector index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreDocument {
    /// Unique document identifier
    pub id: String,

    /// Human-readable title (e.g., "Code des hydrocarbures, art. 12")
    pub title: String,

    /// Text content
    pub content: String,

    /// Embedding vector (normalized)
    pub embedding: Vec<f32>,

    /// Free-form metadata
    #[serde(default)]
    pub metadata: serde_json::Value,

    /// When this document was indexed
    pub indexed_at: DateTime<Utc>,
}

/// A nearest-neighbor match returned by the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreMatch {
    /// Document identifier
    pub id: String,

    /// Document title
    pub title: String,

    /// Document content
    pub content: String,

    /// Cosine similarity to the query vector
    pub score: f32,

    /// Free-form metadata carried through
    pub metadata: serde_json::Value,
}

/// Store statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreStats {
    /// Number of indexed documents
    pub documents: u32,

    /// Approximate on-disk size in bytes (0 for in-memory backends)
    pub size_bytes: u64,
}

/// Trait for vector store backends.
///
/// Implementations must return matches ordered by descending similarity;
/// ties keep the backend's own order. Lookups never mutate the store.
pub trait VectorStore: Send + Sync {
    /// Search for the top-k most similar documents to the query vector.
    fn query(&self, vector: &[f32], k: usize) -> AppResult<Vec<StoreMatch>>;

    /// Insert or update a document in the index.
    fn upsert(&self, document: &StoreDocument) -> AppResult<()>;

    /// Get statistics about the index.
    fn stats(&self) -> AppResult<StoreStats>;

    /// Reset the index, removing all documents.
    fn reset(&self) -> AppResult<()>;
}

/// Calculate cosine similarity between two vectors.
pub(crate) fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
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
