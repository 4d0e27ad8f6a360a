//! Embedding provider abstraction.
//!
//! Turns text into fixed-length numeric vectors. The embedding dimension
//! is a pipeline-wide constant, validated once at pipeline construction.

pub mod mock;
pub mod ollama;

pub use mock::MockEmbeddingClient;
pub use ollama::OllamaEmbeddingClient;

use juris_core::AppResult;

/// Bounded wait for a single-text embedding call.
pub const SINGLE_TIMEOUT_SECS: u64 = 30;

/// Bounded wait for a batch embedding call.
pub const BATCH_TIMEOUT_SECS: u64 = 60;

/// Trait for embedding providers.
///
/// Calls on the query path are NOT retried: an embedding failure means the
/// pipeline cannot produce an evidence-backed answer and aborts.
#[async_trait::async_trait]
pub trait EmbeddingClient: Send + Sync {
    /// Get provider name (e.g., "mock", "ollama")
    fn provider_name(&self) -> &str;

    /// Get model identifier
    fn model_name(&self) -> &str;

    /// Get embedding dimensions
    fn dimensions(&self) -> usize;

    /// Generate an embedding for a single text. Bounded at 30s.
    async fn embed(&self, text: &str) -> AppResult<Vec<f32>>;

    /// Generate embeddings for multiple texts. Bounded at 60s.
    async fn embed_batch(&self, texts: &[String]) -> AppResult<Vec<Vec<f32>>>;
}
