//! Error types for the juris legal answering service.
//!
//! This module defines a unified error enum that covers all error categories
//! in the application. The answer pipeline distinguishes fatal errors (no
//! evidence-backed answer is possible) from degradations it absorbs locally.

use thiserror::Error;

/// Unified error type for the juris service.
///
/// All functions in the application return `Result<T, AppError>`.
/// We never panic — errors must be represented and propagated.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O and filesystem errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Embedding provider errors
    #[error("Embedding error: {0}")]
    Embedding(String),

    /// Embedding call exceeded its bounded wait
    #[error("Embedding request timed out after {seconds}s")]
    EmbeddingTimeout { seconds: u64 },

    /// Vector store errors
    #[error("Retrieval error: {0}")]
    Retrieval(String),

    /// Text-generation provider errors (absorbed by the synthesizer)
    #[error("Generation error: {0}")]
    Generation(String),

    /// Web search provider errors (absorbed by the fallback searcher)
    #[error("Search error: {0}")]
    Search(String),

    /// Prompt rendering errors
    #[error("Prompt error: {0}")]
    Prompt(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic errors
    #[error("{0}")]
    Other(String),
}

impl AppError {
    /// Whether this error aborts the answer pipeline.
    ///
    /// Only embedding failures/timeouts and vector-store failures cross the
    /// pipeline boundary. Everything else is recovered inside the component
    /// that encountered it.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            AppError::Embedding(_) | AppError::EmbeddingTimeout { .. } | AppError::Retrieval(_)
        )
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for AppError {
    fn from(err: serde_yaml::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

/// Convenience type alias for Results with AppError.
pub type AppResult<T> = Result<T, AppError>;
