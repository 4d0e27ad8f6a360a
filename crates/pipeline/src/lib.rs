//! Retrieval-augmented answer pipeline for legal questions.
//!
//! The pipeline normalizes a question, embeds it, retrieves nearest
//! neighbors from a vector store, gates on evidence quality, optionally
//! augments weak evidence with a web search, fuses both source lists,
//! synthesizes a structured answer via a generation provider, and scores
//! confidence.

pub mod cache;
pub mod confidence;
pub mod embedding;
pub mod fusion;
pub mod pipeline;
pub mod preprocess;
pub mod quality;
pub mod retriever;
pub mod store;
pub mod synthesis;
pub mod types;
pub mod websearch;

#[cfg(test)]
mod tests;

// Re-export commonly used types
pub use cache::ResponseCache;
pub use embedding::EmbeddingClient;
pub use pipeline::{PipelineSettings, QueryPipeline};
pub use retriever::Retriever;
pub use store::{StoreMatch, VectorStore};
pub use synthesis::Synthesizer;
pub use types::{
    AnswerConfidence, FusedSource, LegalArticle, PipelineResponse, Query, ResponseMetadata,
    RetrievedItem, SourceOrigin, StructuredAnswer,
};
pub use websearch::WebSearchProvider;
