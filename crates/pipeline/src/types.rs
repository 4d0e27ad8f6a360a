//! Answer pipeline type definitions.

use juris_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};

/// Maximum number of fused sources in a response, regardless of request.
pub const MAX_FUSED_SOURCES: usize = 5;

/// An inbound question for the answer pipeline.
///
/// Immutable per request; the pipeline never persists it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Query {
    /// The natural-language question
    pub question: String,

    /// Optional requester identifier (for logging only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,

    /// Optional free-form context supplied by the requester
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,

    /// Number of sources to retrieve and fuse
    pub max_results: usize,

    /// Minimum similarity score for vector retrieval
    pub min_score: f32,
}

impl Query {
    /// Create a query with default retrieval parameters.
    pub fn new(question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            user_id: None,
            context: None,
            max_results: MAX_FUSED_SOURCES,
            min_score: 0.7,
        }
    }

    /// Set the requester context.
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Set the requester identifier.
    pub fn with_user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    /// Validate request invariants.
    pub fn validate(&self) -> AppResult<()> {
        if self.max_results == 0 {
            return Err(AppError::Config(
                "max_results must be at least 1".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.min_score) {
            return Err(AppError::Config(format!(
                "min_score must be within [0, 1], got {}",
                self.min_score
            )));
        }
        Ok(())
    }
}

/// Where a retrieved item came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceOrigin {
    /// Curated corpus, retrieved by vector similarity
    Vector,
    /// Supplementary web search result
    Web,
}

impl SourceOrigin {
    /// Fusion weight: corpus evidence is authoritative, web corroborating.
    pub fn weight(&self) -> f32 {
        match self {
            SourceOrigin::Vector => 1.0,
            SourceOrigin::Web => 0.7,
        }
    }

    /// Label used in prompts and source listings.
    pub fn label(&self) -> &'static str {
        match self {
            SourceOrigin::Vector => "corpus",
            SourceOrigin::Web => "web",
        }
    }
}

/// A single piece of retrieved evidence.
///
/// Produced by the vector retriever or the web fallback searcher;
/// read-only once created.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RetrievedItem {
    /// Stable identifier (store document ID or generated for web results)
    pub id: String,

    /// Text content of the evidence
    pub content: String,

    /// Similarity or heuristic relevance score in [0, 1]
    pub score: f32,

    /// Retrieval origin
    pub origin: SourceOrigin,

    /// Human-readable source name (document title or web host)
    pub source_label: String,

    /// Free-form metadata carried through from the source
    #[serde(default)]
    pub metadata: serde_json::Value,
}

/// A retrieved item after fusion, with its origin-weighted score and rank.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FusedSource {
    /// The underlying evidence
    #[serde(flatten)]
    pub item: RetrievedItem,

    /// Origin-weighted score used for ranking
    pub final_score: f32,

    /// 1-based rank in the fused list
    pub rank: usize,
}

/// A cited article or section inside a structured answer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LegalArticle {
    /// Article/section number as cited (e.g., "Article 12")
    #[serde(default)]
    pub number: String,

    /// Article title
    #[serde(default)]
    pub title: String,

    /// Relevant article content
    #[serde(default)]
    pub content: String,

    /// Whether the answer hinges on this article
    #[serde(default)]
    pub highlight: bool,

    /// Origin of the evidence backing this article
    pub source: SourceOrigin,
}

/// Confidence label attached to a structured answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnswerConfidence {
    Low,
    Medium,
    High,
}

/// The synthesized answer, generated or assembled from a fallback template.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructuredAnswer {
    /// Short answer title
    pub title: String,

    /// Main answer body
    pub content: String,

    /// Cited articles/sections
    #[serde(default)]
    pub articles: Vec<LegalArticle>,

    /// One-paragraph summary
    #[serde(default)]
    pub summary: String,

    /// Legal disclaimer
    pub disclaimer: String,

    /// Confidence label
    pub confidence: AnswerConfidence,

    /// Suggested follow-up actions
    #[serde(default)]
    pub next_steps: Vec<String>,

    /// Related legal topics
    #[serde(default)]
    pub related_topics: Vec<String>,
}

/// Diagnostic metadata attached to every pipeline response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseMetadata {
    /// Total evidence items retrieved (vector + web) before fusion
    pub retrieved_count: usize,

    /// Whether the web fallback searcher was invoked
    pub web_search_used: bool,

    /// Embedding dimension used for retrieval
    pub embedding_dimensions: usize,

    /// Generation model identifier
    pub model_id: String,
}

/// The pipeline's final output envelope.
///
/// Ephemeral; the caller decides whether to store it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineResponse {
    /// The synthesized answer
    pub answer: StructuredAnswer,

    /// Fused evidence, ranked
    pub sources: Vec<FusedSource>,

    /// Wall-clock duration of the pipeline run
    pub processing_time_ms: u64,

    /// Numeric confidence derived from evidence quality and count
    pub confidence: f32,

    /// Diagnostic metadata
    pub metadata: ResponseMetadata,
}
