//! Pipeline orchestration.
//!
//! Sequences preprocessing, embedding, retrieval, quality gating, the
//! conditional web fallback, fusion, synthesis, and confidence scoring,
//! and assembles the response envelope. Each invocation is stateless and
//! independent; collaborators are shared behind `Arc`s.

use crate::cache::ResponseCache;
use crate::embedding::EmbeddingClient;
use crate::retriever::Retriever;
use crate::store::VectorStore;
use crate::synthesis::Synthesizer;
use crate::types::{PipelineResponse, Query, ResponseMetadata};
use crate::websearch::WebSearchProvider;
use crate::{confidence, fusion, preprocess, quality};
use juris_core::{AppError, AppResult};
use std::sync::Arc;
use std::time::Instant;

/// Tunable pipeline heuristics.
///
/// Defaults reproduce the observed production constants; they have no
/// documented derivation and should be treated as tunable.
#[derive(Debug, Clone)]
pub struct PipelineSettings {
    /// Quality score below which the web fallback is triggered
    pub quality_threshold: f32,

    /// Minimum vector result count before the web fallback is triggered
    pub min_evidence_count: usize,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            quality_threshold: 0.8,
            min_evidence_count: 2,
        }
    }
}

/// The retrieval-augmented answer pipeline.
pub struct QueryPipeline {
    embedder: Arc<dyn EmbeddingClient>,
    retriever: Retriever,
    web_search: Option<Arc<dyn WebSearchProvider>>,
    synthesizer: Synthesizer,
    cache: Option<ResponseCache>,
    settings: PipelineSettings,
}

impl QueryPipeline {
    /// Assemble a pipeline from its collaborators.
    ///
    /// The embedding dimension is validated here, once, so a misconfigured
    /// provider fails at startup rather than on the first question.
    pub fn new(
        embedder: Arc<dyn EmbeddingClient>,
        store: Arc<dyn VectorStore>,
        web_search: Option<Arc<dyn WebSearchProvider>>,
        synthesizer: Synthesizer,
        settings: PipelineSettings,
    ) -> AppResult<Self> {
        if embedder.dimensions() == 0 {
            return Err(AppError::Config(format!(
                "Embedding provider '{}' reports zero dimensions",
                embedder.provider_name()
            )));
        }

        Ok(Self {
            embedder,
            retriever: Retriever::new(store),
            web_search,
            synthesizer,
            cache: None,
            settings,
        })
    }

    /// Attach a response cache.
    pub fn with_cache(mut self, cache: ResponseCache) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Whether the web fallback must run for this evidence set.
    pub fn needs_web_fallback(&self, quality_score: f32, vector_count: usize) -> bool {
        quality_score < self.settings.quality_threshold
            || vector_count < self.settings.min_evidence_count
    }

    /// Answer a question.
    ///
    /// Fails only on embedding errors/timeouts and vector-store errors;
    /// every other degradation is absorbed and the caller receives a
    /// complete `PipelineResponse`.
    pub async fn process_query(&self, query: &Query) -> AppResult<PipelineResponse> {
        query.validate()?;

        let started = Instant::now();

        // Preprocessing
        let normalized = preprocess::preprocess(&query.question);
        if normalized.is_empty() {
            return Err(AppError::Config("Question must not be empty".to_string()));
        }

        if let Some(cache) = &self.cache {
            if let Some(cached) = cache.get(&normalized, query.context.as_deref()) {
                tracing::info!("Serving cached answer for repeated question");
                return Ok(cached);
            }
        }

        tracing::debug!("Normalized question: {}", normalized);

        // Embedding (fatal on failure)
        let vector = self.embedder.embed(&normalized).await?;

        // Retrieval (fatal on failure)
        let vector_items =
            self.retriever
                .retrieve(&vector, query.max_results, query.min_score)?;

        // Quality gating
        let quality_score = quality::evaluate(&vector_items);

        tracing::info!(
            "Evidence quality {:.3} from {} corpus items",
            quality_score,
            vector_items.len()
        );

        // Conditional web fallback (best-effort)
        let mut web_search_used = false;
        let web_items = match &self.web_search {
            Some(provider) if self.needs_web_fallback(quality_score, vector_items.len()) => {
                web_search_used = true;
                tracing::info!("Corpus evidence weak, invoking web fallback search");
                provider.search(&query.question).await
            }
            _ => Vec::new(),
        };

        let retrieved_count = vector_items.len() + web_items.len();

        // Fusion
        let fused = fusion::fuse(vector_items, web_items, query.max_results);

        // Synthesis (never fails)
        let answer = self
            .synthesizer
            .synthesize(
                &query.question,
                query.context.as_deref(),
                &fused,
                quality_score,
            )
            .await;

        // Confidence scoring
        let confidence = confidence::estimate(quality_score, fused.len());

        let response = PipelineResponse {
            answer,
            sources: fused,
            processing_time_ms: started.elapsed().as_millis() as u64,
            confidence,
            metadata: ResponseMetadata {
                retrieved_count,
                web_search_used,
                embedding_dimensions: self.embedder.dimensions(),
                model_id: self.synthesizer.model_id().to_string(),
            },
        };

        if let Some(cache) = &self.cache {
            cache.insert(&normalized, query.context.as_deref(), &response);
        }

        tracing::info!(
            "Answered in {}ms (confidence {:.3}, {} sources, web fallback: {})",
            response.processing_time_ms,
            response.confidence,
            response.sources.len(),
            web_search_used
        );

        Ok(response)
    }
}
