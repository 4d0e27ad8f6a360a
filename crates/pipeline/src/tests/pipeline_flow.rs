//! End-to-end pipeline tests over scripted collaborators.

use crate::cache::ResponseCache;
use crate::embedding::EmbeddingClient;
use crate::pipeline::{PipelineSettings, QueryPipeline};
use crate::store::{StoreDocument, StoreMatch, StoreStats, VectorStore};
use crate::synthesis::Synthesizer;
use crate::types::Query;
use crate::websearch::MockSearchProvider;
use juris_core::{AppError, AppResult};
use juris_llm::{GenerationClient, GenerationRequest, GenerationResponse, GenerationUsage};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Embedder double returning a fixed unit vector.
struct FixedEmbedder {
    fail: bool,
}

#[async_trait::async_trait]
impl EmbeddingClient for FixedEmbedder {
    fn provider_name(&self) -> &str {
        "fixed"
    }

    fn model_name(&self) -> &str {
        "fixed-v1"
    }

    fn dimensions(&self) -> usize {
        4
    }

    async fn embed(&self, _text: &str) -> AppResult<Vec<f32>> {
        if self.fail {
            return Err(AppError::Embedding("provider down".to_string()));
        }
        Ok(vec![1.0, 0.0, 0.0, 0.0])
    }

    async fn embed_batch(&self, texts: &[String]) -> AppResult<Vec<Vec<f32>>> {
        let mut embeddings = Vec::with_capacity(texts.len());
        for text in texts {
            embeddings.push(self.embed(text).await?);
        }
        Ok(embeddings)
    }
}

/// Store double returning preset scores.
struct ScriptedStore {
    scores: Vec<f32>,
    fail: bool,
}

impl VectorStore for ScriptedStore {
    fn query(&self, _vector: &[f32], k: usize) -> AppResult<Vec<StoreMatch>> {
        if self.fail {
            return Err(AppError::Retrieval("store unreachable".to_string()));
        }

        Ok(self
            .scores
            .iter()
            .take(k)
            .enumerate()
            .map(|(i, &score)| StoreMatch {
                id: format!("doc{}", i),
                title: format!("Code des hydrocarbures, art. {}", i + 1),
                content: format!("Dispositions applicables, extrait {}", i + 1),
                score,
                metadata: serde_json::Value::Null,
            })
            .collect())
    }

    fn upsert(&self, _document: &StoreDocument) -> AppResult<()> {
        Ok(())
    }

    fn stats(&self) -> AppResult<StoreStats> {
        Ok(StoreStats {
            documents: self.scores.len() as u32,
            size_bytes: 0,
        })
    }

    fn reset(&self) -> AppResult<()> {
        Ok(())
    }
}

/// Generation double returning a canned structured answer, or failing.
struct ScriptedGeneration {
    payload: Option<String>,
    calls: AtomicUsize,
}

impl ScriptedGeneration {
    fn valid() -> Self {
        Self {
            payload: Some(
                r#"{"title": "Réponse", "content": "Les pièces requises sont listées à l'article 12.",
                    "summary": "Résumé", "disclaimer": "Avertissement", "confidence": "High",
                    "articles": [], "nextSteps": [], "relatedTopics": []}"#
                    .to_string(),
            ),
            calls: AtomicUsize::new(0),
        }
    }

    fn failing() -> Self {
        Self {
            payload: None,
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait::async_trait]
impl GenerationClient for ScriptedGeneration {
    fn provider_name(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, _request: &GenerationRequest) -> AppResult<GenerationResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.payload {
            Some(payload) => Ok(GenerationResponse {
                content: payload.clone(),
                model: "scripted".to_string(),
                usage: GenerationUsage::default(),
                done: true,
            }),
            None => Err(AppError::Generation("provider down".to_string())),
        }
    }
}

struct TestHarness {
    pipeline: QueryPipeline,
    web: Arc<MockSearchProvider>,
    generation: Arc<ScriptedGeneration>,
}

fn harness(scores: Vec<f32>, generation: ScriptedGeneration) -> TestHarness {
    harness_with(scores, generation, Vec::new(), false, false)
}

fn harness_with(
    scores: Vec<f32>,
    generation: ScriptedGeneration,
    web_snippets: Vec<String>,
    embed_fail: bool,
    store_fail: bool,
) -> TestHarness {
    let web = Arc::new(MockSearchProvider::with_snippets(web_snippets));
    let generation = Arc::new(generation);

    let pipeline = QueryPipeline::new(
        Arc::new(FixedEmbedder { fail: embed_fail }),
        Arc::new(ScriptedStore {
            scores,
            fail: store_fail,
        }),
        Some(web.clone()),
        Synthesizer::new(generation.clone(), "llama3"),
        PipelineSettings::default(),
    )
    .unwrap();

    TestHarness {
        pipeline,
        web,
        generation,
    }
}

fn question() -> Query {
    Query::new("Quels documents pour créer une entreprise gazière?")
}

#[tokio::test]
async fn test_strong_evidence_skips_web_fallback() {
    // 4 items at 0.92/0.88/0.81/0.73: quality ≈ 0.835 ≥ 0.8, count ≥ 2
    let h = harness(vec![0.92, 0.88, 0.81, 0.73], ScriptedGeneration::valid());

    let response = h.pipeline.process_query(&question()).await.unwrap();

    assert_eq!(h.web.call_count(), 0);
    assert!(!response.metadata.web_search_used);
    assert_eq!(response.sources.len(), 4);
    assert_eq!(response.metadata.retrieved_count, 4);

    // Vector-only fusion: final scores equal raw scores, ranks 1..4
    for (i, source) in response.sources.iter().enumerate() {
        assert_eq!(source.rank, i + 1);
        assert!((source.final_score - source.item.score).abs() < 1e-6);
    }

    assert!((response.confidence - 0.9175).abs() < 1e-3);
}

#[tokio::test]
async fn test_sparse_evidence_triggers_web_fallback() {
    // One item at 0.9: quality = 0.3 < 0.8 and count < 2
    let h = harness_with(
        vec![0.9],
        ScriptedGeneration::valid(),
        vec!["Extrait web pertinent".to_string()],
        false,
        false,
    );

    let response = h.pipeline.process_query(&question()).await.unwrap();

    assert_eq!(h.web.call_count(), 1);
    assert!(response.metadata.web_search_used);
    assert_eq!(response.metadata.retrieved_count, 2);
    assert_eq!(response.sources.len(), 2);
}

#[tokio::test]
async fn test_web_fallback_trigger_rules() {
    let h = harness(vec![0.9], ScriptedGeneration::valid());

    // quality 0.3 with 1 item: triggered
    assert!(h.pipeline.needs_web_fallback(0.3, 1));
    // 3 items at 0.85: quality 0.85, not triggered
    assert!(!h.pipeline.needs_web_fallback(0.85, 3));
    // high quality but a single item: still triggered
    assert!(h.pipeline.needs_web_fallback(0.95, 1));
}

#[tokio::test]
async fn test_fused_sources_capped_at_five() {
    // 4 weak vector items trigger the fallback; 4 web snippets arrive on top
    let h = harness_with(
        vec![0.72, 0.71, 0.71, 0.7],
        ScriptedGeneration::valid(),
        (0..4).map(|i| format!("web snippet {}", i)).collect(),
        false,
        false,
    );

    let mut query = question();
    query.max_results = 10;

    let response = h.pipeline.process_query(&query).await.unwrap();

    assert_eq!(response.metadata.retrieved_count, 8);
    assert!(response.sources.len() <= 5);

    for pair in response.sources.windows(2) {
        assert!(pair[0].final_score >= pair[1].final_score);
    }
}

#[tokio::test]
async fn test_retrieved_items_respect_min_score() {
    let h = harness(vec![0.95, 0.8, 0.72, 0.5, 0.3], ScriptedGeneration::valid());

    let response = h.pipeline.process_query(&question()).await.unwrap();

    for source in response
        .sources
        .iter()
        .filter(|s| s.item.origin == crate::types::SourceOrigin::Vector)
    {
        assert!(source.item.score >= 0.7);
    }
}

#[tokio::test]
async fn test_generation_failure_still_answers() {
    let h = harness(vec![0.92, 0.88, 0.81], ScriptedGeneration::failing());

    let response = h.pipeline.process_query(&question()).await.unwrap();

    assert!(!response.answer.content.trim().is_empty());
    // Confidence reflects evidence, not the degraded generation path
    assert!(response.confidence > 0.8);
    assert_eq!(h.generation.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_embedding_failure_aborts() {
    let h = harness_with(
        vec![0.9],
        ScriptedGeneration::valid(),
        Vec::new(),
        true,
        false,
    );

    let err = h.pipeline.process_query(&question()).await.unwrap_err();
    assert!(err.is_fatal());
    assert!(matches!(err, AppError::Embedding(_)));
}

#[tokio::test]
async fn test_store_failure_aborts() {
    let h = harness_with(
        vec![0.9],
        ScriptedGeneration::valid(),
        Vec::new(),
        false,
        true,
    );

    let err = h.pipeline.process_query(&question()).await.unwrap_err();
    assert!(err.is_fatal());
    assert!(matches!(err, AppError::Retrieval(_)));
}

#[tokio::test]
async fn test_empty_question_rejected_before_embedding() {
    let h = harness(vec![0.9], ScriptedGeneration::valid());

    let err = h
        .pipeline
        .process_query(&Query::new("  ??? "))
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Config(_)));
}

#[tokio::test]
async fn test_cache_serves_repeated_question() {
    let web = Arc::new(MockSearchProvider::empty());
    let generation = Arc::new(ScriptedGeneration::valid());

    let pipeline = QueryPipeline::new(
        Arc::new(FixedEmbedder { fail: false }),
        Arc::new(ScriptedStore {
            scores: vec![0.92, 0.88, 0.81],
            fail: false,
        }),
        Some(web),
        Synthesizer::new(generation.clone(), "llama3"),
        PipelineSettings::default(),
    )
    .unwrap()
    .with_cache(ResponseCache::new());

    let first = pipeline.process_query(&question()).await.unwrap();
    let second = pipeline.process_query(&question()).await.unwrap();

    assert_eq!(generation.calls.load(Ordering::SeqCst), 1);
    assert_eq!(first.answer.content, second.answer.content);

    // A different context bypasses the cached entry
    let contextual = question().with_context("SARL en cours de création");
    pipeline.process_query(&contextual).await.unwrap();
    assert_eq!(generation.calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_answer_carries_rule_based_suggestions() {
    let h = harness(vec![0.92, 0.88, 0.81], ScriptedGeneration::valid());

    let response = h.pipeline.process_query(&question()).await.unwrap();

    // The scripted payload has empty nextSteps; rule tables must fill them
    assert!(!response.answer.next_steps.is_empty());
    assert!(response
        .answer
        .next_steps
        .iter()
        .any(|s| s.contains("statuts") || s.contains("gazier")));
}
