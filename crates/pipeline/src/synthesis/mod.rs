//! Answer synthesis.
//!
//! Builds the instruction prompt from fused sources, obtains a generated
//! answer from the text-generation provider, and decodes it into a
//! structured answer. Every failure on this path degrades to a
//! deterministic template answer; synthesis itself never fails.

mod fallback;
mod parse;
mod rules;

use crate::types::{FusedSource, StructuredAnswer};
use juris_llm::{GenerationClient, GenerationRequest};
use juris_prompt::{build_prompt, default_synthesis_prompt, PromptDefinition};
use std::collections::HashMap;
use std::sync::Arc;

/// Sampling temperature for factual legal answers.
const SYNTHESIS_TEMPERATURE: f32 = 0.3;

/// Token budget for the generated answer.
const SYNTHESIS_MAX_TOKENS: u32 = 1500;

/// Quality score below which the prompt asks for explicit caution.
const CAUTION_QUALITY_THRESHOLD: f32 = 0.5;

/// Synthesizes structured answers from fused evidence.
pub struct Synthesizer {
    client: Arc<dyn GenerationClient>,
    model: String,
    prompt: PromptDefinition,
}

impl Synthesizer {
    /// Create a synthesizer with the built-in synthesis prompt.
    pub fn new(client: Arc<dyn GenerationClient>, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
            prompt: default_synthesis_prompt(),
        }
    }

    /// Override the synthesis prompt (e.g., a workspace-loaded definition).
    pub fn with_prompt(mut self, prompt: PromptDefinition) -> Self {
        self.prompt = prompt;
        self
    }

    /// Generation model identifier.
    pub fn model_id(&self) -> &str {
        &self.model
    }

    /// Synthesize a structured answer. Never fails.
    ///
    /// On generation failure, timeout, or an undecodable payload, the
    /// deterministic template answer is returned instead. Next steps and
    /// related topics missing from the generated output are filled from
    /// rule tables.
    pub async fn synthesize(
        &self,
        question: &str,
        context: Option<&str>,
        sources: &[FusedSource],
        quality: f32,
    ) -> StructuredAnswer {
        let mut answer = match self.generate(question, context, sources, quality).await {
            Ok(answer) => answer,
            Err(e) => {
                tracing::warn!("Answer generation degraded to template fallback: {}", e);
                fallback::build_fallback(question, sources, quality)
            }
        };

        rules::apply(&mut answer, question);

        answer
    }

    /// Run the single generation call and decode its output.
    async fn generate(
        &self,
        question: &str,
        context: Option<&str>,
        sources: &[FusedSource],
        quality: f32,
    ) -> juris_core::AppResult<StructuredAnswer> {
        let mut variables = HashMap::new();
        variables.insert("question".to_string(), question.to_string());
        variables.insert("sources".to_string(), build_context_block(sources));

        if let Some(context) = context {
            variables.insert("context".to_string(), context.to_string());
        }

        if quality < CAUTION_QUALITY_THRESHOLD {
            variables.insert(
                "qualityNote".to_string(),
                "The available evidence is limited; state clearly what the \
                 sources do and do not establish."
                    .to_string(),
            );
        }

        let built = build_prompt(&self.prompt, variables)?;

        let mut request = GenerationRequest::new(built.user, &self.model)
            .with_temperature(SYNTHESIS_TEMPERATURE)
            .with_max_tokens(SYNTHESIS_MAX_TOKENS);

        if let Some(system) = built.system {
            request = request.with_system(system);
        }

        let response = self.client.complete(&request).await?;

        tracing::debug!(
            "Generation returned {} chars, decoding structured answer",
            response.content.len()
        );

        parse::parse_structured(&response.content)
    }
}

/// Concatenate fused sources into the prompt's evidence block.
///
/// Each source is labelled with its rank, origin, and score so the model
/// can weigh and cite it.
fn build_context_block(sources: &[FusedSource]) -> String {
    if sources.is_empty() {
        return "(no sources found)".to_string();
    }

    sources
        .iter()
        .map(|source| {
            format!(
                "[{}] ({}, score {:.2}) {} — {}",
                source.rank,
                source.item.origin.label(),
                source.item.score,
                source.item.source_label,
                source.item.content
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{RetrievedItem, SourceOrigin};
    use juris_core::{AppError, AppResult};
    use juris_llm::{GenerationResponse, GenerationUsage};

    /// Generation double returning a canned payload or failing.
    struct FixedGeneration {
        payload: Option<String>,
    }

    #[async_trait::async_trait]
    impl GenerationClient for FixedGeneration {
        fn provider_name(&self) -> &str {
            "fixed"
        }

        async fn complete(&self, _request: &GenerationRequest) -> AppResult<GenerationResponse> {
            match &self.payload {
                Some(payload) => Ok(GenerationResponse {
                    content: payload.clone(),
                    model: "fixed".to_string(),
                    usage: GenerationUsage::default(),
                    done: true,
                }),
                None => Err(AppError::Generation("provider down".to_string())),
            }
        }
    }

    fn fused(rank: usize, origin: SourceOrigin) -> FusedSource {
        FusedSource {
            item: RetrievedItem {
                id: format!("doc{}", rank),
                content: "Les activités gazières sont soumises à autorisation.".to_string(),
                score: 0.9,
                origin,
                source_label: "Code des hydrocarbures".to_string(),
                metadata: serde_json::Value::Null,
            },
            final_score: 0.9 * origin.weight(),
            rank,
        }
    }

    #[test]
    fn test_context_block_labels_origin_and_score() {
        let block = build_context_block(&[
            fused(1, SourceOrigin::Vector),
            fused(2, SourceOrigin::Web),
        ]);

        assert!(block.contains("[1] (corpus, score 0.90)"));
        assert!(block.contains("[2] (web, score 0.90)"));
    }

    #[tokio::test]
    async fn test_valid_generation_output_is_used() {
        let synthesizer = Synthesizer::new(
            Arc::new(FixedGeneration {
                payload: Some(
                    r#"{"title": "T", "content": "Réponse générée", "disclaimer": "D",
                        "confidence": "High"}"#
                        .to_string(),
                ),
            }),
            "llama3",
        );

        let answer = synthesizer
            .synthesize("question permis", None, &[fused(1, SourceOrigin::Vector)], 0.9)
            .await;

        assert_eq!(answer.content, "Réponse générée");
        // Rule tables fill what the model omitted
        assert!(!answer.next_steps.is_empty());
    }

    #[tokio::test]
    async fn test_provider_failure_falls_back_to_template() {
        let synthesizer = Synthesizer::new(Arc::new(FixedGeneration { payload: None }), "llama3");

        let answer = synthesizer
            .synthesize("question", None, &[fused(1, SourceOrigin::Vector)], 0.9)
            .await;

        assert!(!answer.content.trim().is_empty());
        assert!(answer.content.contains("extraits"));
    }

    #[tokio::test]
    async fn test_unparsable_output_falls_back_to_template() {
        let synthesizer = Synthesizer::new(
            Arc::new(FixedGeneration {
                payload: Some("Je ne peux pas répondre.".to_string()),
            }),
            "llama3",
        );

        let answer = synthesizer
            .synthesize("question", None, &[fused(1, SourceOrigin::Vector)], 0.9)
            .await;

        assert!(!answer.content.trim().is_empty());
        assert_eq!(answer.articles.len(), 1);
    }
}
