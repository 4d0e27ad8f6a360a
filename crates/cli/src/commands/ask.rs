//! Ask command handler.
//!
//! Wires the configured collaborators into a pipeline and answers a single
//! legal question.

use clap::Args;
use juris_core::{config::AppConfig, AppError, AppResult};
use juris_pipeline::embedding::{MockEmbeddingClient, OllamaEmbeddingClient};
use juris_pipeline::store::SqliteStore;
use juris_pipeline::websearch::SearxSearchClient;
use juris_pipeline::{
    EmbeddingClient, PipelineSettings, Query, QueryPipeline, ResponseCache, Synthesizer,
    VectorStore, WebSearchProvider,
};
use juris_prompt::{load_prompt, SYNTHESIS_PROMPT_ID};
use std::sync::Arc;
use std::time::Duration;

/// User-facing message for fatal pipeline errors.
const APOLOGY: &str =
    "Le service rencontre des difficultés techniques. Merci de réessayer dans un instant.";

/// Ask a legal question
#[derive(Args, Debug)]
pub struct AskCommand {
    /// The question to ask
    pub question: String,

    /// Additional context for the question (e.g., your situation)
    #[arg(long)]
    pub context: Option<String>,

    /// Requester identifier (for logging)
    #[arg(long)]
    pub user: Option<String>,

    /// Number of sources to retrieve and fuse (capped at 5)
    #[arg(long, default_value = "5")]
    pub max_results: usize,

    /// Minimum similarity score for corpus retrieval (0.0-1.0)
    #[arg(long, default_value = "0.7")]
    pub min_score: f32,

    /// Output the full response envelope as JSON
    #[arg(long)]
    pub json: bool,
}

impl AskCommand {
    /// Execute the ask command.
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing ask command");
        tracing::debug!("Ask command options: {:?}", self);

        let pipeline = build_pipeline(config)?;

        let mut query = Query::new(self.question.clone());
        query.max_results = self.max_results;
        query.min_score = self.min_score;
        query.context = self.context.clone();
        query.user_id = self.user.clone();

        let response = match pipeline.process_query(&query).await {
            Ok(response) => response,
            Err(e) if e.is_fatal() => {
                tracing::error!("Pipeline aborted: {}", e);
                eprintln!("{}", APOLOGY);
                return Err(e);
            }
            Err(e) => return Err(e),
        };

        if self.json {
            let json = serde_json::to_string_pretty(&response)
                .map_err(|e| AppError::Serialization(e.to_string()))?;
            println!("{}", json);
        } else {
            print_answer(&response);
        }

        Ok(())
    }
}

/// Assemble the pipeline from configuration.
fn build_pipeline(config: &AppConfig) -> AppResult<QueryPipeline> {
    config.validate()?;

    // Embedding client
    let embedder: Arc<dyn EmbeddingClient> = match config.embedding.provider.as_str() {
        "ollama" => Arc::new(OllamaEmbeddingClient::new(
            config.embedding.endpoint.as_deref(),
            &config.embedding.model,
            config.embedding.dimensions,
        )),
        "mock" => Arc::new(MockEmbeddingClient::new(config.embedding.dimensions)),
        other => {
            return Err(AppError::Config(format!(
                "Unknown embedding provider: '{}'. Supported providers: ollama, mock",
                other
            )))
        }
    };

    // Vector store
    let store: Arc<dyn VectorStore> = Arc::new(SqliteStore::open(&config.store_path())?);

    // Web fallback searcher (optional)
    let web_search: Option<Arc<dyn WebSearchProvider>> = match &config.web_search {
        settings if settings.enabled => settings
            .endpoint
            .as_ref()
            .map(|endpoint| Arc::new(SearxSearchClient::new(endpoint)) as Arc<dyn WebSearchProvider>),
        _ => None,
    };

    if web_search.is_none() {
        tracing::debug!("Web fallback search disabled or unconfigured");
    }

    // Generation client
    let provider_config = config.get_provider_config(&config.provider)?;
    let endpoint = provider_config.as_ref().and_then(|pc| match pc {
        juris_core::config::ProviderConfig::Ollama { endpoint, .. } => Some(endpoint.as_str()),
        juris_core::config::ProviderConfig::OpenAI { endpoint, .. } => endpoint.as_deref(),
        juris_core::config::ProviderConfig::Claude { endpoint, .. } => endpoint.as_deref(),
    });
    let api_key = config.resolve_api_key(&config.provider)?;

    let generation = juris_llm::create_client(&config.provider, endpoint, api_key.as_deref())
        .map_err(AppError::Config)?;

    // Synthesizer with the workspace synthesis prompt (built-in fallback)
    let prompt = load_prompt(&config.workspace, SYNTHESIS_PROMPT_ID)?;
    let synthesizer = Synthesizer::new(generation, &config.model).with_prompt(prompt);

    let settings = PipelineSettings {
        quality_threshold: config.pipeline.quality_threshold,
        min_evidence_count: config.pipeline.min_evidence_count,
    };

    let mut pipeline = QueryPipeline::new(embedder, store, web_search, synthesizer, settings)?;

    if config.pipeline.cache_ttl_secs > 0 {
        pipeline = pipeline.with_cache(ResponseCache::with_ttl(Duration::from_secs(
            config.pipeline.cache_ttl_secs,
        )));
    }

    Ok(pipeline)
}

/// Print a human-readable answer to stdout.
fn print_answer(response: &juris_pipeline::PipelineResponse) {
    let answer = &response.answer;

    println!("# {}\n", answer.title);
    println!("{}\n", answer.content);

    if !answer.articles.is_empty() {
        println!("## Textes cités\n");
        for article in &answer.articles {
            let marker = if article.highlight { "*" } else { "-" };
            println!(
                "{} {} — {} [{}]",
                marker,
                article.number,
                article.title,
                article.source.label()
            );
        }
        println!();
    }

    if !answer.summary.is_empty() {
        println!("## Résumé\n\n{}\n", answer.summary);
    }

    if !answer.next_steps.is_empty() {
        println!("## Prochaines étapes\n");
        for step in &answer.next_steps {
            println!("- {}", step);
        }
        println!();
    }

    if !response.sources.is_empty() {
        println!("## Sources\n");
        for source in &response.sources {
            println!(
                "{}. {} ({}, score {:.2})",
                source.rank,
                source.item.source_label,
                source.item.origin.label(),
                source.final_score
            );
        }
        println!();
    }

    println!("{}\n", answer.disclaimer);
    println!(
        "Confiance : {:.0}% — {} sources — {}ms",
        response.confidence * 100.0,
        response.sources.len(),
        response.processing_time_ms
    );
}
