//! Ollama embedding provider.
//!
//! Provides semantic embeddings via Ollama's local API using models like
//! nomic-embed-text. Query-path calls are single attempts with a bounded
//! wait; retry policy belongs to ingestion, which is not handled here.

use crate::embedding::{EmbeddingClient, BATCH_TIMEOUT_SECS, SINGLE_TIMEOUT_SECS};
use async_trait::async_trait;
use juris_core::{AppError, AppResult};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

/// Ollama API endpoint for embeddings
const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";
const EMBEDDING_ENDPOINT: &str = "/api/embeddings";

/// Ollama embedding client using the local API.
#[derive(Debug, Clone)]
pub struct OllamaEmbeddingClient {
    /// HTTP client for API requests
    client: Client,
    /// Ollama API base URL
    base_url: String,
    /// Model name (e.g., "nomic-embed-text")
    model: String,
    /// Expected embedding dimensions
    dimensions: usize,
}

/// Request payload for Ollama embeddings API
#[derive(Debug, Clone, Serialize)]
struct EmbeddingRequest {
    /// Model name to use
    model: String,
    /// Text to embed
    prompt: String,
}

/// Response from Ollama embeddings API
#[derive(Debug, Clone, Deserialize)]
struct EmbeddingResponse {
    /// Embedding vector
    embedding: Vec<f32>,
}

/// Error response from Ollama API
#[derive(Debug, Clone, Deserialize)]
struct ErrorResponse {
    /// Error message
    error: String,
}

impl OllamaEmbeddingClient {
    /// Create a new Ollama embedding client.
    ///
    /// # Arguments
    /// * `endpoint` - Optional base URL (defaults to the local daemon)
    /// * `model` - Embedding model identifier
    /// * `dimensions` - Expected embedding dimensions
    pub fn new(endpoint: Option<&str>, model: impl Into<String>, dimensions: usize) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(SINGLE_TIMEOUT_SECS))
            .build()
            .unwrap_or_else(|_| Client::new());

        let base_url = endpoint
            .map(|e| e.to_string())
            .or_else(|| std::env::var("OLLAMA_URL").ok())
            .unwrap_or_else(|| DEFAULT_OLLAMA_URL.to_string());

        Self {
            client,
            base_url,
            model: model.into(),
            dimensions,
        }
    }

    /// Embed a single text (one attempt, no retries).
    async fn embed_single(&self, text: &str) -> AppResult<Vec<f32>> {
        let url = format!("{}{}", self.base_url, EMBEDDING_ENDPOINT);

        let request = EmbeddingRequest {
            model: self.model.clone(),
            prompt: text.to_string(),
        };

        debug!("Sending embedding request to {}", url);

        let response = self.client.post(&url).json(&request).send().await.map_err(|e| {
            if e.is_timeout() {
                AppError::EmbeddingTimeout {
                    seconds: SINGLE_TIMEOUT_SECS,
                }
            } else {
                AppError::Embedding(format!("Failed to send request to Ollama: {}", e))
            }
        })?;

        let status = response.status();

        if !status.is_success() {
            // Try to parse error response
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());

            if let Ok(error_response) = serde_json::from_str::<ErrorResponse>(&error_text) {
                return Err(AppError::Embedding(format!(
                    "Ollama API error ({}): {}",
                    status, error_response.error
                )));
            }

            return Err(AppError::Embedding(format!(
                "Ollama API error ({}): {}",
                status, error_text
            )));
        }

        let response_body: EmbeddingResponse = response
            .json()
            .await
            .map_err(|e| AppError::Embedding(format!("Failed to parse Ollama response: {}", e)))?;

        if response_body.embedding.len() != self.dimensions {
            return Err(AppError::Embedding(format!(
                "Unexpected embedding dimensions: got {}, expected {}",
                response_body.embedding.len(),
                self.dimensions
            )));
        }

        debug!(
            "Generated {} dimensional embedding",
            response_body.embedding.len()
        );

        Ok(response_body.embedding)
    }
}

#[async_trait]
impl EmbeddingClient for OllamaEmbeddingClient {
    fn provider_name(&self) -> &str {
        "ollama"
    }

    fn model_name(&self) -> &str {
        &self.model
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    async fn embed(&self, text: &str) -> AppResult<Vec<f32>> {
        if text.trim().is_empty() {
            return Err(AppError::Embedding("Cannot embed empty text".to_string()));
        }

        let bounded = tokio::time::timeout(
            Duration::from_secs(SINGLE_TIMEOUT_SECS),
            self.embed_single(text),
        );

        match bounded.await {
            Ok(result) => result,
            Err(_) => Err(AppError::EmbeddingTimeout {
                seconds: SINGLE_TIMEOUT_SECS,
            }),
        }
    }

    async fn embed_batch(&self, texts: &[String]) -> AppResult<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(vec![]);
        }

        debug!("Embedding batch of {} texts", texts.len());

        let bounded = tokio::time::timeout(Duration::from_secs(BATCH_TIMEOUT_SECS), async {
            // Ollama has no batch API; embed sequentially
            let mut embeddings = Vec::with_capacity(texts.len());

            for (i, text) in texts.iter().enumerate() {
                if text.trim().is_empty() {
                    warn!("Skipping empty text at index {}", i);
                    embeddings.push(vec![0.0; self.dimensions]);
                    continue;
                }

                let embedding = self.embed_single(text).await?;
                embeddings.push(embedding);
            }

            Ok(embeddings)
        });

        match bounded.await {
            Ok(result) => result,
            Err(_) => Err(AppError::EmbeddingTimeout {
                seconds: BATCH_TIMEOUT_SECS,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = OllamaEmbeddingClient::new(None, "nomic-embed-text", 768);
        assert_eq!(client.provider_name(), "ollama");
        assert_eq!(client.model_name(), "nomic-embed-text");
        assert_eq!(client.dimensions(), 768);
    }

    #[test]
    fn test_custom_endpoint() {
        let client = OllamaEmbeddingClient::new(Some("http://embeddings:11434"), "m", 384);
        assert_eq!(client.base_url, "http://embeddings:11434");
    }

    #[tokio::test]
    async fn test_empty_text_rejected() {
        let client = OllamaEmbeddingClient::new(None, "nomic-embed-text", 768);
        let result = client.embed("   ").await;
        assert!(matches!(result, Err(AppError::Embedding(_))));
    }
}
