//! SearXNG-compatible web search client.
//!
//! Queries a metasearch instance's JSON API. All failures are logged and
//! absorbed into an empty result list.

use crate::types::{RetrievedItem, SourceOrigin};
use crate::websearch::{position_score, WebSearchProvider, MAX_WEB_RESULTS};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

/// Bounded wait for a search call.
const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Response from the SearXNG JSON API.
#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<SearchHit>,
}

/// A single search hit.
#[derive(Debug, Deserialize)]
struct SearchHit {
    #[serde(default)]
    title: String,
    #[serde(default)]
    url: String,
    #[serde(default)]
    content: String,
}

/// Web search client against a SearXNG-compatible endpoint.
pub struct SearxSearchClient {
    client: Client,
    endpoint: String,
}

impl SearxSearchClient {
    /// Create a client for the given instance endpoint.
    pub fn new(endpoint: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            endpoint: endpoint.into(),
        }
    }

    /// Run the search request, surfacing transport/decoding errors.
    async fn search_inner(&self, question: &str) -> Result<Vec<SearchHit>, reqwest::Error> {
        let url = format!("{}/search", self.endpoint);

        let response = self
            .client
            .get(&url)
            .query(&[("q", question), ("format", "json")])
            .send()
            .await?
            .error_for_status()?;

        let body: SearchResponse = response.json().await?;
        Ok(body.results)
    }

    /// Extract a display label from a result URL (its host), falling back
    /// to the page title.
    fn source_label(hit: &SearchHit) -> String {
        hit.url
            .split("//")
            .nth(1)
            .and_then(|rest| rest.split('/').next())
            .filter(|host| !host.is_empty())
            .map(|host| host.to_string())
            .unwrap_or_else(|| hit.title.clone())
    }
}

#[async_trait]
impl WebSearchProvider for SearxSearchClient {
    fn provider_name(&self) -> &str {
        "searx"
    }

    async fn search(&self, question: &str) -> Vec<RetrievedItem> {
        debug!("Web fallback search: {}", question);

        let hits = match self.search_inner(question).await {
            Ok(hits) => hits,
            Err(e) => {
                warn!("Web search failed, continuing without augmentation: {}", e);
                return Vec::new();
            }
        };

        hits.into_iter()
            .filter(|hit| !hit.content.trim().is_empty())
            .take(MAX_WEB_RESULTS)
            .enumerate()
            .map(|(position, hit)| {
                let source_label = Self::source_label(&hit);
                RetrievedItem {
                    id: uuid::Uuid::new_v4().to_string(),
                    content: hit.content,
                    score: position_score(position),
                    origin: SourceOrigin::Web,
                    source_label,
                    metadata: serde_json::json!({ "url": hit.url, "title": hit.title }),
                }
            })
            .collect()
    }
}
