//! Mock web search provider for tests.

use crate::types::{RetrievedItem, SourceOrigin};
use crate::websearch::{position_score, WebSearchProvider};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Mock provider returning canned results and counting invocations.
#[derive(Default)]
pub struct MockSearchProvider {
    snippets: Vec<String>,
    calls: AtomicUsize,
}

impl MockSearchProvider {
    /// Provider returning no results.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Provider returning one canned result per snippet, in order.
    pub fn with_snippets(snippets: Vec<String>) -> Self {
        Self {
            snippets,
            calls: AtomicUsize::new(0),
        }
    }

    /// How many times `search` was invoked.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl WebSearchProvider for MockSearchProvider {
    fn provider_name(&self) -> &str {
        "mock"
    }

    async fn search(&self, _question: &str) -> Vec<RetrievedItem> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        self.snippets
            .iter()
            .enumerate()
            .map(|(position, snippet)| RetrievedItem {
                id: format!("web-{}", position),
                content: snippet.clone(),
                score: position_score(position),
                origin: SourceOrigin::Web,
                source_label: "example.org".to_string(),
                metadata: serde_json::Value::Null,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_empty_provider() {
        let provider = MockSearchProvider::empty();
        assert!(provider.search("q").await.is_empty());
        assert_eq!(provider.call_count(), 1);
    }

    #[tokio::test]
    async fn test_snippets_are_scored_by_position() {
        let provider =
            MockSearchProvider::with_snippets(vec!["a".to_string(), "b".to_string()]);
        let results = provider.search("q").await;

        assert_eq!(results.len(), 2);
        assert!(results[0].score > results[1].score);
        assert_eq!(results[0].origin, SourceOrigin::Web);
    }
}
