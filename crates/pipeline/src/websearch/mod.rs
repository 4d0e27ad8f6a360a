//! Web fallback search.
//!
//! Supplementary keyword retrieval, invoked only when corpus evidence is
//! weak. Best-effort by contract: provider failures surface as an empty
//! result list, never as an error.

pub mod http;
pub mod mock;

pub use http::SearxSearchClient;
pub use mock::MockSearchProvider;

use crate::types::RetrievedItem;

/// Maximum number of web results kept per search.
pub const MAX_WEB_RESULTS: usize = 5;

/// Heuristic score for a web result at the given 0-based position.
///
/// The search API returns no similarity score, so results are scored by
/// position: the top hit gets 0.9, each following hit 0.1 less, floored
/// at 0.3.
pub(crate) fn position_score(position: usize) -> f32 {
    (0.9 - 0.1 * position as f32).max(0.3)
}

/// Trait for web search providers.
///
/// Implementations absorb every failure: a provider error or empty result
/// set degrades answer quality but never aborts the pipeline.
#[async_trait::async_trait]
pub trait WebSearchProvider: Send + Sync {
    /// Get provider name (e.g., "searx", "mock")
    fn provider_name(&self) -> &str;

    /// Search the web for supplementary evidence.
    async fn search(&self, question: &str) -> Vec<RetrievedItem>;
}
