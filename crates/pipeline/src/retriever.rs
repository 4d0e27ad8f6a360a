//! Vector retrieval with score gating.

use crate::store::VectorStore;
use crate::types::{RetrievedItem, SourceOrigin};
use juris_core::AppResult;
use std::sync::Arc;

/// Over-fetch factor: the store is asked for `2k` neighbors so the score
/// filter can discard weak matches without starving the result set.
const OVERFETCH_FACTOR: usize = 2;

/// Retrieves corpus evidence for a query embedding.
pub struct Retriever {
    store: Arc<dyn VectorStore>,
}

impl Retriever {
    /// Create a retriever over a vector store.
    pub fn new(store: Arc<dyn VectorStore>) -> Self {
        Self { store }
    }

    /// Retrieve up to `k` items with `score ≥ min_score`.
    ///
    /// Requests `2k` nearest neighbors, filters by the score floor,
    /// truncates to `k`, and tags results as corpus evidence. Ordering is
    /// descending by raw similarity; ties keep the store's order. Store
    /// failures propagate — the pipeline aborts without corpus evidence.
    pub fn retrieve(
        &self,
        vector: &[f32],
        k: usize,
        min_score: f32,
    ) -> AppResult<Vec<RetrievedItem>> {
        let candidates = self.store.query(vector, k * OVERFETCH_FACTOR)?;

        tracing::debug!(
            "Retrieved {} candidates before score filtering",
            candidates.len()
        );

        let items: Vec<RetrievedItem> = candidates
            .into_iter()
            .filter(|m| m.score >= min_score)
            .take(k)
            .map(|m| RetrievedItem {
                id: m.id,
                content: m.content,
                score: m.score,
                origin: SourceOrigin::Vector,
                source_label: m.title,
                metadata: m.metadata,
            })
            .collect();

        tracing::info!(
            "Vector retrieval kept {} items (min_score: {:.2})",
            items.len(),
            min_score
        );

        Ok(items)
    }
}
