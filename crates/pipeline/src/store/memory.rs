//! In-memory vector store.
//!
//! Backing store for tests and ephemeral setups.

use crate::store::{cosine_similarity, StoreDocument, StoreMatch, StoreStats, VectorStore};
use juris_core::{AppError, AppResult};
use std::sync::RwLock;

/// In-memory vector store with brute-force cosine search.
#[derive(Default)]
pub struct InMemoryStore {
    documents: RwLock<Vec<StoreDocument>>,
}

impl InMemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl VectorStore for InMemoryStore {
    fn query(&self, vector: &[f32], k: usize) -> AppResult<Vec<StoreMatch>> {
        let documents = self
            .documents
            .read()
            .map_err(|_| AppError::Retrieval("Store lock poisoned".to_string()))?;

        let mut results: Vec<StoreMatch> = documents
            .iter()
            .map(|doc| StoreMatch {
                id: doc.id.clone(),
                title: doc.title.clone(),
                content: doc.content.clone(),
                score: cosine_similarity(vector, &doc.embedding),
                metadata: doc.metadata.clone(),
            })
            .collect();

        results.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        results.truncate(k);

        Ok(results)
    }

    fn upsert(&self, document: &StoreDocument) -> AppResult<()> {
        let mut documents = self
            .documents
            .write()
            .map_err(|_| AppError::Retrieval("Store lock poisoned".to_string()))?;

        if let Some(existing) = documents.iter_mut().find(|d| d.id == document.id) {
            *existing = document.clone();
        } else {
            documents.push(document.clone());
        }

        Ok(())
    }

    fn stats(&self) -> AppResult<StoreStats> {
        let documents = self
            .documents
            .read()
            .map_err(|_| AppError::Retrieval("Store lock poisoned".to_string()))?;

        Ok(StoreStats {
            documents: documents.len() as u32,
            size_bytes: 0,
        })
    }

    fn reset(&self) -> AppResult<()> {
        let mut documents = self
            .documents
            .write()
            .map_err(|_| AppError::Retrieval("Store lock poisoned".to_string()))?;

        documents.clear();
        Ok(())
    }
}
