//! Read-through response cache.
//!
//! Pure optimization wrapping the orchestrator, keyed by the normalized
//! question and the request context. An entry is never served across
//! distinct contexts, and expires after a short TTL. Injectable and safe
//! to omit.

use crate::types::PipelineResponse;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Default entry lifetime.
const DEFAULT_TTL_SECS: u64 = 300;

/// Maximum number of cached entries.
const DEFAULT_CAPACITY: usize = 256;

struct CacheEntry {
    response: PipelineResponse,
    inserted_at: Instant,
}

/// Bounded TTL cache for pipeline responses.
pub struct ResponseCache {
    entries: Mutex<HashMap<(String, String), CacheEntry>>,
    ttl: Duration,
    capacity: usize,
}

impl ResponseCache {
    /// Create a cache with the default TTL (5 minutes) and capacity.
    pub fn new() -> Self {
        Self::with_ttl(Duration::from_secs(DEFAULT_TTL_SECS))
    }

    /// Create a cache with a custom TTL.
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl,
            capacity: DEFAULT_CAPACITY,
        }
    }

    fn key(normalized_question: &str, context: Option<&str>) -> (String, String) {
        (
            normalized_question.to_string(),
            context.unwrap_or_default().to_string(),
        )
    }

    /// Look up a fresh entry for the question/context pair.
    pub fn get(
        &self,
        normalized_question: &str,
        context: Option<&str>,
    ) -> Option<PipelineResponse> {
        let entries = self.entries.lock().ok()?;
        let entry = entries.get(&Self::key(normalized_question, context))?;

        if entry.inserted_at.elapsed() > self.ttl {
            return None;
        }

        Some(entry.response.clone())
    }

    /// Insert a response for the question/context pair.
    ///
    /// When at capacity, expired entries are pruned first; if none are
    /// expired the insert is skipped rather than evicting live entries.
    pub fn insert(
        &self,
        normalized_question: &str,
        context: Option<&str>,
        response: &PipelineResponse,
    ) {
        let Ok(mut entries) = self.entries.lock() else {
            return;
        };

        if entries.len() >= self.capacity {
            let ttl = self.ttl;
            entries.retain(|_, entry| entry.inserted_at.elapsed() <= ttl);

            if entries.len() >= self.capacity {
                tracing::debug!("Response cache full, skipping insert");
                return;
            }
        }

        entries.insert(
            Self::key(normalized_question, context),
            CacheEntry {
                response: response.clone(),
                inserted_at: Instant::now(),
            },
        );
    }
}

impl Default for ResponseCache {
    fn default() -> Self {
        Self::new()
    }
}
