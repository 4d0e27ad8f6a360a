//! Evidence quality scoring.

use crate::types::RetrievedItem;

/// Number of items at which evidence quantity saturates.
///
/// Three or more reasonably similar items are treated as sufficient
/// quantity; fewer items linearly discount the score even when individual
/// similarities are high.
pub const EVIDENCE_SATURATION_COUNT: usize = 3;

/// Score a retrieval result set for sufficiency.
///
/// `quality = avg_score × min(count / 3, 1)`, in [0, 1].
/// Zero items score 0. Pure function, no I/O, never fails.
pub fn evaluate(items: &[RetrievedItem]) -> f32 {
    if items.is_empty() {
        return 0.0;
    }

    let avg_score = items.iter().map(|item| item.score).sum::<f32>() / items.len() as f32;
    let count_factor = (items.len() as f32 / EVIDENCE_SATURATION_COUNT as f32).min(1.0);

    avg_score * count_factor
}
