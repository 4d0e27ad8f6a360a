//! Multi-source fusion and ranking.

use crate::types::{FusedSource, RetrievedItem, MAX_FUSED_SOURCES};

/// Merge vector and web evidence into one ranked, capped list.
///
/// Each item's `final_score` is its raw score times the origin weight
/// (1.0 for corpus evidence, 0.7 for web). The combined list is sorted
/// descending by `final_score`, assigned 1-based ranks, and truncated to
/// `min(cap, 5)`. Deterministic given its inputs; no I/O.
pub fn fuse(
    vector_items: Vec<RetrievedItem>,
    web_items: Vec<RetrievedItem>,
    cap: usize,
) -> Vec<FusedSource> {
    let mut fused: Vec<FusedSource> = vector_items
        .into_iter()
        .chain(web_items)
        .map(|item| {
            let final_score = item.score * item.origin.weight();
            FusedSource {
                item,
                final_score,
                rank: 0,
            }
        })
        .collect();

    fused.sort_by(|a, b| {
        b.final_score
            .partial_cmp(&a.final_score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    fused.truncate(cap.min(MAX_FUSED_SOURCES));

    for (index, source) in fused.iter_mut().enumerate() {
        source.rank = index + 1;
    }

    fused
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SourceOrigin;

    fn item(id: &str, score: f32, origin: SourceOrigin) -> RetrievedItem {
        RetrievedItem {
            id: id.to_string(),
            content: format!("content {}", id),
            score,
            origin,
            source_label: origin.label().to_string(),
            metadata: serde_json::Value::Null,
        }
    }

    #[test]
    fn test_origin_weighting() {
        let fused = fuse(
            vec![item("v1", 0.8, SourceOrigin::Vector)],
            vec![item("w1", 0.8, SourceOrigin::Web)],
            5,
        );

        assert_eq!(fused.len(), 2);
        // Same raw score: corpus evidence outranks web evidence
        assert_eq!(fused[0].item.id, "v1");
        assert!((fused[0].final_score - 0.8).abs() < 1e-6);
        assert!((fused[1].final_score - 0.56).abs() < 1e-6);
    }

    #[test]
    fn test_ranks_strictly_increasing_from_one() {
        let fused = fuse(
            vec![
                item("v1", 0.9, SourceOrigin::Vector),
                item("v2", 0.7, SourceOrigin::Vector),
            ],
            vec![item("w1", 0.95, SourceOrigin::Web)],
            5,
        );

        for (i, source) in fused.iter().enumerate() {
            assert_eq!(source.rank, i + 1);
        }
    }

    #[test]
    fn test_final_scores_non_increasing() {
        let fused = fuse(
            vec![
                item("v1", 0.73, SourceOrigin::Vector),
                item("v2", 0.92, SourceOrigin::Vector),
                item("v3", 0.81, SourceOrigin::Vector),
            ],
            vec![
                item("w1", 0.9, SourceOrigin::Web),
                item("w2", 0.5, SourceOrigin::Web),
            ],
            5,
        );

        for pair in fused.windows(2) {
            assert!(pair[0].final_score >= pair[1].final_score);
        }
    }

    #[test]
    fn test_cap_applies_even_when_inputs_exceed_it() {
        let vector_items = (0..4)
            .map(|i| item(&format!("v{}", i), 0.9 - i as f32 * 0.01, SourceOrigin::Vector))
            .collect();
        let web_items = (0..4)
            .map(|i| item(&format!("w{}", i), 0.8 - i as f32 * 0.01, SourceOrigin::Web))
            .collect();

        let fused = fuse(vector_items, web_items, 10);
        assert_eq!(fused.len(), MAX_FUSED_SOURCES);
    }

    #[test]
    fn test_requested_cap_below_hard_limit() {
        let vector_items = (0..4)
            .map(|i| item(&format!("v{}", i), 0.9, SourceOrigin::Vector))
            .collect();

        let fused = fuse(vector_items, Vec::new(), 2);
        assert_eq!(fused.len(), 2);
    }

    #[test]
    fn test_empty_inputs() {
        assert!(fuse(Vec::new(), Vec::new(), 5).is_empty());
    }
}
