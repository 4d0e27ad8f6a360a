//! Final confidence scoring.

use crate::quality::EVIDENCE_SATURATION_COUNT;
use crate::types::AnswerConfidence;

/// Derive the final numeric confidence from evidence quality and count.
///
/// `confidence = (quality + min(fused_count / 3, 1)) / 2`, clamped to
/// [0, 1]. Pure and deterministic; independent of whether the synthesizer
/// used its fallback path — it reflects evidence, not generation success.
pub fn estimate(quality: f32, fused_count: usize) -> f32 {
    let count_factor = (fused_count as f32 / EVIDENCE_SATURATION_COUNT as f32).min(1.0);
    ((quality + count_factor) / 2.0).clamp(0.0, 1.0)
}

/// Map a numeric confidence to the label carried by the answer.
pub fn label_for(confidence: f32) -> AnswerConfidence {
    if confidence >= 0.75 {
        AnswerConfidence::High
    } else if confidence >= 0.45 {
        AnswerConfidence::Medium
    } else {
        AnswerConfidence::Low
    }
}
