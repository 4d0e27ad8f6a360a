//! Deterministic template answer.
//!
//! Assembled from the top fused sources when generation fails, times out,
//! or returns an undecodable payload. Local string manipulation only; this
//! path must never fail.

use crate::confidence;
use crate::synthesis::parse::DEFAULT_DISCLAIMER;
use crate::types::{FusedSource, LegalArticle, StructuredAnswer};

/// Number of sources quoted in the template answer.
const FALLBACK_SOURCE_COUNT: usize = 3;

/// Maximum characters quoted per source.
const FALLBACK_SNIPPET_CHARS: usize = 300;

/// Build the template answer from the top fused sources.
pub(crate) fn build_fallback(
    question: &str,
    sources: &[FusedSource],
    quality: f32,
) -> StructuredAnswer {
    let quoted: Vec<&FusedSource> = sources.iter().take(FALLBACK_SOURCE_COUNT).collect();

    let content = if quoted.is_empty() {
        format!(
            "Aucun extrait pertinent n'a été trouvé pour la question « {} ». \
             Reformulez la question ou consultez directement les textes applicables.",
            question
        )
    } else {
        let mut body = String::from(
            "La réponse générée n'est pas disponible. Voici les extraits les plus \
             pertinents des textes trouvés :\n",
        );
        for source in &quoted {
            body.push_str(&format!(
                "\n[{}] {} ({}) : {}\n",
                source.rank,
                source.item.source_label,
                source.item.origin.label(),
                truncate_chars(&source.item.content, FALLBACK_SNIPPET_CHARS)
            ));
        }
        body
    };

    let articles = quoted
        .iter()
        .map(|source| LegalArticle {
            number: format!("Source {}", source.rank),
            title: source.item.source_label.clone(),
            content: truncate_chars(&source.item.content, FALLBACK_SNIPPET_CHARS),
            highlight: source.rank == 1,
            source: source.item.origin,
        })
        .collect();

    let numeric = confidence::estimate(quality, sources.len());

    StructuredAnswer {
        title: "Extraits des textes disponibles".to_string(),
        content,
        articles,
        summary: format!("Extraits bruts en réponse à : {}", question),
        disclaimer: DEFAULT_DISCLAIMER.to_string(),
        confidence: confidence::label_for(numeric),
        next_steps: Vec::new(),
        related_topics: Vec::new(),
    }
}

/// Truncate to at most `max_chars` characters, respecting char boundaries.
fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => format!("{}...", &text[..byte_index]),
        None => text.to_string(),
    }
}
