//! Strict decoding of generation output into a structured answer.

use crate::types::{AnswerConfidence, LegalArticle, StructuredAnswer};
use juris_core::{AppError, AppResult};
use serde::Deserialize;

/// Permissive draft of the generation output.
///
/// Individual fields may be missing; the decode is rejected only when the
/// payload is not a JSON object or carries no usable content.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnswerDraft {
    #[serde(default)]
    title: String,
    #[serde(default)]
    content: String,
    #[serde(default)]
    articles: Vec<LegalArticle>,
    #[serde(default)]
    summary: String,
    #[serde(default)]
    disclaimer: String,
    confidence: Option<AnswerConfidence>,
    #[serde(default)]
    next_steps: Vec<String>,
    #[serde(default)]
    related_topics: Vec<String>,
}

/// Fixed disclaimer applied when the generation output omits one.
pub(crate) const DEFAULT_DISCLAIMER: &str = "Ces informations sont fournies à titre \
indicatif et ne constituent pas un avis juridique. Consultez un avocat pour \
une analyse de votre situation.";

/// Parse generation output into a `StructuredAnswer`.
///
/// Strips markdown fences, extracts the outermost JSON object, and decodes
/// it. Returns an error (never panics) when the payload is not decodable or
/// has empty content — the caller falls back to the template answer.
pub(crate) fn parse_structured(raw: &str) -> AppResult<StructuredAnswer> {
    let json = extract_json(raw).ok_or_else(|| {
        AppError::Generation("Generation output contains no JSON object".to_string())
    })?;

    let draft: AnswerDraft = serde_json::from_str(json)
        .map_err(|e| AppError::Generation(format!("Failed to decode generation output: {}", e)))?;

    if draft.content.trim().is_empty() {
        return Err(AppError::Generation(
            "Generation output has empty content".to_string(),
        ));
    }

    Ok(StructuredAnswer {
        title: if draft.title.trim().is_empty() {
            "Réponse juridique".to_string()
        } else {
            draft.title
        },
        content: draft.content,
        articles: draft.articles,
        summary: draft.summary,
        disclaimer: if draft.disclaimer.trim().is_empty() {
            DEFAULT_DISCLAIMER.to_string()
        } else {
            draft.disclaimer
        },
        confidence: draft.confidence.unwrap_or(AnswerConfidence::Medium),
        next_steps: draft.next_steps,
        related_topics: draft.related_topics,
    })
}

/// Extract the outermost JSON object from raw model output.
///
/// Handles plain JSON, fenced blocks, and leading/trailing prose.
fn extract_json(raw: &str) -> Option<&str> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&raw[start..=end])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SourceOrigin;

    #[test]
    fn test_parse_plain_json() {
        let raw = r#"{
            "title": "Création d'une entreprise gazière",
            "content": "Les pièces requises sont ...",
            "articles": [
                {"number": "Article 12", "title": "Autorisation", "content": "...",
                 "highlight": true, "source": "vector"}
            ],
            "summary": "Résumé",
            "disclaimer": "Avertissement",
            "confidence": "High",
            "nextSteps": ["Préparer les statuts"],
            "relatedTopics": ["Immatriculation"]
        }"#;

        let answer = parse_structured(raw).unwrap();
        assert_eq!(answer.title, "Création d'une entreprise gazière");
        assert_eq!(answer.articles.len(), 1);
        assert_eq!(answer.articles[0].source, SourceOrigin::Vector);
        assert!(answer.articles[0].highlight);
        assert_eq!(answer.confidence, AnswerConfidence::High);
        assert_eq!(answer.next_steps, vec!["Préparer les statuts".to_string()]);
    }

    #[test]
    fn test_parse_fenced_json() {
        let raw = "Here is the answer:\n```json\n{\"content\": \"Réponse\", \"title\": \"T\", \"disclaimer\": \"D\"}\n```";
        let answer = parse_structured(raw).unwrap();
        assert_eq!(answer.content, "Réponse");
        assert_eq!(answer.confidence, AnswerConfidence::Medium);
    }

    #[test]
    fn test_missing_fields_get_defaults() {
        let raw = r#"{"content": "Réponse"}"#;
        let answer = parse_structured(raw).unwrap();
        assert_eq!(answer.title, "Réponse juridique");
        assert_eq!(answer.disclaimer, DEFAULT_DISCLAIMER);
        assert!(answer.articles.is_empty());
    }

    #[test]
    fn test_empty_content_rejected() {
        let raw = r#"{"title": "T", "content": "   "}"#;
        assert!(parse_structured(raw).is_err());
    }

    #[test]
    fn test_no_json_rejected() {
        assert!(parse_structured("I cannot answer that.").is_err());
        assert!(parse_structured("").is_err());
    }

    #[test]
    fn test_malformed_json_rejected() {
        assert!(parse_structured("{\"content\": \"unterminated").is_err());
    }
}
