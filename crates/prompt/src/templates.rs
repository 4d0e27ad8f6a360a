//! Built-in prompt templates.
//!
//! The synthesis prompt ships with the binary so a fresh workspace needs no
//! prompt files. A workspace can override it by placing a YAML definition
//! with the same ID under `.juris/prompts/`.

use crate::types::PromptDefinition;

/// Identifier of the answer-synthesis prompt.
pub const SYNTHESIS_PROMPT_ID: &str = "answer.synthesize.default";

/// System instruction for the synthesis call.
///
/// The generation provider must return a single JSON object matching the
/// structured answer schema; anything else triggers the template fallback.
const SYNTHESIS_SYSTEM: &str = "\
You are a legal information assistant with access to a curated corpus of \
legal texts and supplementary web excerpts.

Instructions:
- Answer ONLY the question that was asked. No generic filler.
- Base the answer strictly on the provided sources.
- When corpus evidence and web evidence cover the same point, prefer the \
corpus evidence.
- Label every cited article or section with its origin as given in the \
source list.
- Answer in the language of the question.
{{#if qualityNote}}- {{qualityNote}}
{{/if}}
Respond with a single JSON object and nothing else, using exactly this \
structure:
{
  \"title\": string,
  \"content\": string,
  \"articles\": [
    {\"number\": string, \"title\": string, \"content\": string, \
\"highlight\": boolean, \"source\": \"vector\" | \"web\"}
  ],
  \"summary\": string,
  \"disclaimer\": string,
  \"confidence\": \"Low\" | \"Medium\" | \"High\",
  \"nextSteps\": [string],
  \"relatedTopics\": [string]
}";

/// User message for the synthesis call.
const SYNTHESIS_TEMPLATE: &str = "\
Question:
{{question}}
{{#if context}}
Additional context from the requester:
{{context}}
{{/if}}
Sources (ranked, most relevant first):
{{sources}}";

/// Built-in synthesis prompt definition.
pub fn default_synthesis_prompt() -> PromptDefinition {
    PromptDefinition {
        id: SYNTHESIS_PROMPT_ID.to_string(),
        title: "Legal answer synthesis".to_string(),
        api_version: "1.0".to_string(),
        created_by: "juris".to_string(),
        system: SYNTHESIS_SYSTEM.to_string(),
        template: SYNTHESIS_TEMPLATE.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_prompt_shape() {
        let def = default_synthesis_prompt();
        assert_eq!(def.id, SYNTHESIS_PROMPT_ID);
        assert!(def.system.contains("single JSON object"));
        assert!(def.system.contains("nextSteps"));
        assert!(def.template.contains("{{question}}"));
        assert!(def.template.contains("{{sources}}"));
    }
}
