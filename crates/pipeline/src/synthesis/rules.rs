//! Keyword-triggered rule tables for answer post-processing.
//!
//! When the generation output lacks next steps or related topics, they are
//! filled from these declarative tables instead of re-invoking generation.

use crate::types::StructuredAnswer;

/// Next-step suggestions per trigger term.
const NEXT_STEPS_RULES: &[(&str, &[&str])] = &[
    (
        "entreprise",
        &[
            "Préparer les statuts et la liste des pièces d'immatriculation",
            "Déposer le dossier auprès du centre de formalités des entreprises",
        ],
    ),
    (
        "gaz",
        &[
            "Vérifier le régime d'autorisation applicable au secteur gazier",
            "Identifier l'autorité sectorielle compétente avant tout dépôt",
        ],
    ),
    (
        "permis",
        &[
            "Rassembler les justificatifs exigés pour la demande d'autorisation",
            "Vérifier la durée de validité et les conditions de renouvellement",
        ],
    ),
    (
        "coût",
        &["Demander le barème officiel des frais et redevances en vigueur"],
    ),
    (
        "délai",
        &["Confirmer les délais de traitement auprès de l'administration concernée"],
    ),
];

/// Related-topic suggestions per trigger term.
const RELATED_TOPICS_RULES: &[(&str, &[&str])] = &[
    ("entreprise", &["Formes juridiques des sociétés", "Immatriculation au registre du commerce"]),
    ("gaz", &["Réglementation des hydrocarbures", "Fiscalité pétrolière et gazière"]),
    ("permis", &["Procédures d'autorisation administrative"]),
    ("coût", &["Redevances et droits d'enregistrement"]),
    ("délai", &["Recours en cas de silence de l'administration"]),
];

/// Generic suggestions when no trigger matches.
const DEFAULT_NEXT_STEPS: &[&str] =
    &["Consulter un avocat pour une analyse adaptée à votre situation"];

/// Fill missing next steps and related topics from the rule tables.
pub(crate) fn apply(answer: &mut StructuredAnswer, question: &str) {
    if answer.next_steps.is_empty() {
        answer.next_steps = next_steps_for(question);
    }
    if answer.related_topics.is_empty() {
        answer.related_topics = related_topics_for(question);
    }
}

/// Look up next steps for the question.
pub(crate) fn next_steps_for(question: &str) -> Vec<String> {
    let steps = collect_matches(question, NEXT_STEPS_RULES);
    if steps.is_empty() {
        DEFAULT_NEXT_STEPS.iter().map(|s| s.to_string()).collect()
    } else {
        steps
    }
}

/// Look up related topics for the question.
pub(crate) fn related_topics_for(question: &str) -> Vec<String> {
    collect_matches(question, RELATED_TOPICS_RULES)
}

fn collect_matches(question: &str, table: &[(&str, &[&str])]) -> Vec<String> {
    let lowered = question.to_lowercase();
    let mut collected = Vec::new();

    for (trigger, entries) in table {
        if lowered.contains(trigger) {
            collected.extend(entries.iter().map(|s| s.to_string()));
        }
    }

    collected
}
