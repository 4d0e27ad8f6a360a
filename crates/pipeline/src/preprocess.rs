//! Query preprocessing.
//!
//! Normalizes the raw question and broadens it with domain synonyms before
//! embedding. Pure string manipulation; never fails.

/// Synonym expansion table for legal/business domain terms.
///
/// When the normalized question contains a trigger term, the associated
/// synonyms are appended to the query text to broaden vector retrieval.
const SYNONYM_TABLE: &[(&str, &str)] = &[
    (
        "entreprise",
        "société statuts immatriculation registre du commerce",
    ),
    ("société", "entreprise personne morale forme juridique"),
    (
        "gaz",
        "hydrocarbures secteur gazier réglementation pétrolière énergie",
    ),
    ("permis", "autorisation licence agrément habilitation"),
    ("autorisation", "permis licence agrément"),
    ("coût", "frais tarif redevance montant"),
    ("prix", "frais tarif coût montant"),
    ("délai", "durée procédure échéance calendrier"),
];

/// Normalize and expand a raw question.
///
/// Lower-cases, trims, strips trailing punctuation, collapses whitespace,
/// then appends domain synonyms for any trigger term present. Any input
/// produces an output; an empty question maps to an empty string.
pub fn preprocess(raw: &str) -> String {
    let normalized = normalize(raw);
    if normalized.is_empty() {
        return normalized;
    }

    expand(&normalized)
}

/// Lower-case, trim, strip trailing punctuation, collapse whitespace.
fn normalize(raw: &str) -> String {
    let lowered = raw.to_lowercase();
    let trimmed = lowered.trim();
    let stripped = trimmed.trim_end_matches(['?', '!', '.', ';', ':', ',']);

    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Append synonyms for every trigger term found in the normalized text.
fn expand(normalized: &str) -> String {
    let mut expanded = normalized.to_string();

    for (trigger, synonyms) in SYNONYM_TABLE {
        if normalized.contains(trigger) {
            expanded.push(' ');
            expanded.push_str(synonyms);
        }
    }

    expanded
}
