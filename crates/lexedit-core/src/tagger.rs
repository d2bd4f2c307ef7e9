//! Keyword heuristics over plain text
//!
//! Used for prompt and UI context only; nothing here affects correctness.

use crate::types::{ContentMetrics, DocumentCategory};
use indexmap::IndexSet;
use once_cell::sync::Lazy;
use regex::Regex;

const ELEMENT_GROUPS: &[&str] = &[
    r"\b(whereas|hereby|therefore|notwithstanding)\b",
    r"\b(party|parties|agreement|contract|clause|section)\b",
    r"\b(liability|damages|indemnification|warranty)\b",
    r"\b(jurisdiction|governing law|venue|arbitration)\b",
    r"\b(confidentiality|non-disclosure|proprietary)\b",
    r"\b(termination|breach|remedy|enforcement)\b",
    r"\b(consideration|performance|obligation|duty)\b",
    r"\b(force majeure|act of god|unforeseen circumstances)\b",
    r"\b(severability|entire agreement|modification)\b",
    r"\b(notice|communication|delivery|service)\b",
];

static ELEMENT_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    ELEMENT_GROUPS
        .iter()
        .map(|p| Regex::new(&format!("(?i){p}")).expect("legal element regex"))
        .collect()
});

/// Category keyword groups; the first group with a hit wins
const CATEGORY_GROUPS: &[(&[&str], DocumentCategory)] = &[
    (&["agreement", "contract"], DocumentCategory::Contract),
    (&["motion", "court"], DocumentCategory::Motion),
    (&["brief", "argument"], DocumentCategory::Brief),
    (&["settlement", "mediation"], DocumentCategory::Agreement),
];

static SENTENCE_END: Lazy<Regex> = Lazy::new(|| Regex::new(r"[.!?]+").expect("sentence regex"));

static PARAGRAPH_BREAK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n\s*\n").expect("paragraph regex"));

/// Legal keywords in `text`, lower-cased and de-duplicated in first-seen order
///
/// Groups are scanned in order, so matches are ordered by group first.
#[must_use]
pub fn legal_elements(text: &str) -> Vec<String> {
    let mut seen = IndexSet::new();
    for pattern in ELEMENT_PATTERNS.iter() {
        for m in pattern.find_iter(text) {
            seen.insert(m.as_str().to_lowercase());
        }
    }
    seen.into_iter().collect()
}

/// Infer the document category from keyword presence
#[must_use]
pub fn detect_category(text: &str) -> Option<DocumentCategory> {
    let lower = text.to_lowercase();
    CATEGORY_GROUPS
        .iter()
        .find(|(words, _)| words.iter().any(|w| lower.contains(w)))
        .map(|(_, category)| *category)
}

/// Word, character, sentence and paragraph counts
#[must_use]
pub fn content_metrics(text: &str) -> ContentMetrics {
    ContentMetrics {
        word_count: text.split_whitespace().count(),
        character_count: text.chars().count(),
        sentence_count: SENTENCE_END
            .split(text)
            .filter(|s| !s.trim().is_empty())
            .count(),
        paragraph_count: PARAGRAPH_BREAK
            .split(text)
            .filter(|p| !p.trim().is_empty())
            .count(),
    }
}
