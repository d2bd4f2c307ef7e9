//! Confidence scoring and change detection
//!
//! Both are advisory metadata for the caller and never gate an apply.

use crate::cascade::RepairStrategy;
use lexedit_document::StructuredNode;

/// Commands containing one of these verbs are expected to change the text
pub const REWRITE_VERBS: &[&str] = &["rephrase", "rewrite", "reword", "paraphrase"];

/// Change label when concatenated text differs
pub const TEXT_CHANGED: &str = "Text content modified";

/// Change label when the sequence of top-level block types differs
pub const STRUCTURE_CHANGED: &str = "Block structure modified";

const BASE: f64 = 0.5;
const ROOT_BONUS: f64 = 0.2;
const CONTENT_BONUS: f64 = 0.2;
const REWRITE_BONUS: f64 = 0.1;

/// Heuristic confidence in `[0, 1]`
///
/// Fragments synthesized by the pipeline itself earn neither the root nor the
/// content bonus.
#[must_use]
pub fn confidence(
    fragment: &StructuredNode,
    original_text: &str,
    command: &str,
    strategy: RepairStrategy,
) -> f64 {
    let text = fragment.plain_text();
    let mut score = BASE;

    if !strategy.is_synthesized() {
        if fragment.is_root() {
            score += ROOT_BONUS;
        }
        if !text.trim().is_empty() {
            score += CONTENT_BONUS;
        }
    }

    if is_rewrite_command(command) && text.to_lowercase() != original_text.to_lowercase() {
        score += REWRITE_BONUS;
    }

    score.min(1.0)
}

/// True when `command` asks for a rewrite
#[must_use]
pub fn is_rewrite_command(command: &str) -> bool {
    let command = command.to_lowercase();
    REWRITE_VERBS.iter().any(|verb| command.contains(verb))
}

/// Human-readable list of what changed between `original` and `fragment`
#[must_use]
pub fn detect_changes(original: &StructuredNode, fragment: &StructuredNode) -> Vec<String> {
    let mut changes = Vec::new();

    if original.plain_text() != fragment.plain_text() {
        changes.push(TEXT_CHANGED.to_string());
    }

    let kinds = |node: &StructuredNode| -> Vec<String> {
        node.children().iter().map(|c| c.kind().to_string()).collect()
    };
    if kinds(original) != kinds(fragment) {
        changes.push(STRUCTURE_CHANGED.to_string());
    }

    changes
}
