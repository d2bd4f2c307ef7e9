//! Core request and response types

use lexedit_document::{SelectionRange, StructuredNode};
use lexedit_repair::RepairStrategy;
use serde::{Deserialize, Serialize};

/// Document category inferred from keywords
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentCategory {
    /// Agreements and contracts
    Contract,
    /// Court motions
    Motion,
    /// Briefs and arguments
    Brief,
    /// Settlements and mediation outcomes
    Agreement,
}

impl DocumentCategory {
    /// Lowercase name
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Contract => "contract",
            Self::Motion => "motion",
            Self::Brief => "brief",
            Self::Agreement => "agreement",
        }
    }
}

impl std::fmt::Display for DocumentCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Selected content with its surroundings, owned by one request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtractedContent {
    /// Selected subtree
    pub fragment: StructuredNode,
    /// Plain text of the selection
    pub text: String,
    /// Selection range the fragment was cut from
    pub range: SelectionRange,
    /// Text immediately before the selection
    pub context_before: String,
    /// Text immediately after the selection
    pub context_after: String,
    /// Inferred category of the whole document
    pub category: Option<DocumentCategory>,
    /// True when the selection was widened to the whole document
    pub whole_document: bool,
}

impl ExtractedContent {
    /// Context window around the selection as one string
    #[must_use]
    pub fn surrounding_text(&self) -> String {
        format!("{} [...] {}", self.context_before, self.context_after)
            .trim()
            .to_string()
    }
}

/// Immutable input to the prompt builder
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EditRequest {
    /// Fragment to rewrite
    pub fragment: StructuredNode,
    /// User instruction
    pub command: String,
    /// Surrounding text
    pub context: Option<String>,
    /// Document category
    pub category: Option<DocumentCategory>,
}

impl EditRequest {
    /// Build request from an extraction
    #[must_use]
    pub fn from_extracted(extracted: &ExtractedContent, command: impl Into<String>) -> Self {
        let context = extracted.surrounding_text();
        Self {
            fragment: extracted.fragment.clone(),
            command: command.into(),
            context: (!context.is_empty() && context != "[...]").then_some(context),
            category: extracted.category,
        }
    }
}

/// Outcome of a successful edit
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EditResponse {
    /// Applied fragment
    pub fragment: StructuredNode,
    /// Heuristic confidence in `[0, 1]`
    pub confidence: f64,
    /// Non-blocking problems
    pub warnings: Vec<String>,
    /// Detected changes
    pub changes: Vec<String>,
    /// How the fragment was obtained
    pub strategy: RepairStrategy,
}

/// Structural counts over a document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct DocumentStructure {
    /// Paragraph nodes
    pub paragraphs: usize,
    /// Heading nodes
    pub headings: usize,
    /// Bullet and ordered lists
    pub lists: usize,
    /// Any table present
    pub has_tables: bool,
    /// Position-space size
    pub document_size: usize,
}

/// Text statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ContentMetrics {
    /// Whitespace-separated words
    pub word_count: usize,
    /// Characters
    pub character_count: usize,
    /// Runs ending in `.`, `!` or `?`
    pub sentence_count: usize,
    /// Blocks separated by blank lines
    pub paragraph_count: usize,
}

/// Context shown alongside a selection
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectionContext {
    /// Selected text
    pub selected_text: String,
    /// Text around the selection
    pub surrounding_text: String,
    /// Counts over the full document
    pub structure: DocumentStructure,
    /// Legal keywords found in the selection
    pub legal_elements: Vec<String>,
}

/// Predefined command for UI pickers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LegalCommand {
    /// Stable identifier
    pub id: &'static str,
    /// Short label
    pub label: &'static str,
    /// One-line description
    pub description: &'static str,
    /// Example instruction
    pub example: &'static str,
}

const LEGAL_COMMANDS: &[LegalCommand] = &[
    LegalCommand {
        id: "rephrase",
        label: "Rephrase Clause",
        description: "Rephrase the clause in formal legal language",
        example: "Rephrase this clause in formal contract language",
    },
    LegalCommand {
        id: "add_bullet",
        label: "Add Bullet Point",
        description: "Add a bullet point with specific legal content",
        example: "Add a bullet point on jurisdictional limitations",
    },
    LegalCommand {
        id: "summarize",
        label: "Summarize Section",
        description: "Summarize the section for a client briefing",
        example: "Summarize this section for client briefing",
    },
    LegalCommand {
        id: "remove_redundant",
        label: "Remove Redundancy",
        description: "Remove redundant legal terms",
        example: "Remove redundant legal terms",
    },
    LegalCommand {
        id: "strengthen",
        label: "Strengthen Language",
        description: "Strengthen the legal language",
        example: "Strengthen the enforceability language",
    },
    LegalCommand {
        id: "simplify",
        label: "Simplify Language",
        description: "Simplify complex legal language",
        example: "Simplify this clause for better readability",
    },
];

/// The predefined command catalog
#[inline]
#[must_use]
pub fn legal_commands() -> &'static [LegalCommand] {
    LEGAL_COMMANDS
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extracted(before: &str, after: &str) -> ExtractedContent {
        ExtractedContent {
            fragment: StructuredNode::default(),
            text: "x".into(),
            range: SelectionRange::new(1, 2),
            context_before: before.into(),
            context_after: after.into(),
            category: Some(DocumentCategory::Motion),
            whole_document: false,
        }
    }

    #[test]
    fn request_carries_context_and_category() {
        let request = EditRequest::from_extracted(&extracted("before", "after"), "shorten");
        assert_eq!(request.context.as_deref(), Some("before [...] after"));
        assert_eq!(request.category, Some(DocumentCategory::Motion));
    }

    #[test]
    fn empty_context_is_omitted() {
        let request = EditRequest::from_extracted(&extracted("", ""), "shorten");
        assert_eq!(request.context, None);
    }

    #[test]
    fn command_catalog() {
        let ids: Vec<_> = legal_commands().iter().map(|c| c.id).collect();
        assert_eq!(
            ids,
            ["rephrase", "add_bullet", "summarize", "remove_redundant", "strengthen", "simplify"]
        );
    }

    #[test]
    fn category_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&DocumentCategory::Agreement).unwrap(),
            "\"agreement\""
        );
    }
}
