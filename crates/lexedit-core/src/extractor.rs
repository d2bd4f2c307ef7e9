//! Selection extractor
//!
//! Reads the current selection from a [`DocumentHandle`] and produces a
//! self-contained [`ExtractedContent`]. Read-only.

use crate::config::{EditorConfig, WholeDocumentPolicy};
use crate::error::EditError;
use crate::tagger::{detect_category, legal_elements};
use crate::types::{DocumentStructure, ExtractedContent, SelectionContext};
use lexedit_document::{DocumentHandle, SelectionRange, StructuredNode};

const LIST_TYPES: &[&str] = &["bulletList", "bullet_list", "orderedList", "ordered_list"];

/// Extract the current selection
///
/// An empty selection widens to the whole document unless the configured
/// policy refuses. A blank document yields the empty range `0..0`.
pub fn extract<D>(doc: &D, config: &EditorConfig) -> Result<ExtractedContent, EditError>
where
    D: DocumentHandle + ?Sized,
{
    let size = doc.size();
    let selection = doc.selection();

    let (range, whole_document) = if selection.is_empty() {
        if config.whole_document_policy == WholeDocumentPolicy::Refuse {
            return Err(EditError::ExtractionEmpty("no text selected".to_string()));
        }
        tracing::info!(size, "no selection, using whole document");
        (SelectionRange::whole(size), true)
    } else {
        (selection, selection.spans_whole(size))
    };

    let fragment = doc.fragment(range).map_err(EditError::Document)?;
    let text = doc.text_between(range).map_err(EditError::Document)?;

    let before = doc
        .text_between(SelectionRange::new(0, range.from))
        .map_err(EditError::Document)?;
    let after = doc
        .text_between(SelectionRange::new(range.to, size))
        .map_err(EditError::Document)?;

    let extracted = ExtractedContent {
        fragment,
        text,
        range,
        context_before: last_chars(&before, config.context_window),
        context_after: first_chars(&after, config.context_window),
        category: detect_category(&doc.plain_text()),
        whole_document,
    };

    tracing::debug!(
        %range,
        chars = extracted.text.chars().count(),
        category = ?extracted.category,
        "extracted selection"
    );
    Ok(extracted)
}

/// Context for UI display around an extraction
#[must_use]
pub fn selection_context(extracted: &ExtractedContent, document: &StructuredNode) -> SelectionContext {
    SelectionContext {
        selected_text: extracted.text.clone(),
        surrounding_text: extracted.surrounding_text(),
        structure: document_structure(document),
        legal_elements: legal_elements(&extracted.text),
    }
}

/// Count structural elements of a document
#[must_use]
pub fn document_structure(document: &StructuredNode) -> DocumentStructure {
    DocumentStructure {
        paragraphs: document.count_type("paragraph"),
        headings: document.count_type("heading"),
        lists: LIST_TYPES.iter().map(|t| document.count_type(t)).sum(),
        has_tables: document.contains_type("table"),
        document_size: document.content_size(),
    }
}

fn last_chars(text: &str, n: usize) -> String {
    let count = text.chars().count();
    text.chars().skip(count.saturating_sub(n)).collect()
}

fn first_chars(text: &str, n: usize) -> String {
    text.chars().take(n).collect()
}
