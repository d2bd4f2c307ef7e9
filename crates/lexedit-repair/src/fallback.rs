//! Synthesized fragments for when no structure can be recovered

use crate::stages::strip_markdown;
use lexedit_document::{Mark, StructuredNode, PARAGRAPH_TYPE};
use once_cell::sync::Lazy;
use regex::Regex;

/// Text of the generic completion fragment
pub const GENERIC_MESSAGE: &str = "Legal edit processed successfully.";

/// Text of the canned error fragment
pub const ERROR_MESSAGE: &str = "Error processing legal edit. Please try again.";

/// Colour applied to the canned error text
pub const ERROR_COLOR: &str = "#ef4444";

/// Rewrites shorter than this are not trusted
const MIN_REWRITE_CHARS: usize = 10;

static JSON_SPAN: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)\{.*\}").expect("json span regex"));

/// Plain-text rewrite hidden in a response, if any
///
/// Code fences and JSON-looking spans are removed (an unclosed `{` cuts the
/// rest) and blank lines collapsed.
#[must_use]
pub fn usable_text(raw: &str) -> Option<String> {
    let stripped = strip_markdown(raw);
    let mut text = JSON_SPAN.replace_all(&stripped, "").into_owned();
    if let Some(idx) = text.find('{') {
        text.truncate(idx);
    }
    let text = strip_markdown(&text);
    (text.chars().count() > MIN_REWRITE_CHARS).then_some(text)
}

/// Substitute `rewrite` for the text of `original`
///
/// A single text block keeps its type, attributes and marks; anything else
/// becomes a single paragraph.
#[must_use]
pub fn text_fallback(original: &StructuredNode, rewrite: &str) -> StructuredNode {
    let blocks = original.children();

    let replaced = match blocks {
        [block] if block.children().len() == 1 && block.children()[0].is_text() => {
            let mut block = block.clone();
            if let Some(text) = block.children.as_mut().and_then(|c| c.first_mut()) {
                text.text = Some(rewrite.to_string());
            }
            block
        }
        [text] if text.is_text() => StructuredNode::element(
            PARAGRAPH_TYPE,
            vec![StructuredNode {
                text: Some(rewrite.to_string()),
                ..text.clone()
            }],
        ),
        _ => StructuredNode::paragraph(rewrite),
    };

    StructuredNode::root(vec![replaced])
}

/// Neutral single-paragraph fragment
#[must_use]
pub fn generic_fragment() -> StructuredNode {
    StructuredNode::root(vec![StructuredNode::paragraph(GENERIC_MESSAGE)])
}

/// Canned error fragment with visibly coloured text
#[must_use]
pub fn error_fragment() -> StructuredNode {
    let text = StructuredNode::text(ERROR_MESSAGE)
        .with_mark(Mark::new("textStyle").with_attr("color", ERROR_COLOR));
    StructuredNode::root(vec![StructuredNode::element(PARAGRAPH_TYPE, vec![text])])
}
