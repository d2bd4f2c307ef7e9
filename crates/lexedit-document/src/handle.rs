//! Document handle contract
//!
//! The pipeline never owns the document. It reads and patches it through this
//! trait, which the hosting editor implements.

use crate::error::DocumentError;
use crate::node::StructuredNode;
use crate::range::SelectionRange;

/// Live structured-document handle
///
/// Implementations are single-writer: the pipeline issues at most one write
/// per request and never caches a copy across requests.
pub trait DocumentHandle {
    /// Current selection
    fn selection(&self) -> SelectionRange;

    /// Move the selection
    fn set_selection(&mut self, range: SelectionRange) -> Result<(), DocumentError>;

    /// Size of the document content in the position space
    fn size(&self) -> usize;

    /// Subtree covering `range`
    fn fragment(&self, range: SelectionRange) -> Result<StructuredNode, DocumentError>;

    /// Whole document tree
    fn full_document(&self) -> StructuredNode;

    /// Whole document as plain text
    fn plain_text(&self) -> String;

    /// Plain text covered by `range`
    fn text_between(&self, range: SelectionRange) -> Result<String, DocumentError>;

    /// Delete `range` and insert `nodes` at its start
    fn replace_range(
        &mut self,
        range: SelectionRange,
        nodes: Vec<StructuredNode>,
    ) -> Result<(), DocumentError>;

    /// Replace the whole document
    fn set_document(&mut self, document: StructuredNode) -> Result<(), DocumentError>;
}
