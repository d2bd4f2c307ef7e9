//! Write a normalized fragment back into the document

use crate::error::EditError;
use lexedit_document::{DocumentHandle, SelectionRange, StructuredNode};

/// Apply `fragment` over `range`
///
/// A range spanning the whole document replaces the document; any other range
/// is replaced by the fragment's children.
pub fn apply_fragment<D>(
    doc: &mut D,
    range: SelectionRange,
    fragment: &StructuredNode,
) -> Result<(), EditError>
where
    D: DocumentHandle + ?Sized,
{
    if range.spans_whole(doc.size()) {
        tracing::info!(%range, "replacing whole document");
        doc.set_document(fragment.clone())
    } else {
        tracing::info!(%range, blocks = fragment.children().len(), "replacing range");
        doc.replace_range(range, fragment.children().to_vec())
    }
    .map_err(EditError::ApplyFailed)
}
