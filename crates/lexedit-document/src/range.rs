//! Selection ranges over the flattened document position space

use crate::error::DocumentError;
use serde::{Deserialize, Serialize};

/// A `[from, to)` span of document positions
///
/// `from == to` denotes a collapsed cursor (no selection).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct SelectionRange {
    /// Start position (inclusive)
    pub from: usize,
    /// End position (exclusive)
    pub to: usize,
}

impl SelectionRange {
    /// Create a range
    #[inline]
    #[must_use]
    pub fn new(from: usize, to: usize) -> Self {
        Self { from, to }
    }

    /// Collapsed range at `pos`
    #[inline]
    #[must_use]
    pub fn cursor(pos: usize) -> Self {
        Self { from: pos, to: pos }
    }

    /// Range covering a whole document of `size`
    #[inline]
    #[must_use]
    pub fn whole(size: usize) -> Self {
        Self { from: 0, to: size }
    }

    /// True when nothing is selected
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.from == self.to
    }

    /// Number of positions covered
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.to.saturating_sub(self.from)
    }

    /// True when the range is exactly `0..size`
    #[inline]
    #[must_use]
    pub fn spans_whole(&self, size: usize) -> bool {
        self.from == 0 && self.to == size
    }

    /// Check `0 <= from <= to <= size`
    pub fn check(&self, size: usize) -> Result<(), DocumentError> {
        if self.from > self.to || self.to > size {
            return Err(DocumentError::invalid_range(self.from, self.to, size));
        }
        Ok(())
    }
}

impl std::fmt::Display for SelectionRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}..{}", self.from, self.to)
    }
}
