//! Error types for document handle operations

/// Errors raised by a [`DocumentHandle`](crate::DocumentHandle)
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    /// Range violates `0 <= from <= to <= size`
    #[error("invalid range {from}..{to} for document of size {size}")]
    InvalidRange {
        /// Range start
        from: usize,
        /// Range end
        to: usize,
        /// Document size at the time of the request
        size: usize,
    },

    /// The handle refused the write
    #[error("write rejected: {0}")]
    Rejected(String),

    /// Document data could not be decoded
    #[error("malformed document: {0}")]
    Malformed(#[from] serde_json::Error),
}

impl DocumentError {
    /// Create invalid range error
    #[inline]
    #[must_use]
    pub fn invalid_range(from: usize, to: usize, size: usize) -> Self {
        Self::InvalidRange { from, to, size }
    }
}
