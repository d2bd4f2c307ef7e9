//! Error types for edit sessions
//!
//! Provides error handling for:
//! - Extraction of the selected content
//! - Model backends (transport, status, payload, timeout)
//! - Validation of recovered fragments
//! - Writes rejected by the document handle
//! - Configuration loading
//!
//! Model unavailability and malformed responses are recovered inside the
//! pipeline and never surface as [`EditError`].

use lexedit_document::DocumentError;
use std::path::PathBuf;

/// Main edit error type
#[derive(Debug, thiserror::Error)]
pub enum EditError {
    /// Nothing selected and nothing to fall back to
    #[error("nothing to edit: {0}")]
    ExtractionEmpty(String),

    /// Recovered fragment is structurally invalid
    #[error("response failed validation: {}", errors.join("; "))]
    ValidationFailed {
        /// Structural errors
        errors: Vec<String>,
    },

    /// The document handle rejected the write
    #[error("document rejected the edit: {0}")]
    ApplyFailed(#[source] DocumentError),

    /// The document handle failed a read
    #[error("document read failed: {0}")]
    Document(#[source] DocumentError),

    /// History is empty
    #[error("nothing to undo")]
    NothingToUndo,

    /// Invalid configuration
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl EditError {
    /// Create validation error
    #[inline]
    #[must_use]
    pub fn validation(errors: Vec<String>) -> Self {
        Self::ValidationFailed { errors }
    }

    /// Message suitable for end users
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::ExtractionEmpty(_) => {
                "Select some text in the document, or add content before editing.".to_string()
            }
            Self::ValidationFailed { errors } => format!(
                "The suggested edit was not a valid document fragment and was not applied ({} problem{}). Please try again or rephrase the command.",
                errors.len(),
                if errors.len() == 1 { "" } else { "s" }
            ),
            Self::ApplyFailed(_) => {
                "The editor could not apply the change. Your document was left unchanged.".to_string()
            }
            Self::Document(_) => {
                "The current selection could not be read. Adjust the selection and try again.".to_string()
            }
            Self::NothingToUndo => "There is nothing to undo.".to_string(),
            Self::Config(_) => "The editor assistant is not configured correctly.".to_string(),
        }
    }

    /// Check if error is worth retrying
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::ValidationFailed { .. } | Self::ApplyFailed(_))
    }
}

/// Errors raised by model backends
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BackendError {
    /// Request could not be sent or the connection failed
    #[error("transport error: {0}")]
    Transport(String),

    /// Backend answered with a non-success status
    #[error("backend returned status {status}: {body}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body, possibly truncated
        body: String,
    },

    /// Response body had an unexpected shape
    #[error("malformed backend payload: {0}")]
    Payload(String),

    /// No answer within the configured timeout
    #[error("timed out after {secs}s")]
    Timeout {
        /// Timeout that elapsed
        secs: u64,
    },

    /// Backend lacks required settings
    #[error("backend not configured: {0}")]
    NotConfigured(String),
}

impl BackendError {
    /// Create status error
    #[must_use]
    pub fn status(status: u16, body: impl Into<String>) -> Self {
        let mut body = body.into();
        if body.len() > 500 {
            let mut cut = 500;
            while !body.is_char_boundary(cut) {
                cut -= 1;
            }
            body.truncate(cut);
        }
        Self::Status { status, body }
    }
}

impl From<reqwest::Error> for BackendError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Transport(format!("request timed out: {err}"))
        } else if err.is_decode() {
            Self::Payload(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File could not be read
    #[error("io error reading {path}: {source}")]
    Io {
        /// Config path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// TOML did not parse
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    /// A value is out of range
    #[error("invalid value for {field}: {reason}")]
    Invalid {
        /// Offending field
        field: &'static str,
        /// What is wrong
        reason: String,
    },
}

impl ConfigError {
    /// Create invalid value error
    #[inline]
    #[must_use]
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_error_lists_problems() {
        let err = EditError::validation(vec!["$: bad".into(), "$.children[0]: worse".into()]);
        assert_eq!(
            err.to_string(),
            "response failed validation: $: bad; $.children[0]: worse"
        );
        assert!(err.user_message().contains("2 problems"));
        assert!(err.is_retryable());
    }

    #[test]
    fn user_messages_hide_internals() {
        let err = EditError::ApplyFailed(DocumentError::invalid_range(5, 90, 10));
        assert!(!err.user_message().contains("90"));
        assert!(!EditError::NothingToUndo.is_retryable());
    }

    #[test]
    fn status_body_is_truncated() {
        let err = BackendError::status(503, "é".repeat(400));
        match err {
            BackendError::Status { status, body } => {
                assert_eq!(status, 503);
                assert!(body.len() <= 500);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn config_invalid_display() {
        let err = ConfigError::invalid("history_capacity", "must be greater than zero");
        assert_eq!(
            err.to_string(),
            "invalid value for history_capacity: must be greater than zero"
        );
    }
}
