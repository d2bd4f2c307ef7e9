//! Error types for fragment recovery
//!
//! A [`RepairError`] is always local to one stage of the cascade. The cascade
//! itself only fails as a whole when every structural stage has failed, in
//! which case the collected stage errors are returned together.

use crate::cascade::RepairStrategy;

/// Failure of a single repair stage
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RepairError {
    /// The stage found nothing it could work on
    #[error("{stage}: no candidate: {reason}")]
    NoCandidate {
        /// Stage that failed
        stage: RepairStrategy,
        /// What was missing
        reason: String,
    },

    /// The candidate text did not parse
    #[error("{stage}: parse failed: {message}")]
    Parse {
        /// Stage that failed
        stage: RepairStrategy,
        /// Parser message
        message: String,
    },

    /// The candidate parsed but is not a valid fragment
    #[error("{stage}: invalid structure: {}", errors.join("; "))]
    Invalid {
        /// Stage that failed
        stage: RepairStrategy,
        /// Structural errors reported by the validator
        errors: Vec<String>,
    },

    /// A parsed value could not be converted into document nodes
    #[error("conversion failed: {0}")]
    Conversion(String),
}

impl RepairError {
    /// Create no-candidate error
    #[inline]
    #[must_use]
    pub fn no_candidate(stage: RepairStrategy, reason: impl Into<String>) -> Self {
        Self::NoCandidate {
            stage,
            reason: reason.into(),
        }
    }

    /// Create parse error from a serde error
    #[must_use]
    pub fn parse(stage: RepairStrategy, err: &serde_json::Error) -> Self {
        Self::Parse {
            stage,
            message: err.to_string(),
        }
    }

    /// Stage this error belongs to, if any
    #[must_use]
    pub fn stage(&self) -> Option<RepairStrategy> {
        match self {
            Self::NoCandidate { stage, .. }
            | Self::Parse { stage, .. }
            | Self::Invalid { stage, .. } => Some(*stage),
            Self::Conversion(_) => None,
        }
    }
}

/// Every structural stage failed
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("all {} repair stages failed", failures.len())]
pub struct CascadeExhausted {
    /// One error per attempted stage, in cascade order
    pub failures: Vec<RepairError>,
}
