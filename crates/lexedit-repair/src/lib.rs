//! Lexedit Repair Engine
//!
//! Turns the frequently malformed text returned by a generative model into a
//! structurally valid document fragment.
//!
//! # Pipeline
//!
//! ```text
//! raw text → RepairCascade → normalize → validate → StructuredNode
//!              │ direct parse
//!              │ strip & extract
//!              │ syntax fix
//!              │ truncation repair
//!              │ first complete value
//!              └ text-only / generic fallback
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use lexedit_repair::prelude::*;
//!
//! let recovered = RepairCascade::new().recover(raw, &original);
//! let report = validate(&recovered.value, &original.plain_text());
//! if report.is_valid() {
//!     let fragment = into_fragment(recovered.value)?;
//! }
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod cascade;
pub mod error;
pub mod fallback;
pub mod normalize;
pub mod score;
pub mod stages;
pub mod validate;

mod scanner;

pub use cascade::{Recovered, RepairCascade, RepairStage, RepairStrategy};
pub use error::{CascadeExhausted, RepairError};
pub use fallback::{error_fragment, generic_fragment, text_fallback, usable_text};
pub use normalize::{is_canonical, normalize, normalize_with_shape, Shape};
pub use score::{confidence, detect_changes, is_rewrite_command};
pub use validate::{check_structure, into_fragment, validate, ValidationReport, LOST_CONTENT_WARNING};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with the repair engine
    pub use crate::cascade::{Recovered, RepairCascade, RepairStage, RepairStrategy};
    pub use crate::error::RepairError;
    pub use crate::normalize::normalize;
    pub use crate::validate::{into_fragment, validate, ValidationReport};
}
