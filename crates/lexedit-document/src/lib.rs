//! Lexedit Document Model
//!
//! The tree-structured rich-text representation shared by every stage of the
//! edit pipeline, and the contract through which the pipeline reads from and
//! writes to a live editor.
//!
//! # Core Types
//!
//! - [`StructuredNode`]: a typed node with optional text, marks, attributes
//!   and children
//! - [`SelectionRange`]: a `[from, to)` span in the flattened position space
//! - [`DocumentHandle`]: the six-operation editor contract
//! - [`MemoryDocument`]: an in-memory handle with ProseMirror-style positions
//!
//! # Example
//!
//! ```rust,ignore
//! use lexedit_document::{DocumentHandle, MemoryDocument, SelectionRange, StructuredNode};
//!
//! let mut doc = MemoryDocument::new(StructuredNode::root(vec![
//!     StructuredNode::paragraph("The respondent is Jane Doe"),
//! ]));
//!
//! doc.set_selection(SelectionRange::new(1, 15))?;
//! let fragment = doc.fragment(doc.selection())?;
//! assert_eq!(fragment.plain_text(), "The respondent");
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod error;
pub mod handle;
pub mod memory;
pub mod node;
pub mod range;

pub use error::DocumentError;
pub use handle::DocumentHandle;
pub use memory::MemoryDocument;
pub use node::{Mark, StructuredNode, PARAGRAPH_TYPE, ROOT_TYPE, TEXT_TYPE};
pub use range::SelectionRange;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
