//! Lexedit Core
//!
//! Orchestrates a structured-document edit: the selected subtree is sent to a
//! generative model under a strict output contract, the answer is repaired
//! and validated, and the result is written back with an undoable history
//! entry.
//!
//! # Architecture
//!
//! ```text
//! DocumentHandle ──▶ extractor ──▶ prompt ──▶ ModelClient ──▶ RepairCascade
//!       ▲                                     │ models (sequential)     │
//!       │                                     └ chat fallback           ▼
//!       └──────────── applier ◀──── validate ◀──────────────── normalize
//!                        │
//!                        ▼
//!                    EditHistory (ring buffer)
//! ```
//!
//! # Key Types
//!
//! - [`EditSession`]: the orchestrator (`process_command`, `undo`, `restore_edit`)
//! - [`ModelClient`]: sequential fallback over [`CompletionBackend`]s plus
//!   an optional [`ChatBackend`]
//! - [`EditorConfig`]: TOML-loadable settings
//! - [`EditHistory`]: bounded undo history
//!
//! # Example
//!
//! ```rust,ignore
//! use lexedit_core::prelude::*;
//! use std::sync::Arc;
//!
//! let config = EditorConfig::load("lexedit.toml")?;
//! let backend = GeminiBackend::from_env(config.request_timeout())?;
//! let client = ModelClient::new(Arc::new(backend), &config);
//!
//! let mut session = EditSession::new(MemoryDocument::from_json(&json)?, config, client)?;
//! let response = session.process_command("strengthen the enforceability language").await?;
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod applier;
pub mod config;
pub mod error;
pub mod extractor;
pub mod history;
pub mod model;
pub mod prompt;
pub mod session;
pub mod tagger;
pub mod types;

pub use applier::apply_fragment;
pub use config::{default_models, EditorConfig, ModelConfig, WholeDocumentPolicy, API_KEY_ENV, CHAT_URL_ENV};
pub use error::{BackendError, ConfigError, EditError};
pub use extractor::{document_structure, extract, selection_context};
pub use history::{EditHistory, HistoryEntry, HistorySnapshot};
pub use model::{
    ChatApiBackend, ChatBackend, ChatContext, ChatReply, Completion, CompletionBackend, GeminiBackend,
    ModelClient,
};
pub use prompt::build_prompt;
pub use session::EditSession;
pub use tagger::{content_metrics, detect_category, legal_elements};
pub use types::{
    legal_commands, ContentMetrics, DocumentCategory, DocumentStructure, EditRequest, EditResponse,
    ExtractedContent, LegalCommand, SelectionContext,
};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for running edit sessions
    pub use crate::config::{EditorConfig, ModelConfig};
    pub use crate::error::EditError;
    pub use crate::model::{ChatApiBackend, CompletionBackend, GeminiBackend, ModelClient};
    pub use crate::session::EditSession;
    pub use crate::types::EditResponse;
    pub use lexedit_document::{DocumentHandle, MemoryDocument, SelectionRange, StructuredNode};
    pub use lexedit_repair::RepairStrategy;
}
