//! Edit session orchestrator
//!
//! Owns the pipeline for one editing session:
//!
//! ```text
//! extract → build_prompt → ModelClient → RepairCascade → validate → apply → history
//! ```
//!
//! Only structural validation failures and rejected writes reach the caller
//! as errors. Unavailable models and malformed responses degrade to
//! synthesized fragments and are reported through warnings and the
//! [`RepairStrategy`] on the response.
//!
//! # Example
//!
//! ```rust,ignore
//! use lexedit_core::prelude::*;
//!
//! let client = ModelClient::new(Arc::new(GeminiBackend::from_env(timeout)?), &config);
//! let mut session = EditSession::new(document, config, client)?;
//!
//! let response = session.process_command("rephrase this clause").await?;
//! println!("{} ({:.1})", response.strategy, response.confidence);
//! session.undo()?;
//! ```

use crate::applier::apply_fragment;
use crate::config::EditorConfig;
use crate::error::EditError;
use crate::extractor::{extract, selection_context};
use crate::history::{EditHistory, HistoryEntry, HistorySnapshot};
use crate::model::{ChatContext, Completion, ModelClient};
use crate::prompt::build_prompt;
use crate::types::{EditRequest, EditResponse, ExtractedContent, SelectionContext};
use lexedit_document::{DocumentHandle, StructuredNode};
use lexedit_repair::{
    check_structure, confidence, detect_changes, error_fragment, into_fragment, normalize, validate,
    Recovered, RepairCascade, RepairStrategy,
};

/// Warning when an empty selection was widened to the whole document
pub const WHOLE_DOCUMENT_WARNING: &str = "No text was selected; the whole document was edited";

/// Warning when the structured models failed and the chat endpoint answered
pub const CHAT_FALLBACK_WARNING: &str =
    "Structured editing was unavailable; the chat assistant's answer was applied as plain text";

/// Warning when the response had to be applied as plain text
pub const PLAIN_TEXT_WARNING: &str = "The response was not a valid document fragment; it was applied as plain text";

/// Warning when nothing usable came back
pub const GENERIC_WARNING: &str = "The response contained no usable content";

/// Warning when every backend failed
pub const UNAVAILABLE_WARNING: &str = "The editing service is unavailable; an error notice was inserted";

/// One editing session over a document
pub struct EditSession<D: DocumentHandle> {
    document: D,
    config: EditorConfig,
    client: ModelClient,
    cascade: RepairCascade,
    history: EditHistory,
}

impl<D: DocumentHandle> std::fmt::Debug for EditSession<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditSession")
            .field("client", &self.client)
            .field("cascade", &self.cascade)
            .field("history", &self.history.len())
            .finish()
    }
}

impl<D: DocumentHandle> EditSession<D> {
    /// Create session after validating `config`
    pub fn new(document: D, config: EditorConfig, client: ModelClient) -> Result<Self, EditError> {
        config.validate()?;
        Ok(Self {
            document,
            history: EditHistory::new(config.history_capacity),
            config,
            client,
            cascade: RepairCascade::new(),
        })
    }

    /// With a custom repair cascade
    #[must_use]
    pub fn with_cascade(mut self, cascade: RepairCascade) -> Self {
        self.cascade = cascade;
        self
    }

    /// Run one edit command against the current selection
    pub async fn process_command(&mut self, command: &str) -> Result<EditResponse, EditError> {
        let extracted = extract(&self.document, &self.config)?;
        tracing::info!(
            command,
            range = %extracted.range,
            whole_document = extracted.whole_document,
            "processing edit command"
        );

        let request = EditRequest::from_extracted(&extracted, command);
        let prompt = build_prompt(&request);
        let chat_context = ChatContext {
            command: command.to_string(),
            original_text: extracted.text.clone(),
            category: extracted.category,
        };

        let mut warnings = Vec::new();
        if extracted.whole_document && self.document.selection().is_empty() {
            warnings.push(WHOLE_DOCUMENT_WARNING.to_string());
        }

        let recovered = match self.client.complete(&prompt, &chat_context).await {
            Completion::Structured { model, text } => {
                tracing::debug!(%model, chars = text.len(), "repairing model response");
                self.cascade.recover(&text, &extracted.fragment)
            }
            Completion::Conversational { text } => {
                warnings.push(CHAT_FALLBACK_WARNING.to_string());
                self.cascade.fallback(&text, &extracted.fragment, Vec::new())
            }
            Completion::Unavailable { failures } => {
                tracing::warn!(attempts = failures.len(), "inserting error fragment");
                warnings.push(UNAVAILABLE_WARNING.to_string());
                Recovered::synthesized(&error_fragment(), RepairStrategy::ErrorFragment, Vec::new())
            }
        };

        match recovered.strategy {
            RepairStrategy::TextOnly if warnings.iter().all(|w| w != CHAT_FALLBACK_WARNING) => {
                warnings.push(PLAIN_TEXT_WARNING.to_string());
            }
            RepairStrategy::Generic => warnings.push(GENERIC_WARNING.to_string()),
            _ => {}
        }

        let report = validate(&recovered.value, &extracted.text);
        if !report.is_valid() {
            tracing::warn!(errors = report.errors.len(), "fragment failed validation");
            return Err(EditError::validation(report.errors));
        }
        warnings.extend(report.warnings);

        let fragment =
            into_fragment(recovered.value).map_err(|e| EditError::validation(vec![e.to_string()]))?;

        self.apply(&extracted, &fragment, command)?;

        let response = EditResponse {
            confidence: confidence(&fragment, &extracted.text, command, recovered.strategy),
            changes: detect_changes(&extracted.fragment, &fragment),
            warnings,
            strategy: recovered.strategy,
            fragment,
        };
        tracing::info!(
            strategy = %response.strategy,
            confidence = response.confidence,
            warnings = response.warnings.len(),
            "edit applied"
        );
        Ok(response)
    }

    fn apply(
        &mut self,
        extracted: &ExtractedContent,
        fragment: &StructuredNode,
        command: &str,
    ) -> Result<(), EditError> {
        let document_before = self.document.full_document();
        apply_fragment(&mut self.document, extracted.range, fragment)?;

        if self.config.enable_history {
            let before = if extracted.whole_document {
                HistorySnapshot::Node(extracted.fragment.clone())
            } else {
                HistorySnapshot::Nodes(extracted.fragment.children().to_vec())
            };
            self.history
                .push(HistoryEntry::new(before, fragment.clone(), command, document_before));
        }
        Ok(())
    }

    /// Restore the document as it was before the most recent edit
    ///
    /// A rejected write leaves the entry on the history.
    pub fn undo(&mut self) -> Result<(), EditError> {
        let entry = self.history.pop().ok_or(EditError::NothingToUndo)?;

        if let Err(e) = self.document.set_document(entry.document_before.clone()) {
            tracing::warn!(id = %entry.id, error = %e, "undo write rejected");
            self.history.push(entry);
            return Err(EditError::ApplyFailed(e));
        }

        tracing::info!(id = %entry.id, command = %entry.command, "undid edit");
        Ok(())
    }

    /// Insert an earlier snapshot at the current selection
    ///
    /// The snapshot is normalized and validated like a model response. History
    /// is left untouched.
    pub fn restore_edit(&mut self, snapshot: &HistorySnapshot) -> Result<(), EditError> {
        let value = normalize(snapshot.to_fragment().to_value());
        let errors = check_structure(&value);
        if !errors.is_empty() {
            return Err(EditError::validation(errors));
        }
        let fragment = into_fragment(value).map_err(|e| EditError::validation(vec![e.to_string()]))?;

        let range = self.document.selection();
        tracing::info!(%range, "restoring snapshot");
        apply_fragment(&mut self.document, range, &fragment)
    }

    /// Context for the current selection
    pub fn selection_context(&self) -> Result<SelectionContext, EditError> {
        let extracted = extract(&self.document, &self.config)?;
        Ok(selection_context(&extracted, &self.document.full_document()))
    }

    /// Edit history, oldest first
    #[inline]
    #[must_use]
    pub fn history(&self) -> &EditHistory {
        &self.history
    }

    /// True when an edit can be undone
    #[inline]
    #[must_use]
    pub fn can_undo(&self) -> bool {
        !self.history.is_empty()
    }

    /// Forget every history entry
    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    /// The document
    #[inline]
    #[must_use]
    pub fn document(&self) -> &D {
        &self.document
    }

    /// The document, mutably (for selection changes)
    #[inline]
    pub fn document_mut(&mut self) -> &mut D {
        &mut self.document
    }

    /// Session configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// Consume the session and return the document
    #[must_use]
    pub fn into_document(self) -> D {
        self.document
    }
}
