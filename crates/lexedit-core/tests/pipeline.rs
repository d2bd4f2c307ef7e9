//! End-to-end edit pipeline tests over an in-memory document

use lexedit_core::session::{
    CHAT_FALLBACK_WARNING, PLAIN_TEXT_WARNING, UNAVAILABLE_WARNING, WHOLE_DOCUMENT_WARNING,
};
use lexedit_core::{BackendError, EditError, EditSession, HistorySnapshot};
use lexedit_document::{DocumentError, DocumentHandle, MemoryDocument, SelectionRange, StructuredNode};
use lexedit_repair::RepairStrategy;
use lexedit_test_utils::{
    legal_paragraph_doc, model_reply, sample_document, session_with, test_config, FailingBackend,
    ScriptedBackend, ScriptedChat,
};
use pretty_assertions::assert_eq;
use std::sync::Arc;

fn select_second_paragraph(session: &mut EditSession<MemoryDocument>) {
    session
        .document_mut()
        .set_selection(SelectionRange::new(34, 62))
        .unwrap();
}

#[tokio::test]
async fn history_keeps_most_recent_fifty() {
    let backend = Arc::new(ScriptedBackend::new());
    for i in 0..51 {
        backend.push_reply(model_reply(&[&format!("Version {i}")]));
    }
    let mut session = session_with(legal_paragraph_doc("Original"), test_config(&["m"]), backend, None);

    for i in 0..51 {
        session.process_command(&format!("edit {i}")).await.unwrap();
    }

    let history = session.history();
    assert_eq!(history.len(), 50);
    let commands: Vec<_> = history.entries().map(|e| e.command.clone()).collect();
    assert_eq!(commands.first().map(String::as_str), Some("edit 1"));
    assert_eq!(commands.last().map(String::as_str), Some("edit 50"));
    assert_eq!(session.document().plain_text(), "Version 50");
}

#[tokio::test]
async fn undo_round_trip_for_partial_selection() {
    let backend = Arc::new(ScriptedBackend::new().with_reply(model_reply(&["Jane Doe is named as respondent"])));
    let mut session = session_with(sample_document(), test_config(&["m"]), backend, None);
    select_second_paragraph(&mut session);
    let before = session.document().plain_text();

    session.process_command("rephrase this clause").await.unwrap();
    assert_ne!(session.document().plain_text(), before);

    session.undo().unwrap();
    assert_eq!(session.document().plain_text(), before);
    assert!(matches!(session.undo(), Err(EditError::NothingToUndo)));
}

#[tokio::test]
async fn falls_back_through_models_in_order() {
    let backend = Arc::new(
        ScriptedBackend::new()
            .with_failure(BackendError::status(429, "quota"))
            .with_failure(BackendError::Transport("reset".into()))
            .with_reply(model_reply(&["Amended"])),
    );
    let mut session = session_with(
        sample_document(),
        test_config(&["fast", "stable", "pro", "spare"]),
        backend.clone(),
        None,
    );

    let response = session.process_command("shorten").await.unwrap();

    assert_eq!(response.strategy, RepairStrategy::Direct);
    assert_eq!(backend.models_called(), ["fast", "stable", "pro"]);
}

#[tokio::test]
async fn prompt_carries_command_and_category() {
    let backend = Arc::new(ScriptedBackend::new().with_reply(model_reply(&["Amended"])));
    let mut session = session_with(sample_document(), test_config(&["m"]), backend.clone(), None);
    select_second_paragraph(&mut session);

    session.process_command("strengthen the language").await.unwrap();

    let prompt = &backend.prompts()[0];
    assert!(prompt.contains("strengthen the language"));
    assert!(prompt.contains("DOCUMENT TYPE: CONTRACT"));
    assert!(prompt.contains("The respondent is Jane Doe"));
    assert!(prompt.contains("This agreement binds the parties [...]"));
}

#[tokio::test]
async fn chat_reply_replaces_selected_text() {
    let chat = Arc::new(ScriptedChat::answering("Jane Doe is named as the respondent."));
    let mut session = session_with(
        sample_document(),
        test_config(&["a", "b"]),
        Arc::new(FailingBackend(BackendError::status(503, "unavailable"))),
        Some(chat.clone()),
    );
    select_second_paragraph(&mut session);

    let response = session.process_command("rephrase").await.unwrap();

    assert_eq!(response.strategy, RepairStrategy::TextOnly);
    assert!(response.warnings.contains(&CHAT_FALLBACK_WARNING.to_string()));
    assert!(!response.warnings.contains(&PLAIN_TEXT_WARNING.to_string()));
    assert_eq!(chat.messages(), ["rephrase: The respondent is Jane Doe"]);
    assert_eq!(
        session.document().plain_text(),
        "This agreement binds the parties\n\nJane Doe is named as the respondent."
    );
}

#[tokio::test]
async fn total_outage_inserts_error_notice() {
    let mut session = session_with(
        sample_document(),
        test_config(&["a"]),
        Arc::new(FailingBackend(BackendError::Timeout { secs: 5 })),
        Some(Arc::new(ScriptedChat::failing())),
    );
    select_second_paragraph(&mut session);

    let response = session.process_command("rephrase").await.unwrap();

    assert_eq!(response.strategy, RepairStrategy::ErrorFragment);
    assert!(response.warnings.contains(&UNAVAILABLE_WARNING.to_string()));
    assert_eq!(
        session.document().plain_text(),
        "This agreement binds the parties\n\nError processing legal edit. Please try again."
    );
    assert_eq!(session.history().len(), 1);
}

#[tokio::test]
async fn blank_document_is_drafted_from_scratch() {
    let backend = Arc::new(
        ScriptedBackend::new().with_reply(model_reply(&["The Contractor shall deliver the Services."])),
    );
    let mut session = session_with(MemoryDocument::empty(), test_config(&["m"]), backend, None);

    let response = session.process_command("draft a clause").await.unwrap();

    assert_eq!(response.strategy, RepairStrategy::Direct);
    assert!(response.warnings.contains(&WHOLE_DOCUMENT_WARNING.to_string()));
    assert_eq!(
        session.document().plain_text(),
        "The Contractor shall deliver the Services."
    );

    session.undo().unwrap();
    assert_eq!(session.document().plain_text(), "");
}

#[tokio::test]
async fn truncated_reply_is_repaired() {
    let backend = Arc::new(ScriptedBackend::new().with_reply(
        r#"{"type":"doc","content":[{"type":"paragraph","content":[{"type":"text","text":"Hello"#,
    ));
    let mut session = session_with(legal_paragraph_doc("Greetings"), test_config(&["m"]), backend, None);

    let response = session.process_command("translate").await.unwrap();

    assert_eq!(response.strategy, RepairStrategy::TruncationRepair);
    assert_eq!(session.document().plain_text(), "Hello");
}

#[tokio::test]
async fn empty_reply_becomes_generic_message() {
    let backend = Arc::new(ScriptedBackend::new().with_reply(""));
    let mut session = session_with(legal_paragraph_doc("Greetings"), test_config(&["m"]), backend, None);

    let response = session.process_command("tidy").await.unwrap();

    assert_eq!(response.strategy, RepairStrategy::Generic);
    assert!((response.confidence - 0.5).abs() < 1e-9);
    assert_eq!(session.document().plain_text(), "Legal edit processed successfully.");
}

#[tokio::test]
async fn restore_pastes_earlier_version() {
    let backend = Arc::new(ScriptedBackend::new().with_reply(model_reply(&["Amended"])));
    let mut session = session_with(sample_document(), test_config(&["m"]), backend, None);
    select_second_paragraph(&mut session);

    session.process_command("rewrite").await.unwrap();
    let snapshot: HistorySnapshot = session.history().last().unwrap().before.clone();

    // cursor lands after the inserted paragraph
    session.restore_edit(&snapshot).unwrap();

    assert_eq!(
        session.document().plain_text(),
        "This agreement binds the parties\n\nAmended\n\nThe respondent is Jane Doe"
    );
    assert_eq!(session.history().len(), 1);
}

/// Handle that reads from a memory document and rejects every write
struct ReadOnly(MemoryDocument);

impl DocumentHandle for ReadOnly {
    fn selection(&self) -> SelectionRange {
        self.0.selection()
    }

    fn set_selection(&mut self, range: SelectionRange) -> Result<(), DocumentError> {
        self.0.set_selection(range)
    }

    fn size(&self) -> usize {
        self.0.size()
    }

    fn fragment(&self, range: SelectionRange) -> Result<StructuredNode, DocumentError> {
        self.0.fragment(range)
    }

    fn full_document(&self) -> StructuredNode {
        self.0.full_document()
    }

    fn plain_text(&self) -> String {
        self.0.plain_text()
    }

    fn text_between(&self, range: SelectionRange) -> Result<String, DocumentError> {
        self.0.text_between(range)
    }

    fn replace_range(&mut self, _range: SelectionRange, _nodes: Vec<StructuredNode>) -> Result<(), DocumentError> {
        Err(DocumentError::Rejected("read-only".into()))
    }

    fn set_document(&mut self, _document: StructuredNode) -> Result<(), DocumentError> {
        Err(DocumentError::Rejected("read-only".into()))
    }
}

#[tokio::test]
async fn rejected_write_surfaces_apply_failure() {
    let config = test_config(&["m"]);
    let backend = Arc::new(ScriptedBackend::new().with_reply(model_reply(&["Amended"])));
    let client = lexedit_core::ModelClient::new(backend, &config);
    let mut session = EditSession::new(ReadOnly(sample_document()), config, client).unwrap();
    let before = session.document().plain_text();

    let err = session.process_command("shorten").await.unwrap_err();

    assert!(matches!(err, EditError::ApplyFailed(DocumentError::Rejected(_))));
    assert!(err.is_retryable());
    assert_eq!(session.document().plain_text(), before);
    assert!(!session.can_undo());
}
