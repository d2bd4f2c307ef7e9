//! Testing utilities for the lexedit workspace
//!
//! Scripted backends, fixtures and session builders.

#![allow(missing_docs)]

use lexedit_core::{
    BackendError, ChatBackend, ChatContext, ChatReply, CompletionBackend, EditSession, EditorConfig,
    ModelClient, ModelConfig,
};
use lexedit_document::{MemoryDocument, StructuredNode};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;

/// Completion backend answering from a queue; an empty queue fails
#[derive(Debug, Default)]
pub struct ScriptedBackend {
    replies: Mutex<VecDeque<Result<String, BackendError>>>,
    calls: Mutex<Vec<(String, String)>>,
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_reply(self, reply: impl Into<String>) -> Self {
        self.replies.lock().push_back(Ok(reply.into()));
        self
    }

    pub fn with_failure(self, error: BackendError) -> Self {
        self.replies.lock().push_back(Err(error));
        self
    }

    pub fn push_reply(&self, reply: impl Into<String>) {
        self.replies.lock().push_back(Ok(reply.into()));
    }

    /// Models called so far, in order
    pub fn models_called(&self) -> Vec<String> {
        self.calls.lock().iter().map(|(model, _)| model.clone()).collect()
    }

    /// Prompts received so far, in order
    pub fn prompts(&self) -> Vec<String> {
        self.calls.lock().iter().map(|(_, prompt)| prompt.clone()).collect()
    }
}

#[async_trait::async_trait]
impl CompletionBackend for ScriptedBackend {
    async fn complete(&self, prompt: &str, config: &ModelConfig) -> Result<String, BackendError> {
        self.calls.lock().push((config.model.clone(), prompt.to_string()));
        self.replies
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err(BackendError::Transport("script exhausted".to_string())))
    }
}

/// Completion backend that always fails
#[derive(Debug, Clone)]
pub struct FailingBackend(pub BackendError);

#[async_trait::async_trait]
impl CompletionBackend for FailingBackend {
    async fn complete(&self, _prompt: &str, _config: &ModelConfig) -> Result<String, BackendError> {
        Err(self.0.clone())
    }
}

/// Chat backend with a fixed reply
#[derive(Debug, Default)]
pub struct ScriptedChat {
    reply: Option<ChatReply>,
    messages: Mutex<Vec<String>>,
}

impl ScriptedChat {
    pub fn answering(text: impl Into<String>) -> Self {
        Self {
            reply: Some(ChatReply {
                response: Some(text.into()),
                answer: None,
            }),
            messages: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().clone()
    }
}

#[async_trait::async_trait]
impl ChatBackend for ScriptedChat {
    async fn chat_complete(
        &self,
        message: &str,
        _context: &ChatContext,
    ) -> Result<ChatReply, BackendError> {
        self.messages.lock().push(message.to_string());
        self.reply
            .clone()
            .ok_or_else(|| BackendError::status(502, "bad gateway"))
    }
}

/// Config with the given model names and a short timeout
pub fn test_config(models: &[&str]) -> EditorConfig {
    EditorConfig::default()
        .with_models(models.iter().map(|m| ModelConfig::new(*m, "v1")).collect())
        .with_request_timeout_secs(5)
}

/// Two-paragraph contract: positions 0..34 and 34..62
pub fn sample_document() -> MemoryDocument {
    MemoryDocument::new(StructuredNode::root(vec![
        StructuredNode::paragraph("This agreement binds the parties"),
        StructuredNode::paragraph("The respondent is Jane Doe"),
    ]))
}

/// Single-paragraph document with `text`
pub fn legal_paragraph_doc(text: &str) -> MemoryDocument {
    MemoryDocument::new(StructuredNode::root(vec![StructuredNode::paragraph(text)]))
}

/// Canonical model reply holding one paragraph per text
pub fn model_reply(paragraphs: &[&str]) -> String {
    let root = StructuredNode::root(paragraphs.iter().map(|p| StructuredNode::paragraph(*p)).collect());
    serde_json::to_string(&root).unwrap()
}

/// Session over `document` driven by `backend`, optionally with chat fallback
pub fn session_with(
    document: MemoryDocument,
    config: EditorConfig,
    backend: Arc<dyn CompletionBackend>,
    chat: Option<Arc<dyn ChatBackend>>,
) -> EditSession<MemoryDocument> {
    let mut client = ModelClient::new(backend, &config);
    if let Some(chat) = chat {
        client = client.with_chat(chat);
    }
    EditSession::new(document, config, client).unwrap()
}
