//! Model backends
//!
//! Two contracts sit at the network boundary:
//! - [`CompletionBackend`]: structured completion against one model config
//! - [`ChatBackend`]: plain conversational completion, last resort only
//!
//! [`ModelClient`] drives them as a sequential fallback chain.

mod chat;
mod client;
mod gemini;

pub use chat::ChatApiBackend;
pub use client::ModelClient;
pub use gemini::GeminiBackend;

use crate::config::ModelConfig;
use crate::error::BackendError;
use crate::types::DocumentCategory;
use serde::{Deserialize, Serialize};

/// Text completion against a remote model
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait CompletionBackend: Send + Sync {
    /// Complete `prompt` with the given model configuration
    async fn complete(&self, prompt: &str, config: &ModelConfig) -> Result<String, BackendError>;
}

/// Conversational completion endpoint
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait ChatBackend: Send + Sync {
    /// Send one chat message
    async fn chat_complete(
        &self,
        message: &str,
        context: &ChatContext,
    ) -> Result<ChatReply, BackendError>;
}

/// Context sent with a fallback chat message
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatContext {
    /// User command
    pub command: String,
    /// Plain text of the selection
    pub original_text: String,
    /// Document category
    pub category: Option<DocumentCategory>,
}

impl ChatContext {
    /// Message reformulating the edit as a conversational request
    #[must_use]
    pub fn message(&self) -> String {
        format!("{}: {}", self.command, self.original_text)
    }
}

/// Chat endpoint reply; either field may carry the answer
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatReply {
    /// Primary answer field
    #[serde(default)]
    pub response: Option<String>,
    /// Alternate answer field
    #[serde(default)]
    pub answer: Option<String>,
}

impl ChatReply {
    /// First non-blank answer
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        [self.response.as_deref(), self.answer.as_deref()]
            .into_iter()
            .flatten()
            .find(|t| !t.trim().is_empty())
    }
}

/// What the model client obtained
#[derive(Debug, Clone, PartialEq)]
pub enum Completion {
    /// Raw text from a structured completion
    Structured {
        /// Model that answered
        model: String,
        /// Raw response
        text: String,
    },
    /// Plain text from the chat fallback
    Conversational {
        /// Reply text
        text: String,
    },
    /// Every backend failed
    Unavailable {
        /// One entry per failed attempt
        failures: Vec<String>,
    },
}
