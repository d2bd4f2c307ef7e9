//! Sequential model fallback

use super::{ChatBackend, ChatContext, CompletionBackend, Completion};
use crate::config::{EditorConfig, ModelConfig};
use crate::error::BackendError;
use std::sync::Arc;
use std::time::Duration;

/// Tries each model configuration in order, then the chat endpoint
///
/// Attempts are strictly sequential; the first success wins.
#[derive(Clone)]
pub struct ModelClient {
    backend: Arc<dyn CompletionBackend>,
    chat: Option<Arc<dyn ChatBackend>>,
    models: Vec<ModelConfig>,
    timeout: Duration,
    chat_fallback: bool,
}

impl std::fmt::Debug for ModelClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelClient")
            .field("models", &self.models.iter().map(|m| &m.model).collect::<Vec<_>>())
            .field("timeout", &self.timeout)
            .field("chat", &self.chat.is_some())
            .finish()
    }
}

impl ModelClient {
    /// Create client from a completion backend and editor settings
    #[must_use]
    pub fn new(backend: Arc<dyn CompletionBackend>, config: &EditorConfig) -> Self {
        Self {
            backend,
            chat: None,
            models: config.models.clone(),
            timeout: config.request_timeout(),
            chat_fallback: config.chat_fallback,
        }
    }

    /// With a chat backend for the last-resort path
    #[must_use]
    pub fn with_chat(mut self, chat: Arc<dyn ChatBackend>) -> Self {
        self.chat = Some(chat);
        self
    }

    /// Model configurations in preference order
    #[inline]
    #[must_use]
    pub fn models(&self) -> &[ModelConfig] {
        &self.models
    }

    /// Obtain raw text for `prompt`
    ///
    /// Never fails: exhaustion is reported as [`Completion::Unavailable`].
    pub async fn complete(&self, prompt: &str, chat_context: &ChatContext) -> Completion {
        let mut failures = Vec::new();

        for config in &self.models {
            match self.attempt(prompt, config).await {
                Ok(text) => {
                    tracing::info!(model = %config.model, chars = text.len(), "model answered");
                    return Completion::Structured {
                        model: config.model.clone(),
                        text,
                    };
                }
                Err(e) => {
                    tracing::warn!(model = %config.model, error = %e, "model attempt failed");
                    metrics::counter!(
                        "lexedit_model_attempt_failures_total",
                        "model" => config.model.clone()
                    )
                    .increment(1);
                    failures.push(format!("{}: {e}", config.model));
                }
            }
        }

        if let Some(chat) = self.chat.as_ref().filter(|_| self.chat_fallback) {
            tracing::info!(failed = failures.len(), "all models failed, trying chat endpoint");
            let message = chat_context.message();
            let outcome = tokio::time::timeout(self.timeout, chat.chat_complete(&message, chat_context))
                .await
                .unwrap_or_else(|_| Err(self.timed_out()));

            match outcome {
                Ok(reply) => match reply.text() {
                    Some(text) => {
                        return Completion::Conversational {
                            text: text.to_string(),
                        }
                    }
                    None => failures.push("chat: empty reply".to_string()),
                },
                Err(e) => {
                    tracing::warn!(error = %e, "chat fallback failed");
                    failures.push(format!("chat: {e}"));
                }
            }
        }

        tracing::warn!(failed = failures.len(), "no backend produced a response");
        Completion::Unavailable { failures }
    }

    async fn attempt(&self, prompt: &str, config: &ModelConfig) -> Result<String, BackendError> {
        tokio::time::timeout(self.timeout, self.backend.complete(prompt, config))
            .await
            .unwrap_or_else(|_| Err(self.timed_out()))
    }

    fn timed_out(&self) -> BackendError {
        BackendError::Timeout {
            secs: self.timeout.as_secs(),
        }
    }
}
