//! HTTP chat endpoint backend

use super::{ChatBackend, ChatContext, ChatReply};
use crate::config::CHAT_URL_ENV;
use crate::error::BackendError;
use serde_json::json;
use std::time::Duration;

/// Chat backend posting to `{base}/api/chat`
#[derive(Debug, Clone)]
pub struct ChatApiBackend {
    http_client: reqwest::Client,
    base_url: String,
}

impl ChatApiBackend {
    /// Create backend for a base URL
    #[must_use]
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            http_client: reqwest::Client::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_default(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Create backend from the environment, if configured
    #[must_use]
    pub fn from_env(timeout: Duration) -> Option<Self> {
        std::env::var(CHAT_URL_ENV)
            .ok()
            .filter(|url| !url.trim().is_empty())
            .map(|url| Self::new(url, timeout))
    }

    fn endpoint(&self) -> String {
        format!("{}/api/chat", self.base_url)
    }
}

#[async_trait::async_trait]
impl ChatBackend for ChatApiBackend {
    async fn chat_complete(
        &self,
        message: &str,
        context: &ChatContext,
    ) -> Result<ChatReply, BackendError> {
        let body = json!({
            "message": message,
            "context": {
                "documentId": "fallback",
                "command": context.command,
                "category": context.category,
            },
            "document": context.original_text,
        });

        let response = self
            .http_client
            .post(self.endpoint())
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(BackendError::status(status, body));
        }

        Ok(response.json::<ChatReply>().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_trims_trailing_slash() {
        let backend = ChatApiBackend::new("http://localhost:3000/", Duration::from_secs(1));
        assert_eq!(backend.endpoint(), "http://localhost:3000/api/chat");
    }
}
