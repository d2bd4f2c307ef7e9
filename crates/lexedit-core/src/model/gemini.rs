//! Gemini `generateContent` backend

use super::CompletionBackend;
use crate::config::{ModelConfig, API_KEY_ENV};
use crate::error::BackendError;
use serde_json::{json, Value};
use std::time::Duration;

const BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Completion backend for the Gemini REST API
#[derive(Debug, Clone)]
pub struct GeminiBackend {
    http_client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl GeminiBackend {
    /// Create backend with an explicit API key
    #[must_use]
    pub fn new(api_key: impl Into<String>, timeout: Duration) -> Self {
        Self {
            http_client: reqwest::Client::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_default(),
            api_key: api_key.into(),
            base_url: BASE_URL.to_string(),
        }
    }

    /// Create backend with the key from the environment
    pub fn from_env(timeout: Duration) -> Result<Self, BackendError> {
        let key = std::env::var(API_KEY_ENV)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| BackendError::NotConfigured(format!("{API_KEY_ENV} is not set")))?;
        Ok(Self::new(key, timeout))
    }

    /// With a different base URL
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn endpoint(&self, config: &ModelConfig) -> String {
        format!(
            "{}/{}/models/{}:generateContent?key={}",
            self.base_url, config.api_version, config.model, self.api_key
        )
    }
}

/// Request body for one prompt
pub(crate) fn request_body(prompt: &str, config: &ModelConfig) -> Value {
    json!({
        "contents": [{ "parts": [{ "text": prompt }] }],
        "generationConfig": {
            "temperature": config.temperature,
            "topK": config.top_k,
            "topP": config.top_p,
            "maxOutputTokens": config.max_output_tokens,
        }
    })
}

/// Text of the first candidate
pub(crate) fn candidate_text(body: &Value) -> Result<String, BackendError> {
    body.pointer("/candidates/0/content/parts/0/text")
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| BackendError::Payload("response has no candidate text".to_string()))
}

#[async_trait::async_trait]
impl CompletionBackend for GeminiBackend {
    async fn complete(&self, prompt: &str, config: &ModelConfig) -> Result<String, BackendError> {
        tracing::debug!(
            model = %config.model,
            api_version = %config.api_version,
            prompt_chars = prompt.len(),
            "calling completion model"
        );

        let response = self
            .http_client
            .post(self.endpoint(config))
            .json(&request_body(prompt, config))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(BackendError::status(status, body));
        }

        let body: Value = response.json().await?;
        let text = candidate_text(&body)?;
        tracing::debug!(model = %config.model, chars = text.len(), "completion received");
        Ok(text)
    }
}
