//! Editor configuration
//!
//! Loaded from TOML with every key optional. Secrets never live in the file:
//! the completion API key and the chat endpoint come from the environment.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Environment variable holding the completion API key
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Environment variable holding the chat endpoint base URL
pub const CHAT_URL_ENV: &str = "LEXEDIT_CHAT_URL";

/// What to do when the user has nothing selected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WholeDocumentPolicy {
    /// Treat the whole document as the selection
    #[default]
    Fallback,
    /// Refuse the edit
    Refuse,
}

/// One completion model configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Model name
    pub model: String,
    /// API version segment (`v1`, `v1beta`)
    pub api_version: String,
    /// Output token ceiling
    pub max_output_tokens: u32,
    /// Sampling temperature
    pub temperature: f32,
    /// Top-k sampling
    pub top_k: u32,
    /// Nucleus sampling
    pub top_p: f32,
}

impl ModelConfig {
    /// Create config with default sampling settings
    #[must_use]
    pub fn new(model: impl Into<String>, api_version: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            api_version: api_version.into(),
            ..Self::default()
        }
    }

    /// With max output tokens
    #[inline]
    #[must_use]
    pub fn with_max_output_tokens(mut self, tokens: u32) -> Self {
        self.max_output_tokens = tokens;
        self
    }

    /// With temperature
    #[inline]
    #[must_use]
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            model: String::new(),
            api_version: "v1".to_string(),
            max_output_tokens: 8192,
            temperature: 0.1,
            top_k: 40,
            top_p: 0.95,
        }
    }
}

/// Default model preference order, fastest first
#[must_use]
pub fn default_models() -> Vec<ModelConfig> {
    vec![
        ModelConfig::new("gemini-1.5-flash-latest", "v1"),
        ModelConfig::new("gemini-1.5-flash", "v1"),
        ModelConfig::new("gemini-2.0-flash-exp", "v1beta"),
        ModelConfig::new("gemini-1.5-pro", "v1"),
    ]
}

/// Edit session configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Maximum history entries kept
    pub history_capacity: usize,
    /// Characters of context on each side of the selection
    pub context_window: usize,
    /// Record history entries
    pub enable_history: bool,
    /// Behaviour when nothing is selected
    pub whole_document_policy: WholeDocumentPolicy,
    /// Models in preference order
    pub models: Vec<ModelConfig>,
    /// Per-attempt timeout in seconds
    pub request_timeout_secs: u64,
    /// Use the chat endpoint when every model fails
    pub chat_fallback: bool,
}

impl EditorConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse TOML, defaulting missing keys, and validate
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&text)?;
        tracing::info!(path = %path.display(), models = config.models.len(), "loaded editor config");
        Ok(config)
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.history_capacity == 0 {
            return Err(ConfigError::invalid(
                "history_capacity",
                "must be greater than zero",
            ));
        }
        if self.models.is_empty() {
            return Err(ConfigError::invalid("models", "at least one model is required"));
        }
        if let Some(bad) = self
            .models
            .iter()
            .find(|m| !(0.0..=2.0).contains(&m.temperature))
        {
            return Err(ConfigError::invalid(
                "temperature",
                format!("{} for {} is outside [0, 2]", bad.temperature, bad.model),
            ));
        }
        if let Some(bad) = self.models.iter().find(|m| m.model.trim().is_empty()) {
            return Err(ConfigError::invalid(
                "model",
                format!("empty model name (api version {})", bad.api_version),
            ));
        }
        Ok(())
    }

    /// Per-attempt timeout
    #[inline]
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// With history capacity
    #[inline]
    #[must_use]
    pub fn with_history_capacity(mut self, capacity: usize) -> Self {
        self.history_capacity = capacity;
        self
    }

    /// With context window
    #[inline]
    #[must_use]
    pub fn with_context_window(mut self, chars: usize) -> Self {
        self.context_window = chars;
        self
    }

    /// With history recording on or off
    #[inline]
    #[must_use]
    pub fn with_history(mut self, enabled: bool) -> Self {
        self.enable_history = enabled;
        self
    }

    /// With whole-document policy
    #[inline]
    #[must_use]
    pub fn with_whole_document_policy(mut self, policy: WholeDocumentPolicy) -> Self {
        self.whole_document_policy = policy;
        self
    }

    /// With models
    #[inline]
    #[must_use]
    pub fn with_models(mut self, models: Vec<ModelConfig>) -> Self {
        self.models = models;
        self
    }

    /// With request timeout
    #[inline]
    #[must_use]
    pub fn with_request_timeout_secs(mut self, secs: u64) -> Self {
        self.request_timeout_secs = secs;
        self
    }

    /// With chat fallback on or off
    #[inline]
    #[must_use]
    pub fn with_chat_fallback(mut self, enabled: bool) -> Self {
        self.chat_fallback = enabled;
        self
    }
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            history_capacity: 50,
            context_window: 100,
            enable_history: true,
            whole_document_policy: WholeDocumentPolicy::Fallback,
            models: default_models(),
            request_timeout_secs: 60,
            chat_fallback: true,
        }
    }
}
