//! Gemini model configuration.

use serde::{Deserialize, Serialize};

/// Text generation settings.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeminiSchemaConfig {
    pub model: String,
    /// Inline API key. Environment and secrets file take precedence.
    pub api_key: Option<String>,
    pub api_base: String,
    /// Valid range: 1-8192.
    pub max_tokens: u32,
    /// Valid range: 0.0-2.0.
    pub temperature: f64,
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
}

impl std::fmt::Debug for GeminiSchemaConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiSchemaConfig")
            .field("model", &self.model)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("api_base", &self.api_base)
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

impl Default for GeminiSchemaConfig {
    fn default() -> Self {
        Self {
            model: "gemini-1.5-flash".into(),
            api_key: None,
            api_base: "https://generativelanguage.googleapis.com/v1beta/models".into(),
            max_tokens: 2048,
            temperature: 0.7,
            connect_timeout_secs: 10,
            request_timeout_secs: 120,
        }
    }
}
