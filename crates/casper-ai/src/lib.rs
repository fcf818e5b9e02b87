//! Text generation for Casper.
//!
//! Provides the `TextGenerator` seam the chat core calls through, a
//! Gemini implementation, and a disabled generator used when no
//! credentials are available.

pub mod gemini;

use async_trait::async_trait;

pub use gemini::{GeminiClient, GeminiConfig};

/// A remote model that turns a prompt into text.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<Generation, AiError>;
}

/// Text produced for a single prompt.
#[derive(Debug, Clone)]
pub struct Generation {
    pub text: String,
    pub usage: TokenUsage,
}

#[derive(Debug, Clone, Default)]
pub struct TokenUsage {
    pub input_tokens: u64,
    pub output_tokens: u64,
}

impl TokenUsage {
    pub fn total_tokens(&self) -> u64 {
        self.input_tokens.saturating_add(self.output_tokens)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AiError {
    #[error("API error: {0}")]
    ApiError(String),
    #[error("Rate limited")]
    RateLimited,
    #[error("Network error: {0}")]
    NetworkError(String),
    #[error("Parse error: {0}")]
    ParseError(String),
    #[error("Timeout")]
    Timeout,
    #[error("Generation unavailable: {0}")]
    NotConfigured(String),
}

/// Stand-in used when setup failed. Every call fails with `NotConfigured`.
#[derive(Debug, Clone)]
pub struct DisabledGenerator {
    reason: String,
}

impl DisabledGenerator {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

#[async_trait]
impl TextGenerator for DisabledGenerator {
    async fn generate(&self, _prompt: &str) -> Result<Generation, AiError> {
        Err(AiError::NotConfigured(self.reason.clone()))
    }
}
