//! Persona configuration: greeting, instructions, and refusal policy.

use serde::{Deserialize, Serialize};

/// How the assistant introduces itself and what it refuses to discuss.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PersonaConfig {
    pub name: String,
    /// First message of every conversation.
    pub greeting: String,
    /// Instruction template placed ahead of the biography.
    /// `None` uses the built-in template.
    pub instructions: Option<String>,
    /// Case-insensitive substrings that trigger a refusal.
    pub refusal_keywords: Vec<String>,
    pub refusal_message: String,
}

impl Default for PersonaConfig {
    fn default() -> Self {
        Self {
            name: "Casper".into(),
            greeting: "Hello..! I'm Casper, What's your name? Ask me anything about my owner or Data Science?".into(),
            instructions: None,
            refusal_keywords: Vec::new(),
            refusal_message: "Sorry, I cannot answer personal queries.".into(),
        }
    }
}
