//! Reply selection: refusal filter, then model generation.

use std::sync::Arc;

use casper_ai::{AiError, Generation, TextGenerator};
use tracing::debug;

use crate::conversation::Conversation;
use crate::prompt::{build_prompt, DEFAULT_INSTRUCTIONS};

/// Keyword filter for questions the assistant should not answer.
#[derive(Debug, Clone)]
pub struct RefusalPolicy {
    keywords: Vec<String>,
    message: String,
}

impl RefusalPolicy {
    /// Keywords are matched case-insensitively as substrings.
    pub fn new(keywords: impl IntoIterator<Item = String>, message: impl Into<String>) -> Self {
        Self {
            keywords: keywords
                .into_iter()
                .map(|k| k.to_lowercase())
                .filter(|k| !k.is_empty())
                .collect(),
            message: message.into(),
        }
    }

    /// Policy with no keywords: never refuses.
    pub fn disabled(message: impl Into<String>) -> Self {
        Self::new(Vec::new(), message)
    }

    pub fn matches(&self, user_message: &str) -> bool {
        if self.keywords.is_empty() {
            return false;
        }
        let lowered = user_message.to_lowercase();
        self.keywords.iter().any(|k| lowered.contains(k.as_str()))
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Default for RefusalPolicy {
    fn default() -> Self {
        Self::disabled("Sorry, I cannot answer personal queries.")
    }
}

/// What the assistant says back for one turn.
#[derive(Debug, Clone)]
pub enum Reply {
    Refused(String),
    Generated(Generation),
}

impl Reply {
    pub fn text(&self) -> &str {
        match self {
            Reply::Refused(text) => text,
            Reply::Generated(generation) => &generation.text,
        }
    }

    pub fn is_refusal(&self) -> bool {
        matches!(self, Reply::Refused(_))
    }
}

/// Builds prompts from the biography and delegates to a `TextGenerator`.
pub struct ResponseGenerator {
    generator: Arc<dyn TextGenerator>,
    refusal: RefusalPolicy,
    instructions: String,
    biography: String,
}

impl ResponseGenerator {
    pub fn new(generator: Arc<dyn TextGenerator>, biography: impl Into<String>) -> Self {
        Self {
            generator,
            refusal: RefusalPolicy::default(),
            instructions: DEFAULT_INSTRUCTIONS.to_string(),
            biography: biography.into(),
        }
    }

    pub fn with_refusal(mut self, refusal: RefusalPolicy) -> Self {
        self.refusal = refusal;
        self
    }

    pub fn with_instructions(mut self, instructions: impl Into<String>) -> Self {
        self.instructions = instructions.into();
        self
    }

    pub fn biography(&self) -> &str {
        &self.biography
    }

    /// Prompt that would be sent for `user_message`.
    pub fn prompt_for(&self, user_message: &str) -> String {
        build_prompt(&self.instructions, &self.biography, user_message)
    }

    /// Produce the reply to `user_message`.
    ///
    /// Prior turns in `_conversation` are not sent to the model. Generation
    /// errors are returned unchanged.
    pub async fn respond(
        &self,
        _conversation: &Conversation,
        user_message: &str,
    ) -> Result<Reply, AiError> {
        if self.refusal.matches(user_message) {
            debug!("refusal keyword matched, skipping generation");
            return Ok(Reply::Refused(self.refusal.message().to_string()));
        }

        let prompt = self.prompt_for(user_message);
        let generation = self.generator.generate(&prompt).await?;
        Ok(Reply::Generated(generation))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use casper_ai::TokenUsage;
    use std::sync::Mutex;

    /// Records prompts and answers with a fixed text.
    struct Recording {
        prompts: Mutex<Vec<String>>,
        answer: Result<String, String>,
    }

    impl Recording {
        fn ok(answer: &str) -> Arc<Self> {
            Arc::new(Self {
                prompts: Mutex::new(Vec::new()),
                answer: Ok(answer.to_string()),
            })
        }

        fn failing(reason: &str) -> Arc<Self> {
            Arc::new(Self {
                prompts: Mutex::new(Vec::new()),
                answer: Err(reason.to_string()),
            })
        }

        fn calls(&self) -> usize {
            self.prompts.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl TextGenerator for Recording {
        async fn generate(&self, prompt: &str) -> Result<Generation, AiError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            match &self.answer {
                Ok(text) => Ok(Generation {
                    text: text.clone(),
                    usage: TokenUsage::default(),
                }),
                Err(reason) => Err(AiError::ApiError(reason.clone())),
            }
        }
    }

    #[test]
    fn empty_policy_never_refuses() {
        let policy = RefusalPolicy::default();
        assert!(!policy.matches("What is your phone number?"));
        assert!(!policy.matches(""));
    }

    #[test]
    fn keywords_match_case_insensitively() {
        let policy = RefusalPolicy::new(vec!["Salary".to_string()], "no");
        assert!(policy.matches("what is your SALARY?"));
        assert!(!policy.matches("what are your skills?"));
    }

    #[tokio::test]
    async fn generated_reply_uses_biography_prompt() {
        let generator = Recording::ok("I am Casper.");
        let responder = ResponseGenerator::new(generator.clone(), "Name: X");
        let conversation = Conversation::new("hi");

        let reply = responder
            .respond(&conversation, "Who are you?")
            .await
            .unwrap();

        assert!(!reply.is_refusal());
        assert_eq!(reply.text(), "I am Casper.");
        let prompts = generator.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("Name: X"));
        assert!(prompts[0].ends_with("\nUser: Who are you?"));
    }

    #[tokio::test]
    async fn refusal_skips_the_model() {
        let generator = Recording::ok("should not be used");
        let policy = RefusalPolicy::new(
            vec!["address".to_string()],
            "Sorry, I cannot answer personal queries.",
        );
        let responder = ResponseGenerator::new(generator.clone(), "bio").with_refusal(policy);
        let conversation = Conversation::new("hi");

        let reply = responder
            .respond(&conversation, "Where is your ADDRESS?")
            .await
            .unwrap();

        assert!(reply.is_refusal());
        assert_eq!(reply.text(), "Sorry, I cannot answer personal queries.");
        assert_eq!(generator.calls(), 0);
    }

    #[tokio::test]
    async fn generation_errors_propagate() {
        let responder = ResponseGenerator::new(Recording::failing("quota"), "bio");
        let err = responder
            .respond(&Conversation::new("hi"), "hello")
            .await
            .unwrap_err();
        assert!(matches!(err, AiError::ApiError(ref m) if m == "quota"));
    }

    #[test]
    fn custom_instructions_lead_the_prompt() {
        let responder =
            ResponseGenerator::new(Recording::ok("x"), "BIO").with_instructions("SYSTEM:");
        assert_eq!(responder.prompt_for("q"), "SYSTEM:BIO\nUser: q");
    }
}
