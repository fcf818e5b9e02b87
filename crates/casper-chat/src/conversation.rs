//! Append-only conversation history.

use crate::message::Message;

/// Ordered chat history for one session.
///
/// Always starts with the AI greeting. Messages are only ever appended;
/// insertion order is display order.
#[derive(Debug, Clone)]
pub struct Conversation {
    messages: Vec<Message>,
}

impl Conversation {
    /// Start a conversation seeded with the assistant's greeting.
    pub fn new(greeting: impl Into<String>) -> Self {
        Self {
            messages: vec![Message::ai(greeting)],
        }
    }

    pub fn append(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// All messages in insertion order.
    pub fn all(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Never true: the greeting is always present.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// Owned copy for persistence.
    pub fn snapshot(&self) -> Vec<Message> {
        self.messages.clone()
    }
}
