//! Terminal rendering of the conversation.

use std::io::{self, Write};

use casper_chat::{Conversation, Origin};

/// Prints messages that have not been shown yet.
///
/// The conversation only grows, so remembering how many messages were
/// printed is enough to redraw after each turn.
pub struct Renderer {
    ai_label: String,
    shown: usize,
}

impl Renderer {
    pub fn new(ai_label: impl Into<String>) -> Self {
        Self {
            ai_label: ai_label.into(),
            shown: 0,
        }
    }

    pub fn render(&mut self, conversation: &Conversation, out: &mut impl Write) -> io::Result<()> {
        for message in conversation.all().iter().skip(self.shown) {
            let label = match message.origin() {
                Origin::Ai => self.ai_label.as_str(),
                Origin::User => "You",
            };
            writeln!(out, "{label}: {}", message.text())?;
        }
        self.shown = conversation.len();
        out.flush()
    }

    pub fn notice(&self, text: &str, out: &mut impl Write) -> io::Result<()> {
        writeln!(out, "[!] {text}")?;
        out.flush()
    }
}
