//! One chat session and its turn state machine.
//!
//! A turn moves `Idle -> AwaitingGeneration`, then either appends the reply
//! and snapshots the conversation, or surfaces the error and appends
//! nothing. Either way the session is `Idle` again afterwards.

use std::sync::Arc;

use casper_ai::AiError;
use casper_common::SessionId;
use tracing::{debug, info, warn};

use crate::conversation::Conversation;
use crate::message::Message;
use crate::responder::{Reply, ResponseGenerator};
use crate::store::{ConversationSink, StoreError};

#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("message is empty")]
    EmptyMessage,

    #[error("generation failed: {0}")]
    Generation(#[from] AiError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnState {
    Idle,
    AwaitingGeneration,
}

/// A sink that failed to store the latest snapshot.
#[derive(Debug)]
pub struct SinkFailure {
    pub sink: String,
    pub error: StoreError,
}

/// Result of a completed turn.
#[derive(Debug)]
pub struct TurnReport {
    pub reply: String,
    pub refused: bool,
    /// Persistence failures; empty when every sink succeeded.
    pub sink_failures: Vec<SinkFailure>,
}

/// Owns the conversation for one user session.
pub struct ChatSession {
    id: SessionId,
    conversation: Conversation,
    responder: ResponseGenerator,
    sinks: Vec<Arc<dyn ConversationSink>>,
    state: TurnState,
}

impl ChatSession {
    pub fn new(greeting: impl Into<String>, responder: ResponseGenerator) -> Self {
        let id = SessionId::new();
        info!(session = %id, "chat session started");
        Self {
            id,
            conversation: Conversation::new(greeting),
            responder,
            sinks: Vec::new(),
            state: TurnState::Idle,
        }
    }

    pub fn with_sinks(mut self, sinks: Vec<Arc<dyn ConversationSink>>) -> Self {
        self.sinks = sinks;
        self
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    pub fn state(&self) -> TurnState {
        self.state
    }

    /// Run one turn for `user_text`.
    ///
    /// Blank input is rejected before anything is appended. On generation
    /// failure the conversation ends on the user's message and nothing is
    /// persisted. Sink failures are reported in the `TurnReport`, never
    /// returned as errors.
    pub async fn submit(&mut self, user_text: &str) -> Result<TurnReport, ChatError> {
        if user_text.trim().is_empty() {
            return Err(ChatError::EmptyMessage);
        }

        self.conversation.append(Message::user(user_text));
        self.state = TurnState::AwaitingGeneration;
        let outcome = self.responder.respond(&self.conversation, user_text).await;
        self.state = TurnState::Idle;

        let reply = match outcome {
            Ok(reply) => reply,
            Err(e) => {
                warn!(session = %self.id, error = %e, "generation failed");
                return Err(ChatError::Generation(e));
            }
        };

        let refused = reply.is_refusal();
        let text = match reply {
            Reply::Refused(text) => text,
            Reply::Generated(generation) => {
                debug!(
                    session = %self.id,
                    tokens = generation.usage.total_tokens(),
                    "reply generated"
                );
                generation.text
            }
        };
        self.conversation.append(Message::ai(text.clone()));

        let sink_failures = self.persist().await;
        Ok(TurnReport {
            reply: text,
            refused,
            sink_failures,
        })
    }

    /// Snapshot the conversation to every sink. Failures are logged and returned.
    pub async fn persist(&self) -> Vec<SinkFailure> {
        let mut failures = Vec::new();
        for sink in &self.sinks {
            match sink.save(&self.id, self.conversation.all()).await {
                Ok(()) => debug!(session = %self.id, sink = sink.name(), "conversation saved"),
                Err(error) => {
                    warn!(
                        session = %self.id,
                        sink = sink.name(),
                        error = %error,
                        "error saving chat"
                    );
                    failures.push(SinkFailure {
                        sink: sink.name().to_string(),
                        error,
                    });
                }
            }
        }
        failures
    }
}
