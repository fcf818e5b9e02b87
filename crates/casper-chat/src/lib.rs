//! Conversation core for Casper.
//!
//! A `ChatSession` owns one `Conversation` and drives each turn: append the
//! user message, ask the `ResponseGenerator` for a reply (a refusal or a
//! model generation), append the reply, then snapshot the conversation to
//! every configured `ConversationSink`. Rendering is left to the caller,
//! which reads `Conversation::all()` after each turn.

pub mod biography;
pub mod conversation;
pub mod message;
pub mod prompt;
pub mod responder;
pub mod session;
pub mod store;

#[cfg(test)]
mod test_http;

pub use biography::{fetch_details, load_biography, BiographySource};
pub use conversation::Conversation;
pub use message::{Message, Origin};
pub use prompt::{build_prompt, DEFAULT_INSTRUCTIONS};
pub use responder::{RefusalPolicy, Reply, ResponseGenerator};
pub use session::{ChatError, ChatSession, SinkFailure, TurnReport, TurnState};
pub use store::{
    project_id_from_credentials, ConversationSink, FirestoreAuth, FirestoreSink, FirestoreTarget,
    JsonFileSink, ServiceAccount, StoreError,
};
