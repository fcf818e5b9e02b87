//! Conversation persistence sinks.
//!
//! Sinks are best effort: the session logs and reports failures but never
//! retries and never lets them affect the in-memory conversation.

mod firestore;
mod json_file;
mod oauth;

use async_trait::async_trait;
use casper_common::SessionId;

use crate::message::Message;

pub use firestore::{project_id_from_credentials, FirestoreSink, FirestoreTarget};
pub use json_file::JsonFileSink;
pub use oauth::{FirestoreAuth, ServiceAccount, DATASTORE_SCOPE};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("network error: {0}")]
    Network(String),

    #[error("store rejected write: {0}")]
    Rejected(String),

    #[error("credentials error: {0}")]
    Credentials(String),
}

/// Destination for conversation snapshots.
#[async_trait]
pub trait ConversationSink: Send + Sync {
    /// Short label used in logs and failure reports.
    fn name(&self) -> &str;

    /// Store the full conversation under `session_id`, replacing any earlier snapshot.
    async fn save(&self, session_id: &SessionId, conversation: &[Message])
        -> Result<(), StoreError>;
}
