//! Conversation persistence configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Local JSON snapshot of the conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct JsonFileConfig {
    pub enabled: bool,
    pub path: PathBuf,
}

impl Default for JsonFileConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: PathBuf::from("chat_history.json"),
        }
    }
}

/// Cloud Firestore document store.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FirestoreConfig {
    pub enabled: bool,
    /// Falls back to `project_id` in the service-account credentials.
    pub project_id: Option<String>,
    pub database: String,
    pub collection: String,
    pub api_base: String,
}

impl Default for FirestoreConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            project_id: None,
            database: "(default)".into(),
            collection: "chat_logs".into(),
            api_base: "https://firestore.googleapis.com/v1".into(),
        }
    }
}

/// All persistence sinks. Every enabled sink receives each snapshot.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct StorageConfig {
    pub json_file: JsonFileConfig,
    pub firestore: FirestoreConfig,
}
