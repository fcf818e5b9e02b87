//! System configuration types: secret sources and logging.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Where secrets are looked up.
///
/// Each secret is read from its environment variable first, then from the
/// secrets file, then from any inline value in the config.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SecretsConfig {
    /// TOML file with `api_key`, `firestore_creds`, `firestore_token`, `details_url`.
    pub file: Option<PathBuf>,
    pub api_key_env: String,
    pub firestore_creds_env: String,
    pub firestore_token_env: String,
    pub details_url_env: String,
}

impl Default for SecretsConfig {
    fn default() -> Self {
        Self {
            file: None,
            api_key_env: "API_KEY".into(),
            firestore_creds_env: "FIREBASE_CREDS".into(),
            firestore_token_env: "FIREBASE_TOKEN".into(),
            details_url_env: "DETAILS_URL".into(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `tracing_subscriber` filter directive.
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "casper=info".into(),
        }
    }
}
