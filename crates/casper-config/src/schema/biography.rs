//! Biography source configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Where the biography text comes from.
///
/// Checked in order: `text`, `path`, `url`. The URL may also be supplied
/// through the environment (see `SecretsConfig::details_url_env`).
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct BiographyConfig {
    pub text: Option<String>,
    pub path: Option<PathBuf>,
    pub url: Option<String>,
}
