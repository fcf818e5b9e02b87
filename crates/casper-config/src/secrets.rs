//! Secret resolution.
//!
//! Each secret is looked up in order: environment variable, secrets file,
//! inline config value. Absent secrets stay `None`; callers decide whether
//! that is fatal or a degraded mode.

use std::path::Path;

use casper_common::ConfigError;
use serde::Deserialize;
use tracing::debug;

use crate::schema::CasperConfig;

/// Contents of the optional secrets file.
#[derive(Default, Deserialize)]
#[serde(default)]
struct SecretsFile {
    api_key: Option<String>,
    firestore_creds: Option<String>,
    firestore_token: Option<String>,
    details_url: Option<String>,
}

/// Secrets after applying source precedence.
#[derive(Clone, Default)]
pub struct ResolvedSecrets {
    pub api_key: Option<String>,
    /// Service-account JSON for the document store.
    pub firestore_creds: Option<String>,
    /// OAuth bearer token for the document store.
    pub firestore_token: Option<String>,
    pub details_url: Option<String>,
}

impl std::fmt::Debug for ResolvedSecrets {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mark = |v: &Option<String>| v.as_ref().map(|_| "[REDACTED]");
        f.debug_struct("ResolvedSecrets")
            .field("api_key", &mark(&self.api_key))
            .field("firestore_creds", &mark(&self.firestore_creds))
            .field("firestore_token", &mark(&self.firestore_token))
            .field("details_url", &self.details_url)
            .finish()
    }
}

/// Resolve secrets from the process environment.
pub fn resolve_secrets(config: &CasperConfig) -> Result<ResolvedSecrets, ConfigError> {
    resolve_with(config, |name| std::env::var(name).ok())
}

/// Resolve secrets with a custom environment lookup.
pub fn resolve_with(
    config: &CasperConfig,
    env: impl Fn(&str) -> Option<String>,
) -> Result<ResolvedSecrets, ConfigError> {
    let file = match &config.secrets.file {
        Some(path) => load_secrets_file(path)?,
        None => SecretsFile::default(),
    };
    let env = |name: &str| env(name).filter(|v| !v.trim().is_empty());

    Ok(ResolvedSecrets {
        api_key: env(config.secrets.api_key_env.as_str())
            .or(file.api_key)
            .or_else(|| config.gemini.api_key.clone()),
        firestore_creds: env(config.secrets.firestore_creds_env.as_str()).or(file.firestore_creds),
        firestore_token: env(config.secrets.firestore_token_env.as_str()).or(file.firestore_token),
        details_url: env(config.secrets.details_url_env.as_str())
            .or(file.details_url)
            .or_else(|| config.biography.url.clone()),
    })
}

fn load_secrets_file(path: &Path) -> Result<SecretsFile, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.to_path_buf()));
    }
    let content = std::fs::read_to_string(path).map_err(|e| {
        ConfigError::ParseError(format!("failed to read secrets {}: {e}", path.display()))
    })?;
    debug!("loaded secrets file {}", path.display());
    toml::from_str(&content)
        .map_err(|e| ConfigError::ParseError(format!("failed to parse secrets file: {e}")))
}
