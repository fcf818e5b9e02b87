//! Casper configuration system.
//!
//! TOML-based configuration with defaults for every section, so a missing
//! or partial config file still produces a working setup. Secrets are
//! resolved separately from the environment, a secrets file, or inline
//! values (see [`secrets`]).
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use casper_config::{load_config, config_to_json};
//!
//! let config = load_config().expect("failed to load config");
//! println!("{}", config_to_json(&config));
//! ```

pub mod schema;
pub mod secrets;
pub mod toml_loader;
pub mod validation;

pub use schema::CasperConfig;
pub use secrets::{resolve_secrets, ResolvedSecrets};

use casper_common::ConfigError;

/// Load config from the platform default path and validate it.
///
/// Creates a commented default file if none exists.
pub fn load_config() -> Result<CasperConfig, ConfigError> {
    let config = toml_loader::load_default()?;
    validation::validate(&config)?;
    Ok(config)
}

/// Load config from an explicit path and validate it.
pub fn load_config_from(path: &std::path::Path) -> Result<CasperConfig, ConfigError> {
    let config = toml_loader::load_from_path(path)?;
    validation::validate(&config)?;
    Ok(config)
}

/// Serialize a config to a pretty-printed JSON string.
///
/// An inline API key is replaced with `[REDACTED]`.
pub fn config_to_json(config: &CasperConfig) -> String {
    let mut redacted = config.clone();
    if redacted.gemini.api_key.is_some() {
        redacted.gemini.api_key = Some("[REDACTED]".into());
    }
    serde_json::to_string_pretty(&redacted)
        .unwrap_or_else(|e| format!("{{\"error\": \"failed to serialize config: {e}\"}}"))
}
