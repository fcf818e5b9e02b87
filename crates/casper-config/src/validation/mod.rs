//! Full configuration validation.
//!
//! Each section has its own check; all errors are collected into a single
//! `ConfigError::ValidationError`.

mod helpers;


use crate::schema::CasperConfig;
use casper_common::ConfigError;

use helpers::{require_non_empty, validate_range, validate_range_f64};

/// Run all validations on a config, collecting all errors.
pub fn validate(config: &CasperConfig) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    validate_persona(&mut errors, config);
    validate_gemini(&mut errors, config);
    validate_storage(&mut errors, config);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors.join("; ")))
    }
}

fn validate_persona(errors: &mut Vec<String>, config: &CasperConfig) {
    let persona = &config.persona;
    require_non_empty(errors, "persona.greeting", &persona.greeting);
    require_non_empty(errors, "persona.refusal_message", &persona.refusal_message);
    if persona.refusal_keywords.iter().any(|k| k.trim().is_empty()) {
        errors.push("persona.refusal_keywords must not contain empty entries".into());
    }
}

fn validate_gemini(errors: &mut Vec<String>, config: &CasperConfig) {
    let gemini = &config.gemini;
    require_non_empty(errors, "gemini.model", &gemini.model);
    require_non_empty(errors, "gemini.api_base", &gemini.api_base);
    validate_range(errors, "gemini.max_tokens", gemini.max_tokens as u64, 1, 8192);
    validate_range_f64(errors, "gemini.temperature", gemini.temperature, 0.0, 2.0);
    validate_range(
        errors,
        "gemini.connect_timeout_secs",
        gemini.connect_timeout_secs,
        1,
        600,
    );
    validate_range(
        errors,
        "gemini.request_timeout_secs",
        gemini.request_timeout_secs,
        1,
        3600,
    );
}

fn validate_storage(errors: &mut Vec<String>, config: &CasperConfig) {
    let storage = &config.storage;
    if storage.json_file.enabled && storage.json_file.path.as_os_str().is_empty() {
        errors.push("storage.json_file.path must not be empty when enabled".into());
    }
    if storage.firestore.enabled {
        require_non_empty(errors, "storage.firestore.collection", &storage.firestore.collection);
        require_non_empty(errors, "storage.firestore.database", &storage.firestore.database);
        // Absent means "take it from the service-account credentials".
        if let Some(project) = &storage.firestore.project_id {
            require_non_empty(errors, "storage.firestore.project_id", project);
        }
    }
}
