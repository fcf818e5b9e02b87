//! Tests for TOML config loading, creation, and path resolution.

use super::*;
use std::path::Path;

#[test]
fn load_from_nonexistent_returns_file_not_found() {
    let result = load_from_path(Path::new("/tmp/nonexistent_casper_config.toml"));
    assert!(matches!(
        result,
        Err(casper_common::ConfigError::FileNotFound(_))
    ));
}

#[test]
fn load_valid_partial_toml() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        r##"
[persona]
greeting = "Hi there! Ask me anything."

[storage.firestore]
enabled = true
project_id = "demo-project"
"##,
    )
    .unwrap();

    let config = load_from_path(&path).unwrap();
    assert_eq!(config.persona.greeting, "Hi there! Ask me anything.");
    assert!(config.storage.firestore.enabled);
    assert_eq!(
        config.storage.firestore.project_id.as_deref(),
        Some("demo-project")
    );
    // Defaults preserved
    assert_eq!(config.storage.firestore.collection, "chat_logs");
    assert_eq!(config.gemini.model, "gemini-1.5-flash");
}

#[test]
fn load_invalid_toml_returns_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "this is not valid toml {{{").unwrap();

    let result = load_from_path(&path);
    assert!(matches!(
        result,
        Err(casper_common::ConfigError::ParseError(_))
    ));
}

#[test]
fn load_does_not_validate() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[gemini]\ntemperature = 9.0\n").unwrap();

    let config = load_from_path(&path).unwrap();
    assert!((config.gemini.temperature - 9.0).abs() < f64::EPSILON);
}

#[test]
fn create_and_load_default_config() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("casper").join("config.toml");

    create_default_config(&path).unwrap();
    assert!(path.exists());

    let config = load_from_path(&path).unwrap();
    assert_eq!(config.persona.name, "Casper");
    assert!(config.storage.json_file.enabled);
    assert!(crate::validation::validate(&config).is_ok());
}

#[test]
fn default_config_path_ends_with_casper() {
    if let Ok(path) = default_config_path() {
        assert!(path.ends_with("casper/config.toml"));
    }
}
