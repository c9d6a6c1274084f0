//! Unit tests for configuration loading and graceful degradation
//!
//! Tests cover:
//! - Missing TOML files do not stop startup (defaults returned)
//! - Malformed TOML degrades to defaults
//! - Partial TOML files keep unset fields as None
//! - Strict loader surfaces parse errors as Config errors

use folio_common::config::{
    load_toml_config, load_toml_config_or_default, resolve_carousel_interval, ConfigSource,
    TomlConfig, DEFAULT_CAROUSEL_INTERVAL_MS,
};
use folio_common::Error;
use std::io::Write;
use std::time::Duration;
use tempfile::NamedTempFile;

fn write_toml(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("create temp file");
    file.write_all(content.as_bytes()).expect("write temp file");
    file
}

#[test]
fn test_missing_file_uses_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.toml");

    let (config, source) = load_toml_config_or_default(Some(&path));
    assert!(matches!(source, ConfigSource::Missing(_)));
    assert!(config.port.is_none());
    assert!(config.gemini_api_key.is_none());
    assert_eq!(config.logging.level, "info");
}

#[test]
fn test_no_location_uses_defaults() {
    let (config, source) = load_toml_config_or_default(None);
    assert!(matches!(source, ConfigSource::NoLocation));
    assert!(config.bind_addr.is_none());
}

#[test]
fn test_full_file_parses() {
    let file = write_toml(
        r#"
bind_addr = "0.0.0.0"
port = 8080
carousel_interval_ms = 5000
gemini_model = "gemini-2.5-flash"
gemini_api_key = "secret"

[logging]
level = "debug"
"#,
    );

    let config = load_toml_config(file.path()).unwrap();
    assert_eq!(config.bind_addr.as_deref(), Some("0.0.0.0"));
    assert_eq!(config.port, Some(8080));
    assert_eq!(config.carousel_interval_ms, Some(5000));
    assert_eq!(config.gemini_model.as_deref(), Some("gemini-2.5-flash"));
    assert_eq!(config.gemini_api_key.as_deref(), Some("secret"));
    assert_eq!(config.logging.level, "debug");
}

#[test]
fn test_partial_file_keeps_defaults() {
    let file = write_toml("port = 9000\n");

    let config = load_toml_config(file.path()).unwrap();
    assert_eq!(config.port, Some(9000));
    assert!(config.carousel_interval_ms.is_none());
    assert_eq!(config.logging.level, "info");
    assert_eq!(
        resolve_carousel_interval(config.carousel_interval_ms),
        Duration::from_millis(DEFAULT_CAROUSEL_INTERVAL_MS)
    );
}

#[test]
fn test_malformed_file_strict_loader_errors() {
    let file = write_toml("port = \"not a number\"\n");

    let result = load_toml_config(file.path());
    assert!(matches!(result, Err(Error::Config(_))));
}

#[test]
fn test_malformed_file_degrades_to_defaults() {
    let file = write_toml("this is [not toml");

    let (config, source) = load_toml_config_or_default(Some(file.path()));
    assert!(matches!(source, ConfigSource::Invalid(Error::Config(_))));
    assert!(config.port.is_none());
}

#[test]
fn test_valid_file_reports_loaded() {
    let file = write_toml("port = 6000\n");

    let (config, source) = load_toml_config_or_default(Some(file.path()));
    assert!(matches!(source, ConfigSource::Loaded(ref p) if p == file.path()));
    assert_eq!(config.port, Some(6000));
}

#[test]
fn test_round_trip_serialization() {
    let config = TomlConfig {
        port: Some(5780),
        ..Default::default()
    };
    let text = toml::to_string(&config).unwrap();
    let back: TomlConfig = toml::from_str(&text).unwrap();
    assert_eq!(back.port, Some(5780));
}
