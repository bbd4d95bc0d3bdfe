//! Configuration tests

use super::*;
use std::collections::HashMap;

fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| map.get(key).cloned()
}

// ─────────────────────────────────────────────────────────────────────────────
// Round-trip tests
// ─────────────────────────────────────────────────────────────────────────────

/// The generated template must parse back into the same values.
#[test]
fn test_config_roundtrip_default() {
    let config = Config::default();
    let toml_str = config.to_toml();

    let parsed: FileConfig = toml::from_str(&toml_str)
        .unwrap_or_else(|e| panic!("Default config should round-trip.\nTOML:\n{toml_str}\nError: {e}"));

    let resolved = Config::resolve(parsed, |_| None);
    assert_eq!(resolved.endpoint, config.endpoint);
    assert_eq!(resolved.theme, config.theme);
    assert_eq!(resolved.logging.level, config.logging.level);
    assert_eq!(resolved.logging.file_rotation, config.logging.file_rotation);
    assert_eq!(resolved.logging.file_prefix, config.logging.file_prefix);
}

#[test]
fn test_roundtrip_escapes_quotes() {
    let config = Config {
        endpoint: r#"http://example.com/users?q="x""#.to_string(),
        ..Config::default()
    };

    let parsed: FileConfig = toml::from_str(&config.to_toml()).unwrap();
    assert_eq!(parsed.endpoint.as_deref(), Some(config.endpoint.as_str()));
}

#[test]
fn test_roundtrip_escapes_control_chars() {
    let config = Config {
        endpoint: "http://example.com/\tusers\r\n".to_string(),
        theme: "da\u{1}rk\\".to_string(),
        ..Config::default()
    };

    let parsed: FileConfig = toml::from_str(&config.to_toml()).unwrap();
    assert_eq!(parsed.endpoint.as_deref(), Some(config.endpoint.as_str()));
    assert_eq!(parsed.theme.as_deref(), Some(config.theme.as_str()));
}

// ─────────────────────────────────────────────────────────────────────────────
// Precedence
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_defaults_without_file_or_env() {
    let config = Config::resolve(FileConfig::default(), |_| None);
    assert_eq!(config.endpoint, "https://jsonplaceholder.typicode.com/users");
    assert!(config.enable_tui);
    assert_eq!(config.theme, "dark");
    assert!(!config.logging.file_enabled);
}

#[test]
fn test_file_overrides_defaults() {
    let file: FileConfig = toml::from_str(
        r#"
endpoint = "http://localhost:3000/users"
theme = "light"

[logging]
level = "debug"
file_rotation = "hourly"
"#,
    )
    .unwrap();

    let config = Config::resolve(file, |_| None);
    assert_eq!(config.endpoint, "http://localhost:3000/users");
    assert_eq!(config.theme, "light");
    assert_eq!(config.logging.level, "debug");
    assert_eq!(config.logging.file_rotation, LogRotation::Hourly);
    // Untouched keys keep their defaults
    assert_eq!(config.logging.file_prefix, "roster");
}

#[test]
fn test_env_overrides_file() {
    let file = FileConfig {
        endpoint: Some("http://from-file/users".to_string()),
        theme: Some("light".to_string()),
        logging: None,
    };

    let config = Config::resolve(
        file,
        env_from(&[
            ("ROSTER_ENDPOINT", "http://from-env/users"),
            ("ROSTER_THEME", "dark"),
        ]),
    );
    assert_eq!(config.endpoint, "http://from-env/users");
    assert_eq!(config.theme, "dark");
}

#[test]
fn test_no_tui_flag() {
    for value in ["1", "true", "TRUE"] {
        let config = Config::resolve(FileConfig::default(), env_from(&[("ROSTER_NO_TUI", value)]));
        assert!(!config.enable_tui, "ROSTER_NO_TUI={value} should disable the TUI");
    }

    let config = Config::resolve(FileConfig::default(), env_from(&[("ROSTER_NO_TUI", "0")]));
    assert!(config.enable_tui);
}

#[test]
fn test_unknown_rotation_falls_back_to_daily() {
    assert_eq!(LogRotation::parse("weekly"), LogRotation::Daily);
    assert_eq!(LogRotation::parse("Never"), LogRotation::Never);
}

// ─────────────────────────────────────────────────────────────────────────────
// File loading
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_missing_file_is_default() {
    let dir = tempfile::tempdir().unwrap();
    let file = Config::load_file_config_at(&dir.path().join("nope.toml")).unwrap();
    assert!(file.endpoint.is_none());
    assert!(file.logging.is_none());
}

#[test]
fn test_write_template_then_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("config.toml");

    Config::write_template(&path).unwrap();
    let file = Config::load_file_config_at(&path).unwrap();
    assert_eq!(
        file.endpoint.as_deref(),
        Some("https://jsonplaceholder.typicode.com/users")
    );
}

#[test]
fn test_invalid_file_is_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "endpoint = [not valid").unwrap();

    let err = Config::load_file_config_at(&path).unwrap_err();
    assert!(format!("{err:#}").contains("Failed to parse"));
}
