// SPDX-FileCopyrightText: 2026 Statusbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the statusbot configuration system.

use statusbot_config::diagnostic::{ConfigError, Origin};
use statusbot_config::{
    load_and_validate, load_and_validate_path, load_and_validate_str, load_config_from_str,
};

/// Valid TOML with all known fields deserializes successfully.
#[test]
fn valid_toml_deserializes_into_config() {
    let toml = r#"
[bot]
name = "Lotus"
owner = "111"
prefix = "!"
timezone = "UTC"
auto_react = false
default_font = "Slant"
react_emoji = "🔥"
footer = "Lotus Mansion"
log_level = "debug"

[storage]
session_dir = "/tmp/sb/session"
media_dir = "/tmp/sb/media"
cache_path = "/tmp/sb/store.json"
cache_flush_secs = 5
cache_max_per_chat = 20

[transport]
bridge_url = "ws://bridge:9000"
request_timeout_secs = 10
initial_backoff_ms = 250
max_backoff_ms = 8000
dedup_capacity = 16
"#;

    let config = load_config_from_str(toml).expect("valid TOML should deserialize");
    assert_eq!(config.bot.name, "Lotus");
    assert_eq!(config.bot.owner, "111");
    assert_eq!(config.bot.prefix, "!");
    assert!(!config.bot.auto_react);
    assert_eq!(config.bot.default_font, "Slant");
    assert_eq!(config.bot.react_emoji, "🔥");
    assert_eq!(config.storage.cache_max_per_chat, 20);
    assert_eq!(
        config.storage.status_dir(),
        std::path::PathBuf::from("/tmp/sb/media/status")
    );
    assert_eq!(config.transport.bridge_url, "ws://bridge:9000");
    assert_eq!(config.transport.dedup_capacity, 16);
}

/// Empty TOML yields the defaults.
#[test]
fn empty_toml_uses_defaults() {
    let config = load_and_validate_str("").expect("defaults should validate");
    assert_eq!(config.bot.prefix, ".");
    assert_eq!(config.bot.name, "Status Bot");
}

/// A typo in [bot] is reported with a suggestion and a source span.
#[test]
fn unknown_key_is_reported_with_suggestion() {
    let toml = r#"
[bot]
prefx = "!"
"#;

    let errors = load_and_validate_str(toml).expect_err("should reject unknown field");
    let unknown = errors
        .iter()
        .find_map(|e| match e {
            ConfigError::UnknownKey {
                key,
                suggestion,
                span,
                ..
            } => Some((key.clone(), suggestion.clone(), *span)),
            _ => None,
        })
        .expect("an UnknownKey error");
    assert_eq!(unknown.0, "prefx");
    assert_eq!(unknown.1.as_deref(), Some("prefix"));
    assert!(unknown.2.is_some(), "span should point into the inline source");
}

/// Wrong types surface as InvalidType, not a panic.
#[test]
fn wrong_type_is_reported() {
    let toml = r#"
[storage]
cache_flush_secs = "often"
"#;

    let errors = load_and_validate_str(toml).expect_err("should reject wrong type");
    assert!(
        errors
            .iter()
            .any(|e| matches!(e, ConfigError::InvalidType { key, .. } if key.contains("cache_flush_secs")))
    );
}

/// Semantic validation runs after successful deserialization.
#[test]
fn semantic_errors_are_reported() {
    let toml = r#"
[bot]
default_font = "Wingdings"
timezone = "Nowhere/Special"
"#;

    let errors = load_and_validate_str(toml).expect_err("should fail validation");
    assert_eq!(errors.len(), 2);
}

/// Explicit file paths are honored.
#[test]
fn explicit_path_is_loaded() {
    let dir = std::env::temp_dir().join(format!("statusbot-config-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("custom.toml");
    std::fs::write(&path, "[bot]\nname = \"From File\"\n").unwrap();

    let config = load_and_validate_path(&path).expect("file config should validate");
    assert_eq!(config.bot.name, "From File");

    std::fs::remove_dir_all(&dir).ok();
}

/// A typo in a config file is pinned to that file, inside the right table.
#[test]
fn unknown_key_in_file_points_at_the_file() {
    figment::Jail::expect_with(|jail| {
        jail.create_file(
            "statusbot.toml",
            "[bot]\nname = \"Lotus\"\n\n[storage]\nsesion_dir = \"./s\"\n",
        )?;

        let errors = load_and_validate().expect_err("should reject unknown field");
        let Some(ConfigError::UnknownKey {
            key,
            section,
            suggestion,
            origin,
            span,
            ..
        }) = errors.first()
        else {
            panic!("expected an unknown key, got {errors:?}");
        };
        assert_eq!(key, "sesion_dir");
        assert_eq!(section.as_deref(), Some("storage"));
        assert_eq!(suggestion.as_deref(), Some("session_dir"));
        assert!(matches!(origin, Origin::File(path) if path.ends_with("statusbot.toml")));
        assert!(span.is_some());
        Ok(())
    });
}

/// A misspelled prefixed variable is reported as coming from the environment.
#[test]
fn unknown_env_key_is_traced_to_the_environment() {
    figment::Jail::expect_with(|jail| {
        jail.set_env("STATUSBOT_BOT_PREFX", "!");

        let errors = load_and_validate().expect_err("should reject unknown variable");
        let Some(ConfigError::UnknownKey {
            section,
            suggestion,
            origin,
            span,
            ..
        }) = errors.first()
        else {
            panic!("expected an unknown key, got {errors:?}");
        };
        assert_eq!(section.as_deref(), Some("bot"));
        assert_eq!(suggestion.as_deref(), Some("prefix"));
        assert_eq!(*origin, Origin::Environment);
        assert!(span.is_none());
        Ok(())
    });
}
