// SPDX-FileCopyrightText: 2026 Statusbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Turns figment extraction failures into miette reports.
//!
//! Every report names where the bad value came from (a TOML file or an
//! environment variable) and, for unknown keys, the closest valid key in
//! the same section, spelled the way that source expects it.

#![allow(unused_assignments)] // miette's Diagnostic derive generates code triggering this lint

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

use crate::loader::{ENV_PREFIX, LEGACY_ENV_KEYS};
use crate::model::StatusBotConfig;

/// Minimum Jaro-Winkler similarity score to suggest a correction.
const SUGGESTION_THRESHOLD: f64 = 0.75;

/// A configuration error with rich diagnostic information.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("unknown configuration key `{}`", dotted(section.as_deref(), key))]
    #[diagnostic(
        code(statusbot::config::unknown_key),
        help("{}", unknown_key_help(section.as_deref(), suggestion.as_deref(), origin))
    )]
    UnknownKey {
        key: String,
        /// `None` for a top-level key.
        section: Option<String>,
        suggestion: Option<String>,
        origin: Origin,
        #[label("not a statusbot setting")]
        span: Option<SourceSpan>,
        #[source_code]
        src: Option<NamedSource<String>>,
    },

    #[error("invalid value for `{key}`: found {found}, expected {expected}")]
    #[diagnostic(
        code(statusbot::config::invalid_type),
        help("{}", invalid_value_help(key, origin))
    )]
    InvalidType {
        key: String,
        found: String,
        expected: String,
        origin: Origin,
    },

    /// A value deserialized but breaks a semantic rule.
    #[error("validation error: {message}")]
    #[diagnostic(code(statusbot::config::validation))]
    Validation { message: String },

    #[error("configuration error: {0}")]
    #[diagnostic(code(statusbot::config::other))]
    Other(String),
}

/// Where a rejected value was read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Origin {
    File(String),
    Environment,
    Unknown,
}

impl Origin {
    fn of(error: &figment::Error) -> Self {
        let Some(metadata) = error.metadata.as_ref() else {
            return Origin::Unknown;
        };
        match &metadata.source {
            Some(figment::Source::File(path)) => Origin::File(path.display().to_string()),
            _ if metadata.name.contains("environment") => Origin::Environment,
            _ => Origin::Unknown,
        }
    }
}

fn dotted(section: Option<&str>, key: &str) -> String {
    match section {
        Some(section) => format!("{section}.{key}"),
        None => key.to_string(),
    }
}

/// `bot.auto_react` -> `STATUSBOT_BOT_AUTO_REACT`.
fn env_name(dotted_key: &str) -> String {
    format!("{ENV_PREFIX}{}", dotted_key.replace('.', "_").to_ascii_uppercase())
}

fn unknown_key_help(section: Option<&str>, suggestion: Option<&str>, origin: &Origin) -> String {
    let valid = known_keys(section).join(", ");
    let Some(suggestion) = suggestion else {
        return match section {
            Some(section) => format!("valid keys in [{section}]: {valid}"),
            None => format!("valid sections: {valid}"),
        };
    };
    match origin {
        Origin::Environment => format!(
            "did you mean `{}`? Unprefixed variables are limited to {}",
            env_name(&dotted(section, suggestion)),
            legacy_names()
        ),
        _ => format!("did you mean `{suggestion}`? Valid keys: {valid}"),
    }
}

fn invalid_value_help(key: &str, origin: &Origin) -> String {
    match origin {
        Origin::Environment => format!("check the value of `{}`", env_name(key)),
        Origin::File(path) => format!("fix `{key}` in {path}"),
        Origin::Unknown => format!("fix the value of `{key}`"),
    }
}

fn legacy_names() -> String {
    LEGACY_ENV_KEYS
        .iter()
        .map(|(var, _)| *var)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Keys accepted in `section`, or the section names when `section` is `None`.
///
/// Read off the serialized defaults, so the list follows the model.
pub fn known_keys(section: Option<&str>) -> Vec<String> {
    let Ok(toml::Value::Table(root)) = toml::Value::try_from(StatusBotConfig::default()) else {
        return Vec::new();
    };
    match section {
        None => root.keys().cloned().collect(),
        Some(section) => match root.get(section) {
            Some(toml::Value::Table(fields)) => fields.keys().cloned().collect(),
            _ => Vec::new(),
        },
    }
}

/// Convert a `figment::Error` (which may hold several errors) into diagnostics.
///
/// `sources` pairs a display path with file contents and is used to put a
/// span under unknown keys.
pub fn figment_to_config_errors(
    err: figment::Error,
    sources: &[(String, String)],
) -> Vec<ConfigError> {
    use figment::error::Kind;

    err.into_iter()
        .map(|error| {
            let origin = Origin::of(&error);
            match &error.kind {
                Kind::UnknownField(field, _) => {
                    let section = error.path.first().cloned();
                    let known = known_keys(section.as_deref());
                    let suggestion = suggest_key(field, &known);
                    let (span, src) = locate(&origin, section.as_deref(), field, sources);
                    ConfigError::UnknownKey {
                        key: field.clone(),
                        section,
                        suggestion,
                        origin,
                        span,
                        src,
                    }
                }
                Kind::InvalidType(found, expected) => ConfigError::InvalidType {
                    key: error.path.join("."),
                    found: found.to_string(),
                    expected: expected.to_string(),
                    origin,
                },
                _ => ConfigError::Other(error.to_string()),
            }
        })
        .collect()
}

fn locate(
    origin: &Origin,
    section: Option<&str>,
    field: &str,
    sources: &[(String, String)],
) -> (Option<SourceSpan>, Option<NamedSource<String>>) {
    let source = match origin {
        Origin::File(path) => sources.iter().find(|(p, _)| p == path),
        Origin::Environment => None,
        // Inline TOML carries no path; it is only ever passed alone.
        Origin::Unknown if sources.len() == 1 => sources.first(),
        Origin::Unknown => None,
    };
    let Some((path, content)) = source else {
        return (None, None);
    };
    match key_offset(content, section, field) {
        Some(offset) => (
            Some(SourceSpan::new(offset.into(), field.len())),
            Some(NamedSource::new(path, content.clone())),
        ),
        None => (None, None),
    }
}

/// Byte offset of `field` inside the `[section]` table (top level for `None`).
pub fn key_offset(content: &str, section: Option<&str>, field: &str) -> Option<usize> {
    let mut current: Option<&str> = None;
    let mut offset = 0;
    for line in content.split_inclusive('\n') {
        let trimmed = line.trim_start();
        let indent = line.len() - trimmed.len();
        if let Some(header) = trimmed.strip_prefix('[') {
            current = header.split(']').next().map(str::trim);
        } else if current == section
            && let Some(rest) = trimmed.strip_prefix(field)
            && rest.trim_start().starts_with('=')
        {
            return Some(offset + indent);
        }
        offset += line.len();
    }
    None
}

/// Closest entry of `known` to `unknown`, if similar enough.
pub fn suggest_key(unknown: &str, known: &[String]) -> Option<String> {
    known
        .iter()
        .map(|key| (strsim::jaro_winkler(unknown, key), key))
        .filter(|(score, _)| *score > SUGGESTION_THRESHOLD)
        .max_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, key)| key.clone())
}

/// Print every error to stderr as a miette report.
pub fn render_errors(errors: &[ConfigError]) {
    let handler = miette::GraphicalReportHandler::new();
    eprintln!(
        "statusbot: {} configuration problem{}",
        errors.len(),
        if errors.len() == 1 { "" } else { "s" }
    );
    for error in errors {
        let mut report = String::new();
        match handler.render_report(&mut report, error as &dyn Diagnostic) {
            Ok(()) => eprint!("{report}"),
            Err(_) => eprintln!("  {error}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_keys_follow_the_model() {
        assert_eq!(known_keys(None), vec!["bot", "storage", "transport"]);
        let bot = known_keys(Some("bot"));
        assert!(bot.contains(&"prefix".to_string()));
        assert!(bot.contains(&"footer".to_string()));
        assert!(known_keys(Some("transport")).contains(&"dedup_capacity".to_string()));
        assert!(known_keys(Some("nope")).is_empty());
    }

    #[test]
    fn suggestions_come_from_the_section() {
        let bot = known_keys(Some("bot"));
        assert_eq!(suggest_key("prefx", &bot).as_deref(), Some("prefix"));
        assert_eq!(suggest_key("auto_reakt", &bot).as_deref(), Some("auto_react"));
        assert_eq!(suggest_key("zzzzzz", &bot), None);
    }

    #[test]
    fn env_help_uses_variable_spelling() {
        let help = unknown_key_help(Some("bot"), Some("prefix"), &Origin::Environment);
        assert!(help.starts_with("did you mean `STATUSBOT_BOT_PREFIX`?"), "{help}");
        assert!(help.contains("OWNER_NUMBER"));

        let help = invalid_value_help("storage.cache_flush_secs", &Origin::Environment);
        assert_eq!(help, "check the value of `STATUSBOT_STORAGE_CACHE_FLUSH_SECS`");
    }

    #[test]
    fn file_help_lists_section_keys() {
        let help = unknown_key_help(Some("storage"), None, &Origin::File("a.toml".into()));
        assert!(help.starts_with("valid keys in [storage]: "), "{help}");
        assert!(help.contains("session_dir"));
    }

    #[test]
    fn key_offset_respects_sections() {
        let content = "[bot]\nname = \"a\"\n\n[storage]\nname = \"b\"\n";
        let o = key_offset(content, Some("storage"), "name").expect("key should be found");
        assert_eq!(&content[o..o + 10], "name = \"b\"");
        assert_eq!(key_offset(content, Some("transport"), "name"), None);
    }

    #[test]
    fn key_offset_handles_crlf_and_indent() {
        let content = "[bot]\r\nname = \"a\"\r\n  prefx=\"!\"\r\n";
        let o = key_offset(content, Some("bot"), "prefx").expect("key should be found");
        assert_eq!(&content[o..o + 5], "prefx");
        // `prefix_x` must not match `prefix`.
        assert_eq!(key_offset("[bot]\nprefix_x = 1\n", Some("bot"), "prefix"), None);
    }
}
