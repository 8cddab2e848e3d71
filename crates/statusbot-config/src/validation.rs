// SPDX-FileCopyrightText: 2026 Statusbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.

use statusbot_core::types::STYLE_NAMES;

use crate::diagnostic::ConfigError;
use crate::model::StatusBotConfig;

/// Validate a deserialized configuration for semantic correctness.
///
/// Collects every failure instead of stopping at the first one.
pub fn validate_config(config: &StatusBotConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();
    let mut fail = |message: String| errors.push(ConfigError::Validation { message });

    if config.bot.prefix.is_empty() {
        fail("bot.prefix must not be empty".to_string());
    } else if config.bot.prefix.chars().any(char::is_whitespace) {
        fail(format!(
            "bot.prefix `{}` must not contain whitespace",
            config.bot.prefix
        ));
    }

    if config.bot.owner.trim().is_empty() {
        fail("bot.owner must not be empty".to_string());
    }

    if config.bot.timezone.parse::<chrono_tz::Tz>().is_err() {
        fail(format!(
            "bot.timezone `{}` is not a known IANA timezone",
            config.bot.timezone
        ));
    }

    if !STYLE_NAMES.contains(&config.bot.default_font.as_str()) {
        fail(format!(
            "bot.default_font `{}` is not one of: {}",
            config.bot.default_font,
            STYLE_NAMES.join(", ")
        ));
    }

    if config.bot.react_emoji.trim().is_empty() {
        fail("bot.react_emoji must not be empty".to_string());
    }

    if config.storage.cache_flush_secs == 0 {
        fail("storage.cache_flush_secs must be at least 1".to_string());
    }

    if config.storage.cache_max_per_chat == 0 {
        fail("storage.cache_max_per_chat must be at least 1".to_string());
    }

    if config.transport.bridge_url.trim().is_empty() {
        fail("transport.bridge_url must not be empty".to_string());
    }

    if config.transport.request_timeout_secs == 0 {
        fail("transport.request_timeout_secs must be at least 1".to_string());
    }

    if config.transport.initial_backoff_ms == 0 {
        fail("transport.initial_backoff_ms must be at least 1".to_string());
    }

    if config.transport.initial_backoff_ms > config.transport.max_backoff_ms {
        fail(format!(
            "transport.initial_backoff_ms ({}) must not exceed transport.max_backoff_ms ({})",
            config.transport.initial_backoff_ms, config.transport.max_backoff_ms
        ));
    }

    if config.transport.dedup_capacity == 0 {
        fail("transport.dedup_capacity must be at least 1".to_string());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
