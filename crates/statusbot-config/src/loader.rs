// SPDX-FileCopyrightText: 2026 Statusbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./statusbot.toml` > `~/.config/statusbot/statusbot.toml`
//! > `/etc/statusbot/statusbot.toml`, with `STATUSBOT_` environment overrides and
//! the flat variables older deployments set (`OWNER_NUMBER`, `PREFIX`, ...).

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::StatusBotConfig;

/// Prefix of the section-scoped environment variables.
pub(crate) const ENV_PREFIX: &str = "STATUSBOT_";

/// Flat environment variables and the keys they set.
pub(crate) const LEGACY_ENV_KEYS: &[(&str, &str)] = &[
    ("OWNER_NUMBER", "bot.owner"),
    ("BOT_NAME", "bot.name"),
    ("PREFIX", "bot.prefix"),
    ("TIMEZONE", "bot.timezone"),
    ("AUTO_REACT", "bot.auto_react"),
    ("DEFAULT_FONT", "bot.default_font"),
];

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/statusbot/statusbot.toml` (system-wide)
/// 3. `~/.config/statusbot/statusbot.toml` (user XDG config)
/// 4. `./statusbot.toml` (local directory)
/// 5. Legacy flat variables (`OWNER_NUMBER`, `BOT_NAME`, ...)
/// 6. `STATUSBOT_*` environment variables
pub fn load_config() -> Result<StatusBotConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env).
///
/// Used for testing and explicit configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<StatusBotConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(StatusBotConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<StatusBotConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(StatusBotConfig::default()))
        .merge(Toml::file(path))
        .merge(legacy_env_provider())
        .merge(env_provider())
        .extract()
}

/// Config files consulted by [`load_config`], lowest precedence first.
pub fn search_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from("/etc/statusbot/statusbot.toml")];
    if let Some(dir) = dirs::config_dir() {
        paths.push(dir.join("statusbot/statusbot.toml"));
    }
    paths.push(PathBuf::from("statusbot.toml"));
    paths
}

/// Build the Figment used internally for config loading (exposed for diagnostic use).
pub fn build_figment() -> Figment {
    search_paths()
        .into_iter()
        .fold(
            Figment::new().merge(Serialized::defaults(StatusBotConfig::default())),
            |figment, path| figment.merge(Toml::file(path)),
        )
        .merge(legacy_env_provider())
        .merge(env_provider())
}

/// Config sections addressable from `STATUSBOT_<SECTION>_<FIELD>`.
const SECTIONS: &[&str] = &["bot", "storage", "transport"];

/// `STATUSBOT_*` variables, mapped section-first.
///
/// Uses `Env::map()` rather than `Env::split("_")` so that
/// `STATUSBOT_BOT_AUTO_REACT` becomes `bot.auto_react`, not `bot.auto.react`.
fn env_provider() -> Env {
    Env::prefixed(ENV_PREFIX).map(|key| section_key(key.as_str()).into())
}

/// `BOT_AUTO_REACT` -> `bot.auto_react`. Keys outside a known section are
/// only lower-cased, so they surface as unknown fields.
fn section_key(key: &str) -> String {
    let key = key.to_ascii_lowercase();
    for section in SECTIONS {
        if let Some(field) = key
            .strip_prefix(section)
            .and_then(|rest| rest.strip_prefix('_'))
        {
            return format!("{section}.{field}");
        }
    }
    key
}

/// The flat, unprefixed variables from the original deployment.
fn legacy_env_provider() -> Env {
    Env::raw().filter_map(|key| {
        LEGACY_ENV_KEYS
            .iter()
            .find(|(var, _)| key.as_str().eq_ignore_ascii_case(var))
            .map(|(_, path)| (*path).into())
    })
}
