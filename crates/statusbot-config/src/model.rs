// SPDX-FileCopyrightText: 2026 Statusbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for statusbot.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Top-level statusbot configuration.
///
/// All sections are optional and default to the values the bot shipped with.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StatusBotConfig {
    /// Bot identity, owner, and command behavior.
    #[serde(default)]
    pub bot: BotConfig,

    /// On-disk layout for credentials, the message cache, and saved media.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Bridge connection and reconnect settings.
    #[serde(default)]
    pub transport: TransportConfig,
}

/// Bot identity and behavior configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BotConfig {
    /// Display name used in banners and the menu.
    #[serde(default = "default_bot_name", deserialize_with = "lenient::string")]
    pub name: String,

    /// Phone number (user part of the address) allowed to run owner commands.
    #[serde(default = "default_owner", deserialize_with = "lenient::string")]
    pub owner: String,

    /// Prefix that marks a chat message as a command.
    #[serde(default = "default_prefix", deserialize_with = "lenient::string")]
    pub prefix: String,

    /// IANA timezone used to format timestamps in replies.
    #[serde(default = "default_timezone")]
    pub timezone: String,

    /// React to every viewed status.
    #[serde(default = "default_auto_react", deserialize_with = "lenient::bool_unless_false")]
    pub auto_react: bool,

    /// Style applied to styled replies until changed with `setfont`.
    #[serde(default = "default_font")]
    pub default_font: String,

    /// Emoji used for status reactions.
    #[serde(default = "default_react_emoji")]
    pub react_emoji: String,

    /// Name shown in the `Powered by` footer of replies.
    #[serde(default = "default_footer")]
    pub footer: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            name: default_bot_name(),
            owner: default_owner(),
            prefix: default_prefix(),
            timezone: default_timezone(),
            auto_react: default_auto_react(),
            default_font: default_font(),
            react_emoji: default_react_emoji(),
            footer: default_footer(),
            log_level: default_log_level(),
        }
    }
}

fn default_bot_name() -> String {
    "Status Bot".to_string()
}

fn default_owner() -> String {
    "1234567890".to_string()
}

fn default_prefix() -> String {
    ".".to_string()
}

fn default_timezone() -> String {
    "Asia/Kolkata".to_string()
}

fn default_auto_react() -> bool {
    true
}

fn default_font() -> String {
    statusbot_core::types::DEFAULT_STYLE.to_string()
}

fn default_react_emoji() -> String {
    "❤️".to_string()
}

fn default_footer() -> String {
    "Lotus Mansion".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Filesystem layout.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Directory holding session credentials.
    #[serde(default = "default_session_dir")]
    pub session_dir: PathBuf,

    /// Media root; saved statuses live in `<media_dir>/status`.
    #[serde(default = "default_media_dir")]
    pub media_dir: PathBuf,

    /// Message cache snapshot file.
    #[serde(default = "default_cache_path")]
    pub cache_path: PathBuf,

    /// Seconds between full cache snapshots.
    #[serde(default = "default_cache_flush_secs")]
    pub cache_flush_secs: u64,

    /// Messages kept per chat in the cache.
    #[serde(default = "default_cache_max_per_chat")]
    pub cache_max_per_chat: usize,
}

impl StorageConfig {
    /// Directory of the media vault.
    pub fn status_dir(&self) -> PathBuf {
        self.media_dir.join("status")
    }

    pub fn cache_flush_interval(&self) -> Duration {
        Duration::from_secs(self.cache_flush_secs)
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            session_dir: default_session_dir(),
            media_dir: default_media_dir(),
            cache_path: default_cache_path(),
            cache_flush_secs: default_cache_flush_secs(),
            cache_max_per_chat: default_cache_max_per_chat(),
        }
    }
}

fn default_session_dir() -> PathBuf {
    PathBuf::from("./session")
}

fn default_media_dir() -> PathBuf {
    PathBuf::from("./media")
}

fn default_cache_path() -> PathBuf {
    PathBuf::from("./message_store.json")
}

fn default_cache_flush_secs() -> u64 {
    10
}

fn default_cache_max_per_chat() -> usize {
    100
}

/// Bridge connection and supervisor settings.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TransportConfig {
    /// WebSocket URL of the messaging-network bridge.
    #[serde(default = "default_bridge_url")]
    pub bridge_url: String,

    /// Upper bound for any single request to the bridge.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// First reconnect delay after a retriable disconnect.
    #[serde(default = "default_initial_backoff_ms")]
    pub initial_backoff_ms: u64,

    /// Ceiling for the doubling reconnect delay.
    #[serde(default = "default_max_backoff_ms")]
    pub max_backoff_ms: u64,

    /// Status message ids remembered for de-duplication.
    #[serde(default = "default_dedup_capacity")]
    pub dedup_capacity: usize,
}

impl TransportConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn initial_backoff(&self) -> Duration {
        Duration::from_millis(self.initial_backoff_ms)
    }

    pub fn max_backoff(&self) -> Duration {
        Duration::from_millis(self.max_backoff_ms)
    }
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            bridge_url: default_bridge_url(),
            request_timeout_secs: default_request_timeout_secs(),
            initial_backoff_ms: default_initial_backoff_ms(),
            max_backoff_ms: default_max_backoff_ms(),
            dedup_capacity: default_dedup_capacity(),
        }
    }
}

fn default_bridge_url() -> String {
    "ws://127.0.0.1:8765".to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_initial_backoff_ms() -> u64 {
    1_000
}

fn default_max_backoff_ms() -> u64 {
    30_000
}

fn default_dedup_capacity() -> usize {
    4096
}

/// Deserializers that accept the loosely typed values environment variables produce.
mod lenient {
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Scalar {
        Bool(bool),
        Unsigned(u64),
        Signed(i64),
        Float(f64),
        Text(String),
    }

    /// Accepts strings and bare numbers (`OWNER_NUMBER=1234` parses as an integer).
    pub fn string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
        Ok(match Scalar::deserialize(deserializer)? {
            Scalar::Text(s) => s,
            Scalar::Unsigned(n) => n.to_string(),
            Scalar::Signed(n) => n.to_string(),
            Scalar::Float(n) => n.to_string(),
            Scalar::Bool(b) => b.to_string(),
        })
    }

    /// Only an explicit `false` disables the flag.
    pub fn bool_unless_false<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<bool, D::Error> {
        Ok(match Scalar::deserialize(deserializer)? {
            Scalar::Bool(b) => b,
            Scalar::Text(s) => s != "false",
            _ => true,
        })
    }
}
