// SPDX-FileCopyrightText: 2026 Statusbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for statusbot.

use thiserror::Error;

/// The primary error type used across the adapter traits and core operations.
///
/// Authorization and argument validation are not represented here: the
/// command engine answers those with a reply instead of failing.
#[derive(Debug, Error)]
pub enum StatusBotError {
    /// Configuration errors (invalid TOML, bad values, unknown timezone).
    #[error("configuration error: {0}")]
    Config(String),

    /// Transport errors (connect, send, or socket failure).
    #[error("transport error: {message}")]
    Transport {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A media download through the transport failed.
    #[error("download failed: {message}")]
    Download {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Filesystem errors for media, cache snapshots, and other non-credential state.
    #[error("persistence error: {message}")]
    Persistence {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Session credentials could not be written to disk.
    #[error("failed to persist session credentials: {source}")]
    CredentialPersistence {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The session was logged out remotely and must be paired again.
    #[error("session logged out; re-pairing required")]
    LoggedOut,

    /// Operation timed out.
    #[error("operation timed out after {duration:?}")]
    Timeout { duration: std::time::Duration },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl StatusBotError {
    /// Shorthand for a transport error without an underlying source.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
            source: None,
        }
    }

    /// Shorthand for a persistence error wrapping an I/O failure.
    pub fn persistence(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Persistence {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Whether this error must terminate the process.
    ///
    /// Only a logged-out session and a failed credential write qualify;
    /// everything else is handled at the handler boundary.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::LoggedOut | Self::CredentialPersistence { .. })
    }
}
