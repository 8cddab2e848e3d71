// SPDX-FileCopyrightText: 2026 Statusbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Process-lifetime runtime configuration.
//!
//! Readers take an immutable [`RuntimeSettings`] snapshot; writers replace
//! the whole snapshot with a read-copy-update, so a reply never mixes
//! fields from before and after a concurrent change. Nothing here is
//! persisted across restarts.

use std::sync::Arc;

use arc_swap::ArcSwap;
use chrono_tz::Tz;
use statusbot_config::StatusBotConfig;
use statusbot_core::StatusBotError;
use tracing::info;

/// One consistent view of the mutable settings.
#[derive(Debug, Clone, PartialEq)]
pub struct RuntimeSettings {
    pub bot_name: String,
    /// User part of the owner's address.
    pub owner: String,
    pub prefix: String,
    pub timezone: Tz,
    pub auto_react: bool,
    pub font: String,
    pub react_emoji: String,
    pub footer: String,
}

impl RuntimeSettings {
    pub fn from_config(config: &StatusBotConfig) -> Result<Self, StatusBotError> {
        let timezone: Tz = config.bot.timezone.parse().map_err(|_| {
            StatusBotError::Config(format!("unknown timezone '{}'", config.bot.timezone))
        })?;

        Ok(Self {
            bot_name: config.bot.name.clone(),
            owner: config.bot.owner.clone(),
            prefix: config.bot.prefix.clone(),
            timezone,
            auto_react: config.bot.auto_react,
            font: config.bot.default_font.clone(),
            react_emoji: config.bot.react_emoji.clone(),
            footer: config.bot.footer.clone(),
        })
    }

    /// The footer line appended to most replies.
    pub fn footer_line(&self) -> String {
        format!("_Powered by {}_", self.footer)
    }
}

/// Shared handle to the runtime settings.
#[derive(Debug)]
pub struct RuntimeConfig {
    current: ArcSwap<RuntimeSettings>,
}

impl RuntimeConfig {
    pub fn new(settings: RuntimeSettings) -> Self {
        Self {
            current: ArcSwap::from_pointee(settings),
        }
    }

    pub fn from_config(config: &StatusBotConfig) -> Result<Self, StatusBotError> {
        Ok(Self::new(RuntimeSettings::from_config(config)?))
    }

    pub fn snapshot(&self) -> Arc<RuntimeSettings> {
        self.current.load_full()
    }

    /// Sets the text style used for styled replies.
    pub fn set_font(&self, font: &str) {
        self.current.rcu(|current| {
            let mut next = RuntimeSettings::clone(current);
            next.font = font.to_string();
            next
        });
        info!(font, "default font changed");
    }

    /// Flips auto-react and returns the new value.
    pub fn toggle_auto_react(&self) -> bool {
        let previous = self.current.rcu(|current| {
            let mut next = RuntimeSettings::clone(current);
            next.auto_react = !current.auto_react;
            next
        });
        let enabled = !previous.auto_react;
        info!(enabled, "auto-react toggled");
        enabled
    }
}
