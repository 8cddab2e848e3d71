// SPDX-FileCopyrightText: 2026 Statusbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Command dispatch engine.
//!
//! A chat message is a command when its text starts with the configured
//! prefix. The token up to the first whitespace, lower-cased, names the
//! command; the rest, split on whitespace, are its arguments. Unknown
//! commands are ignored without a reply. Privileged commands from anyone
//! but the owner get a fixed reply and have no side effect.

mod general;
mod media;
mod preferences;

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use statusbot_core::types::{ChatMessage, DeliveryKind, Jid, QuotedMessage};
use statusbot_core::{StatusBotError, TextStyler, Transport};
use statusbot_store::{MediaVault, MessageCache};
use strum::{Display, EnumString};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::settings::{RuntimeConfig, RuntimeSettings};

/// Reply to a privileged command from a non-owner.
pub const NOT_AUTHORIZED: &str = "Only the bot owner can use this command.";

/// The fixed command set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum Command {
    Alive,
    Menu,
    #[strum(to_string = "save", serialize = "savestatus")]
    Save,
    StatusList,
    ClearStatus,
    Ping,
    Info,
    SetFont,
    Fonts,
    ToggleAuto,
}

impl Command {
    /// Commands that change runtime settings or touch the vault on the owner's behalf.
    pub fn is_privileged(self) -> bool {
        matches!(
            self,
            Command::Save | Command::ClearStatus | Command::SetFont | Command::ToggleAuto
        )
    }
}

/// A parsed command message.
#[derive(Debug, Clone, PartialEq)]
pub struct Invocation {
    /// Lower-cased command token.
    pub name: String,
    pub args: Vec<String>,
    pub sender: Jid,
    /// Chat the reply goes to.
    pub chat: Jid,
    /// Whether the sender is the configured owner.
    pub authorized: bool,
    pub quoted: Option<QuotedMessage>,
}

impl Invocation {
    /// Parses `message` against the prefix and owner in `settings`.
    ///
    /// Returns `None` for anything that is not a command candidate.
    pub fn parse(message: &ChatMessage, settings: &RuntimeSettings) -> Option<Self> {
        let text = message.text()?;
        if text.is_empty() || settings.prefix.is_empty() {
            return None;
        }
        let body = text.strip_prefix(settings.prefix.as_str())?;

        let (token, rest) = match body.find(char::is_whitespace) {
            Some(end) => body.split_at(end),
            None => (body, ""),
        };

        let sender = message.sender().clone();
        let authorized = sender.user() == settings.owner;

        Some(Self {
            name: token.to_lowercase(),
            args: rest.split_whitespace().map(str::to_string).collect(),
            sender,
            chat: message.chat().clone(),
            authorized,
            quoted: message.quoted.clone(),
        })
    }

    pub fn command(&self) -> Option<Command> {
        Command::from_str(&self.name).ok()
    }
}

/// Executes commands against the shared settings, vault, and cache.
pub struct CommandEngine {
    settings: Arc<RuntimeConfig>,
    vault: Arc<MediaVault>,
    cache: Arc<MessageCache>,
    styler: Arc<dyn TextStyler>,
    handler_timeout: Duration,
}

impl CommandEngine {
    pub fn new(
        settings: Arc<RuntimeConfig>,
        vault: Arc<MediaVault>,
        cache: Arc<MessageCache>,
        styler: Arc<dyn TextStyler>,
        handler_timeout: Duration,
    ) -> Self {
        Self {
            settings,
            vault,
            cache,
            styler,
            handler_timeout,
        }
    }

    pub fn settings(&self) -> &Arc<RuntimeConfig> {
        &self.settings
    }

    /// Parses `message` and runs the command on its own task.
    ///
    /// Returns `None` when the message is not a command or arrived as part
    /// of a history append. Handler failures are logged and answered with
    /// a short reply; they never reach the caller.
    pub fn dispatch(
        self: &Arc<Self>,
        transport: Arc<dyn Transport>,
        message: &ChatMessage,
    ) -> Option<JoinHandle<()>> {
        if message.delivery != DeliveryKind::Notify {
            return None;
        }
        let invocation = Invocation::parse(message, &self.settings.snapshot())?;

        let engine = Arc::clone(self);
        Some(tokio::spawn(async move {
            let outcome =
                tokio::time::timeout(engine.handler_timeout, engine.execute(&*transport, &invocation))
                    .await
                    .unwrap_or(Err(StatusBotError::Timeout {
                        duration: engine.handler_timeout,
                    }));

            if let Err(e) = outcome {
                warn!(command = %invocation.name, sender = invocation.sender.user(), error = %e, "command failed");
                if let Err(reply_err) = transport
                    .send_text(&invocation.chat, &format!("Command failed: {e}"))
                    .await
                {
                    debug!(error = %reply_err, "failed to report command failure");
                }
            }
        }))
    }

    /// Runs one parsed invocation to completion.
    pub async fn execute(
        &self,
        transport: &dyn Transport,
        invocation: &Invocation,
    ) -> Result<(), StatusBotError> {
        let Some(command) = invocation.command() else {
            debug!(command = %invocation.name, "ignoring unknown command");
            return Ok(());
        };

        info!(command = %command, sender = invocation.sender.user(), "command received");

        if command.is_privileged() && !invocation.authorized {
            info!(command = %command, sender = invocation.sender.user(), "rejected unauthorized command");
            transport.send_text(&invocation.chat, NOT_AUTHORIZED).await?;
            return Ok(());
        }

        let settings = self.settings.snapshot();
        let ctx = Context {
            engine: self,
            transport,
            invocation,
            settings: &settings,
        };

        match command {
            Command::Alive => general::alive(&ctx).await,
            Command::Menu => general::menu(&ctx).await,
            Command::Ping => general::ping(&ctx).await,
            Command::Info => general::info(&ctx).await,
            Command::Fonts => general::fonts(&ctx).await,
            Command::Save => media::save(&ctx).await,
            Command::StatusList => media::status_list(&ctx).await,
            Command::ClearStatus => media::clear_status(&ctx).await,
            Command::SetFont => preferences::set_font(&ctx).await,
            Command::ToggleAuto => preferences::toggle_auto(&ctx).await,
        }
    }
}

/// Everything a handler needs for one invocation.
struct Context<'a> {
    engine: &'a CommandEngine,
    transport: &'a dyn Transport,
    invocation: &'a Invocation,
    /// Snapshot taken when the handler started.
    settings: &'a RuntimeSettings,
}

impl Context<'_> {
    async fn reply(&self, text: &str) -> Result<(), StatusBotError> {
        self.transport.send_text(&self.invocation.chat, text).await?;
        Ok(())
    }

    fn style(&self, text: &str, style: &str) -> String {
        self.engine.styler.style(text, style)
    }

    /// Styles `text` in the current default font.
    fn header(&self, text: &str) -> String {
        self.style(text, &self.settings.font)
    }

    fn footer(&self) -> String {
        self.settings.footer_line()
    }
}
