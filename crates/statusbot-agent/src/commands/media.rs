// SPDX-FileCopyrightText: 2026 Statusbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Vault commands: save, statuslist, clearstatus.

use statusbot_core::StatusBotError;
use statusbot_core::types::{MediaKind, MessagePayload, OutboundMedia, QuotedMessage};
use tracing::{info, warn};

use super::Context;

const NOT_A_STATUS: &str = "This is not a status message.";
const NO_SAVED_STATUSES: &str = "No saved statuses found.";
const SAVED_CAPTION: &str = "Here is the saved status.";

pub(super) async fn save(ctx: &Context<'_>) -> Result<(), StatusBotError> {
    let Some(quoted) = &ctx.invocation.quoted else {
        return ctx.reply(&save_guide(ctx)).await;
    };
    if !quoted.is_status() {
        return ctx.reply(NOT_A_STATUS).await;
    }

    let (name, kind, data) = match download_and_store(ctx, quoted).await {
        Ok(saved) => saved,
        Err(e) => {
            warn!(quoted_id = %quoted.id, error = %e, "failed to save status");
            return ctx.reply(&format!("Failed to save status: {e}")).await;
        }
    };

    ctx.reply(&format!(
        "✅ Status saved successfully as *{name}*\n\n{}",
        ctx.footer()
    ))
    .await?;

    let caption = (kind != MediaKind::Audio).then(|| SAVED_CAPTION.to_string());
    if let Err(e) = ctx
        .transport
        .send_media(&ctx.invocation.chat, OutboundMedia { kind, data, caption })
        .await
    {
        warn!(file = %name, error = %e, "failed to send saved status back");
    }
    Ok(())
}

/// Downloads the quoted status and commits it to the vault.
///
/// Nothing is written unless the download succeeds in full.
async fn download_and_store(
    ctx: &Context<'_>,
    quoted: &QuotedMessage,
) -> Result<(String, MediaKind, Vec<u8>), StatusBotError> {
    let payload = match &quoted.payload {
        Some(payload) => Some(payload.clone()),
        None => ctx
            .engine
            .cache
            .find(&quoted.id)
            .await
            .map(|message| message.payload),
    };

    let Some(MessagePayload::Media(media)) = payload else {
        return Err(StatusBotError::Download {
            message: "quoted status has no downloadable media".into(),
            source: None,
        });
    };

    let data = ctx.transport.download_media(&media).await?;
    let name = ctx.engine.vault.save(&data, media.kind).await?;
    info!(file = %name, kind = %media.kind, bytes = data.len(), "status saved");
    Ok((name, media.kind, data))
}

fn save_guide(ctx: &Context<'_>) -> String {
    let p = &ctx.settings.prefix;
    format!(
        "{header}\n\n\
         *How to Save a Status:*\n\
         1. View a status update\n\
         2. Reply to the status with *{p}save*\n\
         3. The bot will download and save the status\n\n\
         *Commands:*\n\
         - {p}save - Save a status (reply to status)\n\
         - {p}statuslist - List all saved statuses\n\
         - {p}clearstatus - Delete all saved statuses\n\n\
         *Note:* Only the bot owner can save statuses.\n\n\
         {footer}",
        header = ctx.style("Status Saver", "Shadow"),
        footer = ctx.footer(),
    )
}

pub(super) async fn status_list(ctx: &Context<'_>) -> Result<(), StatusBotError> {
    let files = ctx.engine.vault.list().await?;
    if files.is_empty() {
        return ctx.reply(NO_SAVED_STATUSES).await;
    }

    let listing = files
        .iter()
        .enumerate()
        .map(|(i, file)| format!("{}. {file}", i + 1))
        .collect::<Vec<_>>()
        .join("\n");
    ctx.reply(&format!(
        "{}\n\n{listing}\n\nTotal: {} status(es)\n\n{}",
        ctx.header("Saved Statuses"),
        files.len(),
        ctx.footer()
    ))
    .await
}

pub(super) async fn clear_status(ctx: &Context<'_>) -> Result<(), StatusBotError> {
    let count = ctx.engine.vault.clear().await?;
    ctx.reply(&format!(
        "✅ Cleared {count} saved status(es).\n\n{}",
        ctx.footer()
    ))
    .await
}
