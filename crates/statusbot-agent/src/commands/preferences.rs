// SPDX-FileCopyrightText: 2026 Statusbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Owner commands that change runtime settings: setfont, toggleauto.

use statusbot_core::StatusBotError;

use super::Context;

pub(super) async fn set_font(ctx: &Context<'_>) -> Result<(), StatusBotError> {
    // Several style names contain spaces, so the whole argument list is the name.
    let requested = ctx.invocation.args.join(" ");

    if requested.is_empty() || !ctx.engine.styler.is_known_style(&requested) {
        return ctx
            .reply(&format!(
                "Invalid font name. Use *{}fonts* to see available fonts.",
                ctx.settings.prefix
            ))
            .await;
    }

    ctx.engine.settings.set_font(&requested);

    let sample = ctx.style("Font Changed!", &requested);
    ctx.reply(&format!(
        "✅ Font changed to *{requested}*\n\nSample:\n{sample}\n\n{}",
        ctx.footer()
    ))
    .await
}

pub(super) async fn toggle_auto(ctx: &Context<'_>) -> Result<(), StatusBotError> {
    let enabled = ctx.engine.settings.toggle_auto_react();
    ctx.reply(&format!(
        "Auto-reaction to status {}.\n\n{}",
        if enabled { "enabled" } else { "disabled" },
        ctx.footer()
    ))
    .await
}
