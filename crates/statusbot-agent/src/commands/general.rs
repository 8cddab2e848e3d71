// SPDX-FileCopyrightText: 2026 Statusbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Commands open to everyone: alive, menu, ping, info, fonts.

use std::fmt::Write as _;
use std::time::Instant;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use statusbot_core::StatusBotError;

use super::Context;

/// `DD/MM/YY HH:mm:ss` in the configured timezone.
fn format_time(at: DateTime<Utc>, timezone: Tz) -> String {
    at.with_timezone(&timezone)
        .format("%d/%m/%y %H:%M:%S")
        .to_string()
}

fn enabled(flag: bool) -> &'static str {
    if flag { "Enabled" } else { "Disabled" }
}

pub(super) async fn alive(ctx: &Context<'_>) -> Result<(), StatusBotError> {
    let banner = ctx.style("I am alive!", "Big");
    let time = format_time(Utc::now(), ctx.settings.timezone);
    ctx.reply(&format!(
        "{banner}\n\n*Bot Status:* Online\n*Time:* {time}\n*Auto React:* {}\n\n{}",
        enabled(ctx.settings.auto_react),
        ctx.footer()
    ))
    .await
}

pub(super) async fn menu(ctx: &Context<'_>) -> Result<(), StatusBotError> {
    ctx.reply(&menu_text(ctx)).await
}

fn menu_text(ctx: &Context<'_>) -> String {
    let p = &ctx.settings.prefix;
    let sections: [(&str, Vec<String>); 3] = [
        (
            "🤖 Bot Commands",
            vec![
                format!("{p}alive - Check if bot is running"),
                format!("{p}menu - Display this menu"),
                format!("{p}ping - Check bot response time"),
                format!("{p}info - Show bot information"),
            ],
        ),
        (
            "📱 Status Commands",
            vec![
                format!("{p}save - Save current status (owner only)"),
                format!("{p}savestatus - Alternative command to save status"),
                format!("{p}statuslist - List all saved statuses"),
                format!("{p}clearstatus - Clear saved statuses (owner only)"),
            ],
        ),
        (
            "⚙️ Settings",
            vec![
                format!("{p}setfont [fontname] - Change menu font style"),
                format!("{p}fonts - List available fonts"),
                format!("{p}toggleauto - Toggle auto-reaction (owner only)"),
            ],
        ),
    ];

    let mut text = format!(
        "{}\n\n{}\n\n",
        ctx.style(&ctx.settings.bot_name, "Big"),
        ctx.style("MENU", "Slant")
    );
    for (title, items) in sections {
        let _ = writeln!(text, "*{title}*");
        for item in items {
            let _ = writeln!(text, "- {item}");
        }
        text.push('\n');
    }
    let _ = write!(
        text,
        "\n*Powered by {}*\n_{} v{}_",
        ctx.settings.footer,
        ctx.settings.bot_name,
        env!("CARGO_PKG_VERSION")
    );
    text
}

pub(super) async fn ping(ctx: &Context<'_>) -> Result<(), StatusBotError> {
    let start = Instant::now();
    ctx.reply("Pinging...").await?;
    let elapsed = start.elapsed().as_millis();
    ctx.reply(&format!(
        "🏓 Pong!\nResponse time: {elapsed}ms\n\n{}",
        ctx.footer()
    ))
    .await
}

pub(super) async fn info(ctx: &Context<'_>) -> Result<(), StatusBotError> {
    let saved = ctx.engine.vault.count().await?;
    let s = ctx.settings;
    ctx.reply(&format!(
        "{}\n\n*Bot Name:* {}\n*Prefix:* {}\n*Owner:* {}\n*Auto React:* {}\n*Default Font:* {}\n*Time Zone:* {}\n*Saved Statuses:* {saved}\n\n{}",
        ctx.header("Bot Info"),
        s.bot_name,
        s.prefix,
        s.owner,
        enabled(s.auto_react),
        s.font,
        s.timezone.name(),
        ctx.footer()
    ))
    .await
}

pub(super) async fn fonts(ctx: &Context<'_>) -> Result<(), StatusBotError> {
    let list = ctx
        .engine
        .styler
        .style_names()
        .iter()
        .enumerate()
        .map(|(i, name)| format!("{}. {name}", i + 1))
        .collect::<Vec<_>>()
        .join("\n");
    ctx.reply(&format!(
        "{}\n\n{list}\n\n{}",
        ctx.header("Available Fonts"),
        ctx.footer()
    ))
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn formats_in_configured_timezone() {
        let at = Utc.with_ymd_and_hms(2024, 3, 9, 20, 5, 7).unwrap();
        assert_eq!(format_time(at, chrono_tz::Asia::Kolkata), "10/03/24 01:35:07");
        assert_eq!(format_time(at, chrono_tz::UTC), "09/03/24 20:05:07");
    }
}
