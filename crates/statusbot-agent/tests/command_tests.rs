// SPDX-FileCopyrightText: 2026 Statusbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Command engine behavior against a mock transport.

use std::sync::Arc;
use std::time::Duration;

use statusbot_agent::{CommandEngine, Invocation, NOT_AUTHORIZED, RuntimeConfig, UnicodeStyler};
use statusbot_config::StatusBotConfig;
use statusbot_core::TextStyler;
use statusbot_core::types::{ChatMessage, DeliveryKind, MediaKind};
use statusbot_store::{MediaVault, MessageCache};
use statusbot_test_utils::fixtures::{
    chat_quote, media_status, quoting, status_quote, text_message,
};
use statusbot_test_utils::{MockTransport, SentItem};
use tempfile::TempDir;

const OWNER: &str = "111";
const STRANGER: &str = "222";

struct Fixture {
    _dir: TempDir,
    engine: Arc<CommandEngine>,
    vault: Arc<MediaVault>,
    cache: Arc<MessageCache>,
    transport: Arc<MockTransport>,
}

impl Fixture {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let mut config = StatusBotConfig::default();
        config.bot.owner = OWNER.into();

        let settings = Arc::new(RuntimeConfig::from_config(&config).unwrap());
        let vault = Arc::new(MediaVault::open(dir.path().join("media/status")).unwrap());
        let cache = Arc::new(MessageCache::new(dir.path().join("store.json"), 100));
        let engine = Arc::new(CommandEngine::new(
            settings,
            vault.clone(),
            cache.clone(),
            Arc::new(UnicodeStyler),
            Duration::from_secs(5),
        ));

        Self {
            _dir: dir,
            engine,
            vault,
            cache,
            transport: Arc::new(MockTransport::new()),
        }
    }

    async fn run(&self, message: ChatMessage) {
        let invocation = Invocation::parse(&message, &self.engine.settings().snapshot())
            .expect("message should parse as a command");
        self.engine
            .execute(&*self.transport, &invocation)
            .await
            .unwrap();
    }

    async fn say(&self, sender: &str, text: &str) {
        self.run(text_message(sender, text)).await;
    }

    async fn last_reply(&self) -> String {
        self.transport.last_text().await.expect("expected a reply")
    }

    async fn seed_vault(&self, count: usize) {
        for i in 0..count {
            self.vault
                .save(format!("file-{i}").as_bytes(), MediaKind::Image)
                .await
                .unwrap();
        }
    }
}

#[tokio::test]
async fn privileged_commands_from_stranger_change_nothing() {
    let fx = Fixture::new();
    fx.seed_vault(2).await;
    let settings_before = fx.engine.settings().snapshot();
    let files_before = fx.vault.list().await.unwrap();

    for text in [".save", ".savestatus", ".clearstatus", ".setfont Big", ".toggleauto"] {
        fx.transport.clear_sent().await;
        fx.say(STRANGER, text).await;
        assert_eq!(fx.transport.texts().await, vec![NOT_AUTHORIZED.to_string()], "{text}");
    }

    // A stranger quoting a real status is still refused.
    fx.transport.clear_sent().await;
    fx.run(quoting(STRANGER, ".save", status_quote("S1", MediaKind::Image, true)))
        .await;
    assert_eq!(fx.last_reply().await, NOT_AUTHORIZED);

    assert_eq!(*fx.engine.settings().snapshot(), *settings_before);
    assert_eq!(fx.vault.list().await.unwrap(), files_before);
}

#[tokio::test]
async fn setfont_by_owner_then_stranger() {
    let fx = Fixture::new();

    fx.say(OWNER, ".setfont Big").await;
    assert_eq!(fx.engine.settings().snapshot().font, "Big");
    let reply = fx.last_reply().await;
    assert!(reply.contains("Font changed to *Big*"));
    assert!(reply.contains(&UnicodeStyler.style("Font Changed!", "Big")));

    fx.say(STRANGER, ".setfont Slant").await;
    assert_eq!(fx.last_reply().await, NOT_AUTHORIZED);
    assert_eq!(fx.engine.settings().snapshot().font, "Big");
}

#[tokio::test]
async fn setfont_with_unknown_name_only_replies() {
    let fx = Fixture::new();
    let before = fx.engine.settings().snapshot();

    fx.say(OWNER, ".setfont Comic").await;
    assert_eq!(
        fx.last_reply().await,
        "Invalid font name. Use *.fonts* to see available fonts."
    );
    fx.say(OWNER, ".setfont").await;
    assert!(fx.last_reply().await.starts_with("Invalid font name."));

    assert_eq!(*fx.engine.settings().snapshot(), *before);
}

#[tokio::test]
async fn setfont_accepts_names_with_spaces() {
    let fx = Fixture::new();
    fx.say(OWNER, ".setfont ANSI Shadow").await;
    assert_eq!(fx.engine.settings().snapshot().font, "ANSI Shadow");
}

#[tokio::test]
async fn toggleauto_twice_restores_flag() {
    let fx = Fixture::new();
    let original = fx.engine.settings().snapshot().auto_react;

    fx.say(OWNER, ".toggleauto").await;
    assert_eq!(fx.engine.settings().snapshot().auto_react, !original);
    assert!(fx.last_reply().await.starts_with("Auto-reaction to status disabled."));

    fx.say(OWNER, ".toggleauto").await;
    assert_eq!(fx.engine.settings().snapshot().auto_react, original);
    assert!(fx.last_reply().await.starts_with("Auto-reaction to status enabled."));
}

#[tokio::test]
async fn clearstatus_then_statuslist_reports_zero() {
    let fx = Fixture::new();
    fx.seed_vault(4).await;

    fx.say(OWNER, ".clearstatus").await;
    assert!(fx.last_reply().await.starts_with("✅ Cleared 4 saved status(es)."));

    fx.say(STRANGER, ".statuslist").await;
    assert_eq!(fx.last_reply().await, "No saved statuses found.");
    assert_eq!(fx.vault.count().await.unwrap(), 0);
}

#[tokio::test]
async fn statuslist_enumerates_three_entries() {
    let fx = Fixture::new();
    fx.seed_vault(3).await;
    let files = fx.vault.list().await.unwrap();

    fx.say(STRANGER, ".statuslist").await;
    let reply = fx.last_reply().await;
    for (i, file) in files.iter().enumerate() {
        assert!(reply.contains(&format!("{}. {file}", i + 1)));
    }
    assert!(!reply.contains("4. "));
    assert!(reply.contains("Total: 3"));
}

#[tokio::test]
async fn save_of_non_status_quote_is_refused() {
    let fx = Fixture::new();
    fx.run(quoting(OWNER, ".save", chat_quote("C1", "333"))).await;

    assert_eq!(fx.last_reply().await, "This is not a status message.");
    assert_eq!(fx.vault.count().await.unwrap(), 0);
}

#[tokio::test]
async fn save_without_quote_shows_guide() {
    let fx = Fixture::new();
    fx.say(OWNER, ".save").await;

    let reply = fx.last_reply().await;
    assert!(reply.contains("*How to Save a Status:*"));
    assert!(reply.contains("Reply to the status with *.save*"));
    assert_eq!(fx.vault.count().await.unwrap(), 0);
}

#[tokio::test]
async fn save_stores_and_resends_video() {
    let fx = Fixture::new();
    fx.transport.set_download(Ok(b"video-bytes".to_vec())).await;

    fx.run(quoting(OWNER, ".save", status_quote("S1", MediaKind::Video, true)))
        .await;

    let files = fx.vault.list().await.unwrap();
    assert_eq!(files.len(), 1);
    assert!(files[0].starts_with("status_") && files[0].ends_with(".mp4"));
    assert_eq!(fx.vault.read(&files[0]).await.unwrap(), b"video-bytes");

    let sent = fx.transport.sent().await;
    assert!(matches!(
        &sent[0],
        SentItem::Text { text, .. } if text.starts_with(&format!("✅ Status saved successfully as *{}*", files[0]))
    ));
    assert!(matches!(
        &sent[1],
        SentItem::Media { kind: MediaKind::Video, caption: Some(caption), data, .. }
            if caption == "Here is the saved status." && data == b"video-bytes"
    ));
}

#[tokio::test]
async fn saved_audio_is_resent_without_caption() {
    let fx = Fixture::new();
    fx.run(quoting(OWNER, ".savestatus", status_quote("S2", MediaKind::Audio, true)))
        .await;

    assert!(fx.vault.list().await.unwrap()[0].ends_with(".mp3"));
    let sent = fx.transport.sent().await;
    assert!(matches!(
        sent.last(),
        Some(SentItem::Media { kind: MediaKind::Audio, caption: None, .. })
    ));
}

#[tokio::test]
async fn save_resolves_quote_through_cache() {
    let fx = Fixture::new();
    fx.cache
        .record(&media_status("S3", "444", MediaKind::Image))
        .await;

    fx.run(quoting(OWNER, ".save", status_quote("S3", MediaKind::Image, false)))
        .await;

    let files = fx.vault.list().await.unwrap();
    assert_eq!(files.len(), 1);
    assert!(files[0].ends_with(".jpg"));
}

#[tokio::test]
async fn failed_download_reports_and_commits_nothing() {
    let fx = Fixture::new();
    fx.transport.set_download(Err("media expired".into())).await;

    fx.run(quoting(OWNER, ".save", status_quote("S4", MediaKind::Image, true)))
        .await;

    assert_eq!(
        fx.last_reply().await,
        "Failed to save status: download failed: media expired"
    );
    assert_eq!(fx.vault.count().await.unwrap(), 0);
}

#[tokio::test]
async fn unknown_command_is_ignored() {
    let fx = Fixture::new();
    fx.say(OWNER, ".dance now").await;
    assert!(fx.transport.sent().await.is_empty());
}

#[tokio::test]
async fn informational_commands_reply() {
    let fx = Fixture::new();

    fx.say(STRANGER, ".alive").await;
    let alive = fx.last_reply().await;
    assert!(alive.starts_with(&UnicodeStyler.style("I am alive!", "Big")));
    assert!(alive.contains("*Bot Status:* Online"));
    assert!(alive.contains("*Auto React:* Enabled"));
    assert!(alive.ends_with("_Powered by Lotus Mansion_"));

    fx.say(STRANGER, ".menu").await;
    let menu = fx.last_reply().await;
    assert!(menu.contains("- .alive - Check if bot is running"));
    assert!(menu.contains("- .toggleauto - Toggle auto-reaction (owner only)"));

    fx.say(STRANGER, ".info").await;
    let info = fx.last_reply().await;
    assert!(info.contains("*Owner:* 111"));
    assert!(info.contains("*Time Zone:* Asia/Kolkata"));
    assert!(info.contains("*Saved Statuses:* 0"));

    fx.say(STRANGER, ".fonts").await;
    let fonts = fx.last_reply().await;
    assert!(fonts.contains("1. Standard"));
    assert!(fonts.contains("15. Script"));

    fx.transport.clear_sent().await;
    fx.say(STRANGER, ".PING").await;
    let texts = fx.transport.texts().await;
    assert_eq!(texts.len(), 2);
    assert_eq!(texts[0], "Pinging...");
    assert!(texts[1].starts_with("🏓 Pong!\nResponse time: "));
}

#[tokio::test]
async fn dispatch_runs_notify_messages_only() {
    let fx = Fixture::new();
    let transport: Arc<dyn statusbot_core::Transport> = fx.transport.clone();

    let mut history = text_message(OWNER, ".ping");
    history.delivery = DeliveryKind::Append;
    assert!(fx.engine.dispatch(transport.clone(), &history).is_none());
    assert!(fx.engine.dispatch(transport.clone(), &text_message(OWNER, "hello")).is_none());

    let handle = fx
        .engine
        .dispatch(transport, &text_message(OWNER, ".alive"))
        .expect("command should be dispatched");
    handle.await.unwrap();
    assert!(fx.last_reply().await.contains("*Bot Status:* Online"));
}
