// SPDX-FileCopyrightText: 2026 Statusbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock transport for deterministic testing.
//!
//! `MockTransport` implements `Transport` and records every outbound call
//! for assertion in tests. Downloads and reactions can be made to fail, and
//! read receipts can be slowed down.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use statusbot_core::types::{
    HealthStatus, Jid, MediaKind, MediaRef, MessageId, MessageKey, OutboundMedia,
};
use statusbot_core::{PluginAdapter, StatusBotError, Transport};
use tokio::sync::Mutex;

/// One captured outbound call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SentItem {
    Text {
        to: Jid,
        text: String,
    },
    Reaction {
        to: Jid,
        target: MessageKey,
        emoji: String,
    },
    Media {
        to: Jid,
        kind: MediaKind,
        data: Vec<u8>,
        caption: Option<String>,
    },
}

/// A mock transport for testing.
pub struct MockTransport {
    sent: Mutex<Vec<SentItem>>,
    read: Mutex<Vec<MessageKey>>,
    download: Mutex<Result<Vec<u8>, String>>,
    fail_reactions: AtomicBool,
    read_delay_ms: AtomicU64,
    shut_down: AtomicBool,
}

impl MockTransport {
    /// Creates a transport whose downloads return `b"mock-media"`.
    pub fn new() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            read: Mutex::new(Vec::new()),
            download: Mutex::new(Ok(b"mock-media".to_vec())),
            fail_reactions: AtomicBool::new(false),
            read_delay_ms: AtomicU64::new(0),
            shut_down: AtomicBool::new(false),
        }
    }

    /// Sets what every subsequent `download_media` call returns.
    pub async fn set_download(&self, result: Result<Vec<u8>, String>) {
        *self.download.lock().await = result;
    }

    /// Makes `send_reaction` fail until reset.
    pub fn fail_reactions(&self, fail: bool) {
        self.fail_reactions.store(fail, Ordering::SeqCst);
    }

    /// Makes every `mark_read` sleep for `delay` before recording.
    pub fn set_read_delay(&self, delay: Duration) {
        self.read_delay_ms
            .store(delay.as_millis() as u64, Ordering::SeqCst);
    }

    /// All captured outbound calls, in order.
    pub async fn sent(&self) -> Vec<SentItem> {
        self.sent.lock().await.clone()
    }

    /// Bodies of captured text messages, in order.
    pub async fn texts(&self) -> Vec<String> {
        self.sent
            .lock()
            .await
            .iter()
            .filter_map(|item| match item {
                SentItem::Text { text, .. } => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    /// The most recent text message, if any.
    pub async fn last_text(&self) -> Option<String> {
        self.texts().await.pop()
    }

    pub async fn reaction_count(&self) -> usize {
        self.sent
            .lock()
            .await
            .iter()
            .filter(|item| matches!(item, SentItem::Reaction { .. }))
            .count()
    }

    /// Keys passed to `mark_read`, in order.
    pub async fn read_receipts(&self) -> Vec<MessageKey> {
        self.read.lock().await.clone()
    }

    pub async fn clear_sent(&self) {
        self.sent.lock().await.clear();
    }

    pub fn is_shut_down(&self) -> bool {
        self.shut_down.load(Ordering::SeqCst)
    }

    fn next_id() -> MessageId {
        MessageId(format!("mock-msg-{}", uuid::Uuid::new_v4()))
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PluginAdapter for MockTransport {
    fn name(&self) -> &str {
        "mock-transport"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    async fn health_check(&self) -> Result<HealthStatus, StatusBotError> {
        if self.is_shut_down() {
            Ok(HealthStatus::Unhealthy("shut down".into()))
        } else {
            Ok(HealthStatus::Healthy)
        }
    }

    async fn shutdown(&self) -> Result<(), StatusBotError> {
        self.shut_down.store(true, Ordering::SeqCst);
        Ok(())
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send_text(&self, to: &Jid, text: &str) -> Result<MessageId, StatusBotError> {
        self.sent.lock().await.push(SentItem::Text {
            to: to.clone(),
            text: text.to_string(),
        });
        Ok(Self::next_id())
    }

    async fn send_reaction(
        &self,
        to: &Jid,
        target: &MessageKey,
        emoji: &str,
    ) -> Result<(), StatusBotError> {
        if self.fail_reactions.load(Ordering::SeqCst) {
            return Err(StatusBotError::transport("mock reaction failure"));
        }
        self.sent.lock().await.push(SentItem::Reaction {
            to: to.clone(),
            target: target.clone(),
            emoji: emoji.to_string(),
        });
        Ok(())
    }

    async fn send_media(
        &self,
        to: &Jid,
        media: OutboundMedia,
    ) -> Result<MessageId, StatusBotError> {
        self.sent.lock().await.push(SentItem::Media {
            to: to.clone(),
            kind: media.kind,
            data: media.data,
            caption: media.caption,
        });
        Ok(Self::next_id())
    }

    async fn mark_read(&self, key: &MessageKey) -> Result<(), StatusBotError> {
        let delay = self.read_delay_ms.load(Ordering::SeqCst);
        if delay > 0 {
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }
        self.read.lock().await.push(key.clone());
        Ok(())
    }

    async fn download_media(&self, _media: &MediaRef) -> Result<Vec<u8>, StatusBotError> {
        self.download
            .lock()
            .await
            .clone()
            .map_err(|message| StatusBotError::Download {
                message,
                source: None,
            })
    }
}
