// SPDX-FileCopyrightText: 2026 Statusbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory mirror of recent messages with periodic full snapshots.
//!
//! Each chat keeps at most `max_per_chat` messages, oldest evicted first.
//! The snapshot file is rewritten wholesale on every flush.

use std::collections::{BTreeMap, HashMap, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use statusbot_config::model::StorageConfig;
use statusbot_core::StatusBotError;
use statusbot_core::types::{ChatMessage, Jid, MessageId};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::atomic;

/// On-disk snapshot layout.
#[derive(Debug, Default, Serialize, Deserialize)]
struct Snapshot {
    #[serde(default)]
    chats: BTreeMap<String, Vec<ChatMessage>>,
}

/// Bounded per-chat message cache backed by a snapshot file.
#[derive(Debug)]
pub struct MessageCache {
    path: PathBuf,
    max_per_chat: usize,
    chats: Mutex<HashMap<Jid, VecDeque<ChatMessage>>>,
}

impl MessageCache {
    /// Creates an empty cache that will snapshot to `path`.
    pub fn new(path: impl Into<PathBuf>, max_per_chat: usize) -> Self {
        Self {
            path: path.into(),
            max_per_chat: max_per_chat.max(1),
            chats: Mutex::new(HashMap::new()),
        }
    }

    /// Loads the snapshot at `path`.
    ///
    /// A missing file yields an empty cache. A corrupt file is logged and
    /// also yields an empty cache; it is overwritten on the next flush.
    pub async fn load(path: impl Into<PathBuf>, max_per_chat: usize) -> Self {
        let cache = Self::new(path, max_per_chat);

        let bytes = match tokio::fs::read(&cache.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %cache.path.display(), "no message cache snapshot");
                return cache;
            }
            Err(e) => {
                warn!(path = %cache.path.display(), error = %e, "failed to read message cache, starting empty");
                return cache;
            }
        };

        let snapshot: Snapshot = match serde_json::from_slice(&bytes) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!(path = %cache.path.display(), error = %e, "corrupt message cache, starting empty");
                return cache;
            }
        };

        let mut restored = 0usize;
        {
            let mut chats = cache.chats.lock().await;
            for (chat, messages) in snapshot.chats {
                let mut deque: VecDeque<ChatMessage> = messages.into();
                while deque.len() > cache.max_per_chat {
                    deque.pop_front();
                }
                restored += deque.len();
                chats.insert(Jid::new(chat), deque);
            }
        }
        info!(messages = restored, "message cache restored");
        cache
    }

    /// Loads the cache described by the storage section of the config.
    pub async fn from_config(storage: &StorageConfig) -> Self {
        Self::load(storage.cache_path.clone(), storage.cache_max_per_chat).await
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Records a message. A message with an id already present in its chat
    /// replaces the stored copy.
    pub async fn record(&self, message: &ChatMessage) {
        let mut chats = self.chats.lock().await;
        let deque = chats.entry(message.chat().clone()).or_default();

        if let Some(existing) = deque.iter_mut().find(|m| m.key.id == message.key.id) {
            *existing = message.clone();
            return;
        }

        deque.push_back(message.clone());
        while deque.len() > self.max_per_chat {
            deque.pop_front();
        }
    }

    /// Finds a message by chat and id.
    pub async fn lookup(&self, chat: &Jid, id: &MessageId) -> Option<ChatMessage> {
        let chats = self.chats.lock().await;
        chats.get(chat)?.iter().find(|m| &m.key.id == id).cloned()
    }

    /// Finds a message by id in any chat.
    ///
    /// Quoted statuses live in the broadcast chat rather than the chat
    /// the quote was sent in, so callers without the origin chat use this.
    pub async fn find(&self, id: &MessageId) -> Option<ChatMessage> {
        let chats = self.chats.lock().await;
        chats
            .values()
            .flat_map(|deque| deque.iter())
            .find(|m| &m.key.id == id)
            .cloned()
    }

    /// Total number of cached messages.
    pub async fn len(&self) -> usize {
        self.chats.lock().await.values().map(VecDeque::len).sum()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Writes a full snapshot, replacing the previous file atomically.
    pub async fn flush(&self) -> Result<(), StatusBotError> {
        let snapshot = {
            let chats = self.chats.lock().await;
            Snapshot {
                chats: chats
                    .iter()
                    .map(|(chat, deque)| (chat.to_string(), deque.iter().cloned().collect()))
                    .collect(),
            }
        };

        let bytes = serde_json::to_vec(&snapshot).map_err(|e| StatusBotError::Persistence {
            message: "failed to encode message cache".into(),
            source: Some(Box::new(e)),
        })?;
        let path = self.path.clone();
        let shown = path.display().to_string();

        tokio::task::spawn_blocking(move || atomic::write_replace(&path, &bytes))
            .await
            .map_err(|e| StatusBotError::Internal(format!("cache flush task failed: {e}")))?
            .map_err(|e| StatusBotError::persistence(format!("failed to write {shown}"), e))?;

        debug!(path = %shown, "message cache flushed");
        Ok(())
    }

    /// Spawns the periodic flush loop.
    ///
    /// The loop flushes every `interval` until `cancel` fires, then flushes
    /// once more before exiting. Flush failures are logged and retried on
    /// the next tick.
    pub fn spawn_flush_task(
        self: Arc<Self>,
        interval: Duration,
        cancel: CancellationToken,
    ) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            // The first tick completes immediately.
            ticker.tick().await;

            loop {
                tokio::select! {
                    _ = cancel.cancelled() => break,
                    _ = ticker.tick() => {
                        if let Err(e) = self.flush().await {
                            warn!(error = %e, "periodic message cache flush failed");
                        }
                    }
                }
            }

            if let Err(e) = self.flush().await {
                warn!(error = %e, "final message cache flush failed");
            } else {
                info!("message cache flushed on shutdown");
            }
        })
    }
}
