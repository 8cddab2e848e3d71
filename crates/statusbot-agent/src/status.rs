// SPDX-FileCopyrightText: 2026 Statusbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Status capture pipeline.
//!
//! Every status update is marked read and, when auto-react is on, reacted
//! to. Both calls are best-effort. A status counts as handled once either
//! call succeeds; handled keys are remembered for the life of the process,
//! so a status redelivered after a reconnect is not acknowledged twice,
//! while one whose sends all failed is retried on redelivery.

use std::collections::{HashSet, VecDeque};
use std::sync::Arc;

use statusbot_core::Transport;
use statusbot_core::types::{ChatMessage, MessageKey};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::settings::RuntimeConfig;

/// Insertion-ordered set that forgets its oldest entries past `capacity`.
#[derive(Debug)]
struct SeenKeys {
    capacity: usize,
    order: VecDeque<MessageKey>,
    members: HashSet<MessageKey>,
}

impl SeenKeys {
    fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            order: VecDeque::new(),
            members: HashSet::new(),
        }
    }

    fn contains(&self, key: &MessageKey) -> bool {
        self.members.contains(key)
    }

    /// Returns false if `key` was already present.
    fn insert(&mut self, key: &MessageKey) -> bool {
        if self.contains(key) {
            return false;
        }
        self.members.insert(key.clone());
        self.order.push_back(key.clone());
        while self.order.len() > self.capacity {
            if let Some(evicted) = self.order.pop_front() {
                self.members.remove(&evicted);
            }
        }
        true
    }
}

/// What the pipeline did with one status update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusOutcome {
    /// Handled earlier in this run; nothing sent.
    Duplicate,
    Handled { read: bool, reacted: bool },
    /// Every send failed; a redelivery will be tried again.
    Failed,
}

/// Consumes status updates.
///
/// Callers feed it from a single task, so the check and the later insert
/// of a key never race.
pub struct StatusPipeline {
    settings: Arc<RuntimeConfig>,
    seen: Mutex<SeenKeys>,
}

impl StatusPipeline {
    pub fn new(settings: Arc<RuntimeConfig>, dedup_capacity: usize) -> Self {
        Self {
            settings,
            seen: Mutex::new(SeenKeys::new(dedup_capacity)),
        }
    }

    pub async fn handle(&self, transport: &dyn Transport, message: &ChatMessage) -> StatusOutcome {
        if self.seen.lock().await.contains(&message.key) {
            debug!(message_id = %message.key.id, "status already handled");
            return StatusOutcome::Duplicate;
        }

        let author = message.sender().user().to_string();

        let read = match transport.mark_read(&message.key).await {
            Ok(()) => {
                info!(participant = %author, "viewed status");
                true
            }
            Err(e) => {
                warn!(participant = %author, message_id = %message.key.id, error = %e, "failed to mark status read");
                false
            }
        };

        let settings = self.settings.snapshot();
        let mut reacted = false;
        if settings.auto_react {
            match transport
                .send_reaction(message.chat(), &message.key, &settings.react_emoji)
                .await
            {
                Ok(()) => {
                    info!(participant = %author, "reacted to status");
                    reacted = true;
                }
                Err(e) => {
                    warn!(participant = %author, message_id = %message.key.id, error = %e, "failed to react to status");
                }
            }
        }

        if !read && !reacted {
            return StatusOutcome::Failed;
        }
        self.seen.lock().await.insert(&message.key);
        StatusOutcome::Handled { read, reacted }
    }
}
