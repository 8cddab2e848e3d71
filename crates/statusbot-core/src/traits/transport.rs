// SPDX-FileCopyrightText: 2026 Statusbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Transport adapter traits for the messaging network session.
//!
//! A [`TransportConnector`] builds one fresh [`Transport`] per connection
//! attempt. The transport owns the wire session; the agent only consumes
//! its event stream and calls the send operations below.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::error::StatusBotError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{
    InboundEvent, Jid, MediaRef, MessageId, MessageKey, OutboundMedia, SessionCredentials,
};

/// Outbound operations on a live network session.
#[async_trait]
pub trait Transport: PluginAdapter {
    /// Sends a text message to a chat.
    async fn send_text(&self, to: &Jid, text: &str) -> Result<MessageId, StatusBotError>;

    /// Reacts to the message identified by `target` with `emoji`.
    async fn send_reaction(
        &self,
        to: &Jid,
        target: &MessageKey,
        emoji: &str,
    ) -> Result<(), StatusBotError>;

    /// Sends an image, video, or audio message.
    async fn send_media(&self, to: &Jid, media: OutboundMedia)
    -> Result<MessageId, StatusBotError>;

    /// Issues a read receipt for a message.
    async fn mark_read(&self, key: &MessageKey) -> Result<(), StatusBotError>;

    /// Downloads and decrypts the media behind `media`.
    async fn download_media(&self, media: &MediaRef) -> Result<Vec<u8>, StatusBotError>;
}

/// A connected session: the outbound handle plus its inbound event stream.
pub struct TransportSession {
    pub transport: Arc<dyn Transport>,
    /// Closed by the transport when the session ends.
    pub events: mpsc::Receiver<InboundEvent>,
}

/// Factory for transport sessions. Called once per connection attempt.
#[async_trait]
pub trait TransportConnector: Send + Sync + 'static {
    /// Opens a new session, resuming from `credentials` when present.
    async fn connect(
        &self,
        credentials: Option<SessionCredentials>,
    ) -> Result<TransportSession, StatusBotError>;
}
