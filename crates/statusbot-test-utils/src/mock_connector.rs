// SPDX-FileCopyrightText: 2026 Statusbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock connector that hands out scripted sessions.
//!
//! Each `connect` pops the next script, creates a fresh [`MockTransport`],
//! and replays the scripted events on the session's event stream. When the
//! script runs out the stream stays open until the connector is dropped or
//! [`MockConnector::close_current`] is called. Connecting with no script
//! left fails with a transport error.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use statusbot_core::types::{InboundEvent, SessionCredentials};
use statusbot_core::{StatusBotError, TransportConnector, TransportSession};
use tokio::sync::{Mutex, mpsc};

use crate::mock_transport::MockTransport;

/// Events replayed on one session, and whether the stream closes afterwards.
#[derive(Debug, Clone, Default)]
pub struct SessionScript {
    pub events: Vec<InboundEvent>,
    /// Drop the event sender after replaying, ending the stream.
    pub end_stream: bool,
}

impl SessionScript {
    pub fn new(events: Vec<InboundEvent>) -> Self {
        Self {
            events,
            end_stream: false,
        }
    }

    pub fn ending_stream(mut self) -> Self {
        self.end_stream = true;
        self
    }
}

/// A scripted [`TransportConnector`].
#[derive(Default)]
pub struct MockConnector {
    scripts: Mutex<VecDeque<SessionScript>>,
    transports: Mutex<Vec<Arc<MockTransport>>>,
    credentials_seen: Mutex<Vec<Option<SessionCredentials>>>,
    open_sender: Mutex<Option<mpsc::Sender<InboundEvent>>>,
    read_delay: Mutex<Option<Duration>>,
}

impl MockConnector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues the script for the next unscripted `connect`.
    pub async fn push_session(&self, script: SessionScript) {
        self.scripts.lock().await.push_back(script);
    }

    /// Slows `mark_read` on every transport created from now on.
    pub async fn set_read_delay(&self, delay: Duration) {
        *self.read_delay.lock().await = Some(delay);
    }

    /// Transports created so far, one per successful `connect`.
    pub async fn transports(&self) -> Vec<Arc<MockTransport>> {
        self.transports.lock().await.clone()
    }

    /// Credentials passed to each `connect` call, in order.
    pub async fn credentials_seen(&self) -> Vec<Option<SessionCredentials>> {
        self.credentials_seen.lock().await.clone()
    }

    pub async fn connect_count(&self) -> usize {
        self.credentials_seen.lock().await.len()
    }

    /// Sends one more event on the most recent session, if it is still open.
    pub async fn inject(&self, event: InboundEvent) -> bool {
        let sender = self.open_sender.lock().await.clone();
        match sender {
            Some(tx) => tx.send(event).await.is_ok(),
            None => false,
        }
    }

    /// Ends the event stream of the most recent session.
    pub async fn close_current(&self) {
        self.open_sender.lock().await.take();
    }
}

#[async_trait]
impl TransportConnector for MockConnector {
    async fn connect(
        &self,
        credentials: Option<SessionCredentials>,
    ) -> Result<TransportSession, StatusBotError> {
        self.credentials_seen.lock().await.push(credentials);

        let Some(script) = self.scripts.lock().await.pop_front() else {
            return Err(StatusBotError::transport("no scripted session left"));
        };

        let transport = Arc::new(MockTransport::new());
        if let Some(delay) = *self.read_delay.lock().await {
            transport.set_read_delay(delay);
        }
        self.transports.lock().await.push(transport.clone());

        let (tx, rx) = mpsc::channel(script.events.len().max(1) + 16);
        for event in script.events {
            // The receiver is still held locally, so this cannot fail.
            let _ = tx.send(event).await;
        }
        *self.open_sender.lock().await = if script.end_stream { None } else { Some(tx) };

        Ok(TransportSession {
            transport,
            events: rx,
        })
    }
}
