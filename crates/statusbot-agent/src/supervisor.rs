// SPDX-FileCopyrightText: 2026 Statusbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Connection supervisor.
//!
//! Drives the `Connecting -> Open -> Closed(reason)` lifecycle in a retry
//! loop. Every attempt gets a fresh transport from the connector. A
//! `LoggedOut` close ends the loop with [`StatusBotError::LoggedOut`]; any
//! other close reconnects after an exponential backoff that resets once a
//! connection reaches `Open`.
//!
//! Within one session the supervisor owns the event stream. Connection and
//! credential events are handled inline, so a credential rotation is on
//! disk before the next event is looked at. Status and chat messages are
//! recorded in the message cache and routed to the status or command
//! subscriber. Each subscriber runs on its own task behind a bounded queue;
//! a full queue holds the pump back instead of dropping events.

use std::sync::Arc;
use std::time::Duration;

use statusbot_config::model::TransportConfig;
use statusbot_core::types::{ChatMessage, ConnectionState, DisconnectReason, InboundEvent};
use statusbot_core::{
    PairingPresenter, StatusBotError, TextStyler, Transport, TransportConnector, TransportSession,
};
use statusbot_store::{CredentialStore, MessageCache};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::commands::CommandEngine;
use crate::status::StatusPipeline;

/// Per-subscriber queue depth.
const SUBSCRIBER_QUEUE: usize = 256;

/// Reconnect delays: `initial`, doubling up to `max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Backoff {
    pub initial: Duration,
    pub max: Duration,
}

impl Backoff {
    pub fn from_config(config: &TransportConfig) -> Self {
        Self {
            initial: config.initial_backoff(),
            max: config.max_backoff(),
        }
    }

    pub fn next(&self, current: Duration) -> Duration {
        current.saturating_mul(2).min(self.max)
    }
}

/// How one session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SessionEnd {
    Shutdown,
    Closed {
        reason: DisconnectReason,
        opened: bool,
    },
}

/// Keeps the session alive and routes its events.
pub struct Supervisor {
    connector: Arc<dyn TransportConnector>,
    credentials: CredentialStore,
    presenter: Arc<dyn PairingPresenter>,
    styler: Arc<dyn TextStyler>,
    cache: Arc<MessageCache>,
    status: Arc<StatusPipeline>,
    commands: Arc<CommandEngine>,
    backoff: Backoff,
    drain_timeout: Duration,
}

impl Supervisor {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        connector: Arc<dyn TransportConnector>,
        credentials: CredentialStore,
        presenter: Arc<dyn PairingPresenter>,
        styler: Arc<dyn TextStyler>,
        cache: Arc<MessageCache>,
        status: Arc<StatusPipeline>,
        commands: Arc<CommandEngine>,
        transport: &TransportConfig,
    ) -> Self {
        Self {
            connector,
            credentials,
            presenter,
            styler,
            cache,
            status,
            commands,
            backoff: Backoff::from_config(transport),
            drain_timeout: transport.request_timeout(),
        }
    }

    /// Runs until `cancel` fires (returns `Ok`) or a fatal error occurs.
    ///
    /// Fatal errors are a remote logout and a failed credential write.
    pub async fn run(&self, cancel: CancellationToken) -> Result<(), StatusBotError> {
        let mut delay = self.backoff.initial;
        let mut attempt: u64 = 0;

        loop {
            if cancel.is_cancelled() {
                return Ok(());
            }
            attempt += 1;

            let credentials = match self.credentials.load().await {
                Ok(credentials) => credentials,
                Err(e) => {
                    warn!(error = %e, "stored credentials unusable, pairing required");
                    None
                }
            };

            info!(attempt, resuming = credentials.is_some(), "connecting");
            let end = match self.connector.connect(credentials).await {
                Ok(session) => self.drive(session, &cancel).await?,
                Err(e) => {
                    warn!(attempt, error = %e, "connect failed");
                    SessionEnd::Closed {
                        reason: DisconnectReason::ConnectionLost,
                        opened: false,
                    }
                }
            };

            match end {
                SessionEnd::Shutdown => {
                    info!("supervisor stopped");
                    return Ok(());
                }
                SessionEnd::Closed { reason, .. } if !reason.is_retriable() => {
                    error!(
                        session_dir = %self.credentials.dir().display(),
                        "session logged out; remove the session directory and pair again"
                    );
                    return Err(StatusBotError::LoggedOut);
                }
                SessionEnd::Closed { reason, opened } => {
                    if opened {
                        delay = self.backoff.initial;
                    }
                    info!(reason = ?reason, delay_ms = delay.as_millis() as u64, "connection closed, reconnecting");
                    tokio::select! {
                        _ = cancel.cancelled() => return Ok(()),
                        _ = tokio::time::sleep(delay) => {}
                    }
                    delay = self.backoff.next(delay);
                }
            }
        }
    }

    /// Runs one session to its end, then abandons the transport.
    async fn drive(
        &self,
        session: TransportSession,
        cancel: &CancellationToken,
    ) -> Result<SessionEnd, StatusBotError> {
        let TransportSession {
            transport,
            mut events,
        } = session;

        let (status_tx, status_rx) = mpsc::channel(SUBSCRIBER_QUEUE);
        let (command_tx, command_rx) = mpsc::channel(SUBSCRIBER_QUEUE);
        let subscribers = [
            self.spawn_status_subscriber(transport.clone(), status_rx),
            self.spawn_command_subscriber(transport.clone(), command_rx),
        ];
        let routes = Routes {
            status: status_tx,
            commands: command_tx,
        };

        let result = self.pump(&mut events, &routes, cancel).await;

        // Subscribers finish what is already queued, then see the channel close.
        drop(routes);
        for mut task in subscribers {
            if tokio::time::timeout(self.drain_timeout, &mut task).await.is_err() {
                warn!("subscriber did not drain in time, abandoning");
                task.abort();
            }
        }

        if let Err(e) = transport.shutdown().await {
            debug!(error = %e, "transport shutdown failed");
        }
        result
    }

    async fn pump(
        &self,
        events: &mut mpsc::Receiver<InboundEvent>,
        routes: &Routes,
        cancel: &CancellationToken,
    ) -> Result<SessionEnd, StatusBotError> {
        let mut opened = false;

        loop {
            let event = tokio::select! {
                _ = cancel.cancelled() => return Ok(SessionEnd::Shutdown),
                event = events.recv() => event,
            };
            let Some(event) = event else {
                warn!("event stream ended without a close reason");
                return Ok(SessionEnd::Closed {
                    reason: DisconnectReason::ConnectionLost,
                    opened,
                });
            };

            match event {
                InboundEvent::ConnectionChange { update } => {
                    if let Some(challenge) = &update.pairing {
                        info!("pairing challenge received");
                        self.presenter.render_pairing_challenge(challenge);
                    }
                    match update.state {
                        Some(ConnectionState::Connecting) => debug!("transport connecting"),
                        Some(ConnectionState::Open) => {
                            opened = true;
                            self.announce_open();
                        }
                        Some(ConnectionState::Closed(reason)) => {
                            return Ok(SessionEnd::Closed { reason, opened });
                        }
                        None => {}
                    }
                }
                InboundEvent::CredentialsChanged { credentials } => {
                    self.credentials.persist(&credentials).await?;
                }
                InboundEvent::StatusUpdate { message } => {
                    self.cache.record(&message).await;
                    if !forward(&routes.status, message, cancel).await {
                        return Ok(SessionEnd::Shutdown);
                    }
                }
                InboundEvent::ChatMessage { message } => {
                    self.cache.record(&message).await;
                    if !forward(&routes.commands, message, cancel).await {
                        return Ok(SessionEnd::Shutdown);
                    }
                }
            }
        }
    }

    fn announce_open(&self) {
        let settings = self.commands.settings().snapshot();
        let banner = self
            .styler
            .style(&format!("{} Online", settings.bot_name), "Big");
        info!(bot = %settings.bot_name, "connected");
        info!("{banner}");
    }

    fn spawn_status_subscriber(
        &self,
        transport: Arc<dyn Transport>,
        mut rx: mpsc::Receiver<ChatMessage>,
    ) -> JoinHandle<()> {
        let pipeline = self.status.clone();
        tokio::spawn(async move {
            while let Some(message) = rx.recv().await {
                pipeline.handle(&*transport, &message).await;
            }
        })
    }

    fn spawn_command_subscriber(
        &self,
        transport: Arc<dyn Transport>,
        mut rx: mpsc::Receiver<ChatMessage>,
    ) -> JoinHandle<()> {
        let engine = self.commands.clone();
        tokio::spawn(async move {
            while let Some(message) = rx.recv().await {
                engine.dispatch(transport.clone(), &message);
            }
        })
    }
}

/// Queues feeding the two subscriber tasks of one session.
struct Routes {
    status: mpsc::Sender<ChatMessage>,
    commands: mpsc::Sender<ChatMessage>,
}

/// Waits for queue space. Returns false only when `cancel` fires first.
async fn forward(
    queue: &mpsc::Sender<ChatMessage>,
    message: ChatMessage,
    cancel: &CancellationToken,
) -> bool {
    tokio::select! {
        _ = cancel.cancelled() => false,
        sent = queue.send(message) => {
            if sent.is_err() {
                warn!("subscriber exited early, message dropped");
            }
            true
        }
    }
}
