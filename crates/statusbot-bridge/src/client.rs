// SPDX-FileCopyrightText: 2026 Statusbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! WebSocket client for the bridge process.
//!
//! One socket per session. A writer task drains queued request frames into
//! the socket; a reader task routes responses to their waiting callers by
//! request id and pushes events onto the session's event stream. When the
//! socket closes every pending request fails and a `Closed(ConnectionLost)`
//! event is emitted.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use dashmap::DashMap;
use futures::{Sink, SinkExt, Stream, StreamExt};
use statusbot_config::model::TransportConfig;
use statusbot_core::types::{
    ConnectionState, ConnectionUpdate, DisconnectReason, HealthStatus, InboundEvent, Jid,
    MediaRef, MessageId, MessageKey, OutboundMedia, SessionCredentials,
};
use statusbot_core::{PluginAdapter, StatusBotError, Transport, TransportConnector, TransportSession};
use tokio::sync::{mpsc, oneshot};
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::{Error as WsError, Message};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::wire::{self, DownloadData, Frame, Op, Request, Response, SentData};

const OUTBOUND_BUFFER: usize = 64;
const EVENT_BUFFER: usize = 256;

type Pending = Arc<DashMap<u64, oneshot::Sender<Response>>>;

/// Opens bridge sessions.
pub struct BridgeConnector {
    url: String,
    request_timeout: Duration,
}

impl BridgeConnector {
    pub fn new(url: impl Into<String>, request_timeout: Duration) -> Self {
        Self {
            url: url.into(),
            request_timeout,
        }
    }

    pub fn from_config(config: &TransportConfig) -> Self {
        Self::new(config.bridge_url.clone(), config.request_timeout())
    }
}

#[async_trait]
impl TransportConnector for BridgeConnector {
    async fn connect(
        &self,
        credentials: Option<SessionCredentials>,
    ) -> Result<TransportSession, StatusBotError> {
        let handshake = connect_async(self.url.as_str());
        let (stream, _response) = tokio::time::timeout(self.request_timeout, handshake)
            .await
            .map_err(|_| StatusBotError::Timeout {
                duration: self.request_timeout,
            })?
            .map_err(|e| StatusBotError::Transport {
                message: format!("failed to connect to bridge at {}", self.url),
                source: Some(Box::new(e)),
            })?;
        debug!(url = %self.url, "bridge socket open");

        let (sink, source) = stream.split();
        let (transport, events) = BridgeTransport::start(sink, source, self.request_timeout);
        transport.request(Op::Connect { credentials }).await?;

        Ok(TransportSession {
            transport: Arc::new(transport),
            events,
        })
    }
}

/// A [`Transport`] backed by one bridge socket.
pub struct BridgeTransport {
    outbound: mpsc::Sender<String>,
    pending: Pending,
    next_id: AtomicU64,
    request_timeout: Duration,
    closed: CancellationToken,
}

impl BridgeTransport {
    /// Spawns the socket tasks and returns the transport with its event stream.
    pub fn start<W, R>(
        sink: W,
        source: R,
        request_timeout: Duration,
    ) -> (Self, mpsc::Receiver<InboundEvent>)
    where
        W: Sink<Message, Error = WsError> + Unpin + Send + 'static,
        R: Stream<Item = Result<Message, WsError>> + Unpin + Send + 'static,
    {
        let (outbound, outbound_rx) = mpsc::channel(OUTBOUND_BUFFER);
        let (events_tx, events_rx) = mpsc::channel(EVENT_BUFFER);
        let pending: Pending = Arc::new(DashMap::new());
        let closed = CancellationToken::new();

        tokio::spawn(write_loop(sink, outbound_rx, closed.clone()));
        tokio::spawn(read_loop(source, pending.clone(), events_tx, closed.clone()));

        let transport = Self {
            outbound,
            pending,
            next_id: AtomicU64::new(1),
            request_timeout,
            closed,
        };
        (transport, events_rx)
    }

    /// Sends one request and waits for its response `data`.
    pub async fn request(&self, op: Op) -> Result<serde_json::Value, StatusBotError> {
        if self.closed.is_cancelled() {
            return Err(StatusBotError::transport("bridge connection closed"));
        }
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let op_name = op.name();
        let frame = serde_json::to_string(&Request { id, op })
            .map_err(|e| StatusBotError::Internal(format!("failed to encode {op_name}: {e}")))?;

        let (tx, rx) = oneshot::channel();
        self.pending.insert(id, tx);
        if self.outbound.send(frame).await.is_err() {
            self.pending.remove(&id);
            return Err(StatusBotError::transport("bridge connection closed"));
        }

        match tokio::time::timeout(self.request_timeout, rx).await {
            Ok(Ok(response)) => response.into_result(),
            Ok(Err(_)) => Err(StatusBotError::transport(format!(
                "bridge connection closed during {op_name}"
            ))),
            Err(_) => {
                self.pending.remove(&id);
                warn!(op = op_name, id, "bridge request timed out");
                Err(StatusBotError::Timeout {
                    duration: self.request_timeout,
                })
            }
        }
    }

    async fn request_sent(&self, op: Op) -> Result<MessageId, StatusBotError> {
        let data = self.request(op).await?;
        let sent: SentData = serde_json::from_value(data)
            .map_err(|e| StatusBotError::transport(format!("malformed bridge response: {e}")))?;
        Ok(sent.message_id)
    }
}

async fn write_loop<W>(mut sink: W, mut outbound: mpsc::Receiver<String>, closed: CancellationToken)
where
    W: Sink<Message, Error = WsError> + Unpin,
{
    loop {
        tokio::select! {
            _ = closed.cancelled() => break,
            frame = outbound.recv() => {
                let Some(frame) = frame else { break };
                if let Err(e) = sink.send(Message::Text(frame.into())).await {
                    warn!(error = %e, "bridge socket write failed");
                    closed.cancel();
                    break;
                }
            }
        }
    }
    let _ = sink.close().await;
}

async fn read_loop<R>(
    mut source: R,
    pending: Pending,
    events: mpsc::Sender<InboundEvent>,
    closed: CancellationToken,
) where
    R: Stream<Item = Result<Message, WsError>> + Unpin,
{
    loop {
        let message = tokio::select! {
            _ = closed.cancelled() => break,
            message = source.next() => message,
        };
        let text = match message {
            Some(Ok(Message::Text(text))) => text.as_str().to_owned(),
            Some(Ok(Message::Binary(bytes))) => match String::from_utf8(bytes.to_vec()) {
                Ok(text) => text,
                Err(_) => {
                    warn!("ignoring non-utf8 bridge frame");
                    continue;
                }
            },
            Some(Ok(Message::Close(_))) | None => {
                info!("bridge socket closed");
                break;
            }
            Some(Ok(_)) => continue,
            Some(Err(e)) => {
                warn!(error = %e, "bridge socket read failed");
                break;
            }
        };

        match serde_json::from_str::<Frame>(&text) {
            Ok(Frame::Response(response)) => match pending.remove(&response.id) {
                Some((_, waiter)) => {
                    let _ = waiter.send(response);
                }
                None => debug!(id = response.id, "response for unknown or expired request"),
            },
            Ok(Frame::Event(event)) => {
                if events.send(event.into_inbound()).await.is_err() {
                    debug!("event stream dropped, stopping reader");
                    break;
                }
            }
            Err(e) => warn!(error = %e, "invalid bridge frame"),
        }
    }

    closed.cancel();
    // Dropping the waiters fails every in-flight request.
    pending.clear();
    let _ = events.try_send(InboundEvent::ConnectionChange {
        update: ConnectionUpdate {
            state: Some(ConnectionState::Closed(DisconnectReason::ConnectionLost)),
            pairing: None,
        },
    });
}

#[async_trait]
impl PluginAdapter for BridgeTransport {
    fn name(&self) -> &str {
        "bridge"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    async fn health_check(&self) -> Result<HealthStatus, StatusBotError> {
        if self.closed.is_cancelled() {
            Ok(HealthStatus::Unhealthy("bridge connection closed".into()))
        } else {
            Ok(HealthStatus::Healthy)
        }
    }

    async fn shutdown(&self) -> Result<(), StatusBotError> {
        self.closed.cancel();
        Ok(())
    }
}

#[async_trait]
impl Transport for BridgeTransport {
    async fn send_text(&self, to: &Jid, text: &str) -> Result<MessageId, StatusBotError> {
        self.request_sent(Op::SendText {
            to: to.clone(),
            text: text.to_string(),
        })
        .await
    }

    async fn send_reaction(
        &self,
        to: &Jid,
        target: &MessageKey,
        emoji: &str,
    ) -> Result<(), StatusBotError> {
        self.request(Op::SendReaction {
            to: to.clone(),
            key: target.clone(),
            emoji: emoji.to_string(),
        })
        .await
        .map(|_| ())
    }

    async fn send_media(
        &self,
        to: &Jid,
        media: OutboundMedia,
    ) -> Result<MessageId, StatusBotError> {
        self.request_sent(Op::SendMedia {
            to: to.clone(),
            kind: media.kind,
            data: wire::encode_media(&media.data),
            caption: media.caption,
        })
        .await
    }

    async fn mark_read(&self, key: &MessageKey) -> Result<(), StatusBotError> {
        self.request(Op::MarkRead { key: key.clone() })
            .await
            .map(|_| ())
    }

    async fn download_media(&self, media: &MediaRef) -> Result<Vec<u8>, StatusBotError> {
        let data = self
            .request(Op::DownloadMedia {
                media: media.clone(),
            })
            .await
            .map_err(|e| match e {
                StatusBotError::Transport { message, source } => {
                    StatusBotError::Download { message, source }
                }
                other => other,
            })?;
        let download: DownloadData =
            serde_json::from_value(data).map_err(|e| StatusBotError::Download {
                message: "malformed download response".to_string(),
                source: Some(Box::new(e)),
            })?;
        wire::decode_media(&download.media)
    }
}
