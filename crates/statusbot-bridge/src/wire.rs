// SPDX-FileCopyrightText: 2026 Statusbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! JSON frames exchanged with the bridge process.
//!
//! Client -> bridge:
//! ```json
//! {"id": 7, "op": "send_text", "to": "123@s.whatsapp.net", "text": "hi"}
//! ```
//!
//! Bridge -> client:
//! ```json
//! {"type": "response", "id": 7, "ok": true, "data": {"message_id": "ABC"}}
//! {"type": "event", "event": "connection_update", "connection": "close", "status_code": 401}
//! {"type": "event", "event": "credentials_update", "credentials": {...}}
//! {"type": "event", "event": "message", "message": {...}}
//! ```

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::{Deserialize, Serialize};
use statusbot_core::StatusBotError;
use statusbot_core::types::{
    ChatMessage, ConnectionState, ConnectionUpdate, DisconnectReason, InboundEvent, Jid,
    MediaKind, MediaRef, MessageId, MessageKey, PairingChallenge, SessionCredentials,
};

/// A request frame. `op` and its fields are flattened into the top level.
#[derive(Debug, Serialize)]
pub struct Request {
    pub id: u64,
    #[serde(flatten)]
    pub op: Op,
}

/// Operations the bridge performs on our behalf.
#[derive(Debug, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Op {
    Connect {
        credentials: Option<SessionCredentials>,
    },
    SendText {
        to: Jid,
        text: String,
    },
    SendReaction {
        to: Jid,
        key: MessageKey,
        emoji: String,
    },
    SendMedia {
        to: Jid,
        kind: MediaKind,
        /// Base64 of the media bytes.
        data: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        caption: Option<String>,
    },
    MarkRead {
        key: MessageKey,
    },
    DownloadMedia {
        media: MediaRef,
    },
}

impl Op {
    pub fn name(&self) -> &'static str {
        match self {
            Op::Connect { .. } => "connect",
            Op::SendText { .. } => "send_text",
            Op::SendReaction { .. } => "send_reaction",
            Op::SendMedia { .. } => "send_media",
            Op::MarkRead { .. } => "mark_read",
            Op::DownloadMedia { .. } => "download_media",
        }
    }
}

/// Any frame the bridge sends.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Frame {
    Response(Response),
    Event(BridgeEvent),
}

#[derive(Debug, Deserialize)]
pub struct Response {
    pub id: u64,
    pub ok: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub data: serde_json::Value,
}

impl Response {
    /// The `data` payload on success, the bridge's error text otherwise.
    pub fn into_result(self) -> Result<serde_json::Value, StatusBotError> {
        if self.ok {
            Ok(self.data)
        } else {
            Err(StatusBotError::transport(
                self.error
                    .unwrap_or_else(|| "bridge request failed".to_string()),
            ))
        }
    }
}

/// Connection phase as the bridge reports it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Connecting,
    Open,
    Close,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum BridgeEvent {
    ConnectionUpdate {
        #[serde(default)]
        connection: Option<Phase>,
        #[serde(default)]
        status_code: Option<u16>,
        #[serde(default)]
        qr: Option<String>,
        #[serde(default)]
        pairing_code: Option<String>,
    },
    CredentialsUpdate {
        credentials: SessionCredentials,
    },
    Message {
        message: ChatMessage,
    },
}

impl BridgeEvent {
    pub fn into_inbound(self) -> InboundEvent {
        match self {
            BridgeEvent::ConnectionUpdate {
                connection,
                status_code,
                qr,
                pairing_code,
            } => {
                let state = connection.map(|phase| match phase {
                    Phase::Connecting => ConnectionState::Connecting,
                    Phase::Open => ConnectionState::Open,
                    Phase::Close => ConnectionState::Closed(
                        status_code
                            .map(DisconnectReason::from_status_code)
                            .unwrap_or(DisconnectReason::ConnectionLost),
                    ),
                });
                let pairing = qr
                    .map(PairingChallenge::QrCode)
                    .or(pairing_code.map(PairingChallenge::PairingCode));
                InboundEvent::ConnectionChange {
                    update: ConnectionUpdate { state, pairing },
                }
            }
            BridgeEvent::CredentialsUpdate { credentials } => {
                InboundEvent::CredentialsChanged { credentials }
            }
            BridgeEvent::Message { message } => InboundEvent::from_message(message),
        }
    }
}

/// `data` of a successful `send_text` / `send_media` response.
#[derive(Debug, Deserialize)]
pub struct SentData {
    pub message_id: MessageId,
}

/// `data` of a successful `download_media` response.
#[derive(Debug, Deserialize)]
pub struct DownloadData {
    /// Base64 of the decrypted media bytes.
    pub media: String,
}

pub fn encode_media(data: &[u8]) -> String {
    BASE64.encode(data)
}

pub fn decode_media(encoded: &str) -> Result<Vec<u8>, StatusBotError> {
    BASE64.decode(encoded).map_err(|e| StatusBotError::Download {
        message: "bridge returned invalid base64 media".to_string(),
        source: Some(Box::new(e)),
    })
}
