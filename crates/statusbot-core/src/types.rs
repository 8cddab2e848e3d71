// SPDX-FileCopyrightText: 2026 Statusbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Event model and common types shared by the transport, store, and agent crates.

use std::fmt;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Chat identifier of the network-wide status broadcast list.
pub const STATUS_BROADCAST: &str = "status@broadcast";

/// Style names understood by the text styler, in menu order.
pub const STYLE_NAMES: &[&str] = &[
    "Standard",
    "Big",
    "Slant",
    "Small",
    "Block",
    "Lean",
    "Shadow",
    "Digital",
    "Graffiti",
    "ANSI Shadow",
    "Doom",
    "Small Slant",
    "Sub-Zero",
    "Star Wars",
    "Script",
];

/// Style used when a requested style name is unknown.
pub const DEFAULT_STYLE: &str = "Standard";

/// Network address of a user, group, or broadcast list (`<user>@<server>`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Jid(pub String);

impl Jid {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// The user part: everything before `@`, with any `:device` suffix removed.
    pub fn user(&self) -> &str {
        let local = self.0.split('@').next().unwrap_or_default();
        local.split(':').next().unwrap_or_default()
    }

    pub fn is_status_broadcast(&self) -> bool {
        self.0 == STATUS_BROADCAST
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Jid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Unique identifier for a message.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(pub String);

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Full address of a delivered message.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageKey {
    /// Chat the message belongs to.
    pub remote_jid: Jid,
    pub id: MessageId,
    #[serde(default)]
    pub from_me: bool,
    /// Author inside a group or broadcast chat.
    #[serde(default)]
    pub participant: Option<Jid>,
}

/// Media categories the vault recognizes.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
    Audio,
}

impl MediaKind {
    /// File extension (with leading dot) used when saving this kind.
    pub fn extension(self) -> &'static str {
        match self {
            MediaKind::Image => ".jpg",
            MediaKind::Video => ".mp4",
            MediaKind::Audio => ".mp3",
        }
    }

    /// Inverse of [`extension`](Self::extension), for file names on disk.
    pub fn from_file_name(name: &str) -> Option<Self> {
        [MediaKind::Image, MediaKind::Video, MediaKind::Audio]
            .into_iter()
            .find(|kind| name.ends_with(kind.extension()))
    }
}

/// Opaque reference to downloadable media, understood by the transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaRef {
    pub kind: MediaKind,
    /// Transport-specific handle (direct path, media key, etc.).
    pub handle: serde_json::Value,
    #[serde(default)]
    pub mime_type: Option<String>,
    #[serde(default)]
    pub caption: Option<String>,
}

/// Payload variants carried by chat and status messages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MessagePayload {
    Text { text: String },
    Media(MediaRef),
    Reaction { target: MessageId, emoji: String },
}

impl MessagePayload {
    /// Text body, or a media caption when present.
    pub fn text(&self) -> Option<&str> {
        match self {
            MessagePayload::Text { text } => Some(text),
            MessagePayload::Media(media) => media.caption.as_deref(),
            MessagePayload::Reaction { .. } => None,
        }
    }

    pub fn media(&self) -> Option<&MediaRef> {
        match self {
            MessagePayload::Media(media) => Some(media),
            _ => None,
        }
    }
}

/// The message a chat message replies to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotedMessage {
    pub id: MessageId,
    /// Author field of the quote context. Status quotes carry the broadcast marker here.
    #[serde(default)]
    pub author: Option<Jid>,
    /// Inline copy of the quoted payload, when the network sent one.
    #[serde(default)]
    pub payload: Option<MessagePayload>,
}

impl QuotedMessage {
    /// A quote targets a status only when its author carries the broadcast marker.
    pub fn is_status(&self) -> bool {
        self.author
            .as_ref()
            .is_some_and(|author| author.as_str().contains(STATUS_BROADCAST))
    }
}

/// How a batch of messages reached the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryKind {
    /// Newly arrived message.
    #[default]
    Notify,
    /// History sync or re-append of an older message.
    Append,
}

/// A chat or status message delivered by the transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub key: MessageKey,
    pub payload: MessagePayload,
    #[serde(default)]
    pub quoted: Option<QuotedMessage>,
    #[serde(default)]
    pub push_name: Option<String>,
    /// Unix timestamp in seconds.
    #[serde(default)]
    pub timestamp: i64,
    #[serde(default)]
    pub delivery: DeliveryKind,
}

impl ChatMessage {
    /// Identity of whoever sent the message: the participant in groups and
    /// broadcasts, otherwise the chat itself.
    pub fn sender(&self) -> &Jid {
        self.key.participant.as_ref().unwrap_or(&self.key.remote_jid)
    }

    /// Chat to which replies are addressed.
    pub fn chat(&self) -> &Jid {
        &self.key.remote_jid
    }

    pub fn text(&self) -> Option<&str> {
        self.payload.text()
    }
}

/// Why a connection closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisconnectReason {
    LoggedOut,
    ConnectionClosed,
    ConnectionLost,
    ConnectionReplaced,
    MultideviceMismatch,
    BadSession,
    RestartRequired,
    Unknown(u16),
}

impl DisconnectReason {
    /// Maps the network's numeric close codes onto reasons.
    pub fn from_status_code(code: u16) -> Self {
        match code {
            401 => Self::LoggedOut,
            408 => Self::ConnectionLost,
            411 => Self::MultideviceMismatch,
            428 => Self::ConnectionClosed,
            440 => Self::ConnectionReplaced,
            500 => Self::BadSession,
            515 => Self::RestartRequired,
            other => Self::Unknown(other),
        }
    }

    /// Every reason except a remote logout warrants a reconnect.
    pub fn is_retriable(self) -> bool {
        self != Self::LoggedOut
    }
}

/// Lifecycle state of one transport connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "reason", rename_all = "snake_case")]
pub enum ConnectionState {
    Connecting,
    Open,
    Closed(DisconnectReason),
}

/// Pairing prompt issued while the session is not yet registered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "payload", rename_all = "snake_case")]
pub enum PairingChallenge {
    QrCode(String),
    PairingCode(String),
}

/// A connection lifecycle update. Either field may be absent.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ConnectionUpdate {
    #[serde(default)]
    pub state: Option<ConnectionState>,
    #[serde(default)]
    pub pairing: Option<PairingChallenge>,
}

/// Key material that lets the client reconnect without pairing again.
///
/// The contents are opaque to everything but the transport.
#[derive(Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SessionCredentials {
    #[serde(default)]
    pub registered: bool,
    #[serde(default)]
    pub material: serde_json::Value,
}

impl fmt::Debug for SessionCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionCredentials")
            .field("registered", &self.registered)
            .field("material", &"[REDACTED]")
            .finish()
    }
}

/// Everything the transport can deliver on its event stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum InboundEvent {
    StatusUpdate { message: ChatMessage },
    ChatMessage { message: ChatMessage },
    ConnectionChange { update: ConnectionUpdate },
    CredentialsChanged { credentials: SessionCredentials },
}

impl InboundEvent {
    /// Classifies a delivered message: anything in the broadcast chat is a status.
    pub fn from_message(message: ChatMessage) -> Self {
        if message.key.remote_jid.is_status_broadcast() {
            InboundEvent::StatusUpdate { message }
        } else {
            InboundEvent::ChatMessage { message }
        }
    }
}

/// Media to send back to a chat.
#[derive(Debug, Clone)]
pub struct OutboundMedia {
    pub kind: MediaKind,
    pub data: Vec<u8>,
    pub caption: Option<String>,
}

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_message(remote: &str, participant: Option<&str>) -> ChatMessage {
        ChatMessage {
            key: MessageKey {
                remote_jid: Jid::new(remote),
                id: MessageId("ABC".into()),
                from_me: false,
                participant: participant.map(Jid::new),
            },
            payload: MessagePayload::Text { text: "hi".into() },
            quoted: None,
            push_name: None,
            timestamp: 0,
            delivery: DeliveryKind::Notify,
        }
    }

    #[test]
    fn jid_user_strips_server_and_device() {
        assert_eq!(Jid::new("111@s.whatsapp.net").user(), "111");
        assert_eq!(Jid::new("111:7@s.whatsapp.net").user(), "111");
        assert_eq!(Jid::new("bare").user(), "bare");
    }

    #[test]
    fn media_kind_extensions_round_trip() {
        for kind in [MediaKind::Image, MediaKind::Video, MediaKind::Audio] {
            let name = format!("status_1{}", kind.extension());
            assert_eq!(MediaKind::from_file_name(&name), Some(kind));
        }
        assert_eq!(MediaKind::from_file_name("notes.txt"), None);
    }

    #[test]
    fn quote_is_status_only_with_broadcast_author() {
        let mut quote = QuotedMessage {
            id: MessageId("Q".into()),
            author: Some(Jid::new(STATUS_BROADCAST)),
            payload: None,
        };
        assert!(quote.is_status());

        quote.author = Some(Jid::new("222@s.whatsapp.net"));
        assert!(!quote.is_status());

        quote.author = None;
        assert!(!quote.is_status());
    }

    #[test]
    fn disconnect_codes_map_to_reasons() {
        assert_eq!(DisconnectReason::from_status_code(401), DisconnectReason::LoggedOut);
        assert_eq!(
            DisconnectReason::from_status_code(515),
            DisconnectReason::RestartRequired
        );
        assert_eq!(
            DisconnectReason::from_status_code(999),
            DisconnectReason::Unknown(999)
        );
        assert!(!DisconnectReason::LoggedOut.is_retriable());
        assert!(DisconnectReason::ConnectionReplaced.is_retriable());
    }

    #[test]
    fn messages_in_broadcast_chat_are_status_updates() {
        let status = text_message(STATUS_BROADCAST, Some("222@s.whatsapp.net"));
        assert!(matches!(
            InboundEvent::from_message(status),
            InboundEvent::StatusUpdate { .. }
        ));

        let chat = text_message("111@s.whatsapp.net", None);
        assert!(matches!(
            InboundEvent::from_message(chat),
            InboundEvent::ChatMessage { .. }
        ));
    }

    #[test]
    fn sender_prefers_participant() {
        let group = text_message("123-456@g.us", Some("111@s.whatsapp.net"));
        assert_eq!(group.sender().user(), "111");
        assert_eq!(group.chat().as_str(), "123-456@g.us");

        let direct = text_message("222@s.whatsapp.net", None);
        assert_eq!(direct.sender().user(), "222");
    }

    #[test]
    fn credentials_debug_redacts_material() {
        let creds = SessionCredentials {
            registered: true,
            material: serde_json::json!({"noise_key": "secret"}),
        };
        let rendered = format!("{creds:?}");
        assert!(rendered.contains("REDACTED"));
        assert!(!rendered.contains("secret"));
    }

    #[test]
    fn style_names_contain_default() {
        assert!(STYLE_NAMES.contains(&DEFAULT_STYLE));
        assert_eq!(STYLE_NAMES.len(), 15);
    }

    proptest::proptest! {
        #[test]
        fn jid_user_never_contains_separators(raw in "[a-z0-9:@.]{0,24}") {
            let jid = Jid::new(raw);
            let user = jid.user();
            proptest::prop_assert!(!user.contains('@'));
            proptest::prop_assert!(!user.contains(':'));
        }
    }
}
