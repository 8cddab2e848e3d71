// SPDX-FileCopyrightText: 2026 Statusbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Builders for the messages and events tests feed through the pipeline.

use statusbot_core::types::{
    ChatMessage, ConnectionState, ConnectionUpdate, DeliveryKind, DisconnectReason, InboundEvent,
    Jid, MediaKind, MediaRef, MessageId, MessageKey, MessagePayload, PairingChallenge,
    QuotedMessage, STATUS_BROADCAST, SessionCredentials,
};

/// Address of a user on the default server.
pub fn user_jid(user: &str) -> Jid {
    Jid::new(format!("{user}@s.whatsapp.net"))
}

/// A direct text message from `sender` (user part only).
pub fn text_message(sender: &str, text: &str) -> ChatMessage {
    ChatMessage {
        key: MessageKey {
            remote_jid: user_jid(sender),
            id: MessageId(format!("msg-{}", uuid::Uuid::new_v4())),
            from_me: false,
            participant: None,
        },
        payload: MessagePayload::Text { text: text.into() },
        quoted: None,
        push_name: None,
        timestamp: 1_700_000_000,
        delivery: DeliveryKind::Notify,
    }
}

/// A text message replying to `quoted`.
pub fn quoting(sender: &str, text: &str, quoted: QuotedMessage) -> ChatMessage {
    ChatMessage {
        quoted: Some(quoted),
        ..text_message(sender, text)
    }
}

/// A media status posted by `author`.
pub fn media_status(id: &str, author: &str, kind: MediaKind) -> ChatMessage {
    ChatMessage {
        key: MessageKey {
            remote_jid: Jid::new(STATUS_BROADCAST),
            id: MessageId(id.into()),
            from_me: false,
            participant: Some(user_jid(author)),
        },
        payload: MessagePayload::Media(media_ref(kind)),
        quoted: None,
        push_name: None,
        timestamp: 1_700_000_000,
        delivery: DeliveryKind::Notify,
    }
}

pub fn media_ref(kind: MediaKind) -> MediaRef {
    MediaRef {
        kind,
        handle: serde_json::json!({"direct_path": "/mock/path"}),
        mime_type: None,
        caption: None,
    }
}

/// Quote context pointing at a status, with or without the inline payload.
pub fn status_quote(id: &str, kind: MediaKind, inline: bool) -> QuotedMessage {
    QuotedMessage {
        id: MessageId(id.into()),
        author: Some(Jid::new(STATUS_BROADCAST)),
        payload: inline.then(|| MessagePayload::Media(media_ref(kind))),
    }
}

/// Quote context pointing at an ordinary chat message.
pub fn chat_quote(id: &str, author: &str) -> QuotedMessage {
    QuotedMessage {
        id: MessageId(id.into()),
        author: Some(user_jid(author)),
        payload: Some(MessagePayload::Text {
            text: "just a message".into(),
        }),
    }
}

pub fn connection(state: ConnectionState) -> InboundEvent {
    InboundEvent::ConnectionChange {
        update: ConnectionUpdate {
            state: Some(state),
            pairing: None,
        },
    }
}

pub fn open() -> InboundEvent {
    connection(ConnectionState::Open)
}

pub fn closed(reason: DisconnectReason) -> InboundEvent {
    connection(ConnectionState::Closed(reason))
}

pub fn qr_challenge(payload: &str) -> InboundEvent {
    InboundEvent::ConnectionChange {
        update: ConnectionUpdate {
            state: None,
            pairing: Some(PairingChallenge::QrCode(payload.into())),
        },
    }
}

pub fn credentials_changed(counter: u64) -> InboundEvent {
    InboundEvent::CredentialsChanged {
        credentials: SessionCredentials {
            registered: true,
            material: serde_json::json!({"counter": counter}),
        },
    }
}

pub fn status_event(message: ChatMessage) -> InboundEvent {
    InboundEvent::StatusUpdate { message }
}

pub fn chat_event(message: ChatMessage) -> InboundEvent {
    InboundEvent::ChatMessage { message }
}
