// SPDX-FileCopyrightText: 2026 Statusbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for statusbot.
//!
//! Defines the event model delivered by the messaging transport, the error
//! taxonomy, and the traits for the external collaborators (transport,
//! pairing presenter, text styler).

pub mod error;
pub mod traits;
pub mod types;

pub use error::StatusBotError;
pub use types::{
    ChatMessage, ConnectionState, DisconnectReason, HealthStatus, InboundEvent, Jid, MediaKind,
    MessageId, MessageKey, SessionCredentials,
};

pub use traits::{
    PairingPresenter, PluginAdapter, TextStyler, Transport, TransportConnector, TransportSession,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_trait_modules_are_exported() {
        fn _assert_transport<T: Transport>() {}
        fn _assert_connector<T: TransportConnector>() {}
        fn _assert_presenter<T: PairingPresenter>() {}
        fn _assert_styler<T: TextStyler>() {}
        fn _assert_object_safe(_: &dyn Transport, _: &dyn TextStyler, _: &dyn PairingPresenter) {}
    }

    #[test]
    fn inbound_event_serialization_round_trips() {
        let event = InboundEvent::ConnectionChange {
            update: types::ConnectionUpdate {
                state: Some(ConnectionState::Closed(DisconnectReason::RestartRequired)),
                pairing: None,
            },
        };
        let json = serde_json::to_string(&event).expect("should serialize");
        let parsed: InboundEvent = serde_json::from_str(&json).expect("should deserialize");
        assert_eq!(event, parsed);
    }
}
