// SPDX-FileCopyrightText: 2026 Statusbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Transport adapter for statusbot.
//!
//! Speaks JSON over a WebSocket to a bridge process that owns the
//! messaging-network session and wire protocol.

pub mod client;
pub mod presenter;
pub mod wire;

pub use client::{BridgeConnector, BridgeTransport};
pub use presenter::TerminalPresenter;
