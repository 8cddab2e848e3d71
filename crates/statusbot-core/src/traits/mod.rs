// SPDX-FileCopyrightText: 2026 Statusbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Traits for the collaborators the agent drives but does not implement.
//!
//! Async adapters use `#[async_trait]` for dynamic dispatch compatibility.

pub mod adapter;
pub mod presenter;
pub mod styler;
pub mod transport;

pub use adapter::PluginAdapter;
pub use presenter::PairingPresenter;
pub use styler::TextStyler;
pub use transport::{Transport, TransportConnector, TransportSession};
