// SPDX-FileCopyrightText: 2026 Statusbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for statusbot integration tests.
//!
//! # Components
//!
//! - [`MockTransport`] - transport that records outbound calls
//! - [`MockConnector`] - connector that hands out scripted sessions
//! - [`fixtures`] - message and event builders

pub mod fixtures;
pub mod mock_connector;
pub mod mock_transport;

pub use mock_connector::{MockConnector, SessionScript};
pub use mock_transport::{MockTransport, SentItem};
