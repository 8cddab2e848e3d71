// SPDX-FileCopyrightText: 2026 Statusbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Presentation of pairing challenges to whoever operates the client.

use crate::types::PairingChallenge;

/// Shows a pairing challenge (QR payload or pairing code). Fire-and-forget.
pub trait PairingPresenter: Send + Sync + 'static {
    fn render_pairing_challenge(&self, challenge: &PairingChallenge);
}
