// SPDX-FileCopyrightText: 2026 Statusbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Terminal rendering of pairing challenges.

use qrcode::QrCode;
use qrcode::render::unicode::Dense1x2;
use qrcode::types::QrError;
use statusbot_core::PairingPresenter;
use statusbot_core::types::PairingChallenge;
use tracing::warn;

/// Prints pairing challenges to stdout: QR payloads as a Unicode QR code,
/// pairing codes as plain text.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalPresenter;

impl PairingPresenter for TerminalPresenter {
    fn render_pairing_challenge(&self, challenge: &PairingChallenge) {
        match challenge {
            PairingChallenge::QrCode(payload) => match render_qr(payload) {
                Ok(art) => println!("Scan this QR code from a linked device:\n{art}"),
                Err(e) => {
                    warn!(error = %e, "failed to render pairing QR code");
                    println!("QR payload: {payload}");
                }
            },
            PairingChallenge::PairingCode(code) => println!("Pairing code: {code}"),
        }
    }
}

/// Renders `payload` as a block-character QR code with a quiet zone.
pub fn render_qr(payload: &str) -> Result<String, QrError> {
    let code = QrCode::new(payload.as_bytes())?;
    Ok(code.render::<Dense1x2>().quiet_zone(true).build())
}
