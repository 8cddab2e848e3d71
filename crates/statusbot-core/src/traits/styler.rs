// SPDX-FileCopyrightText: 2026 Statusbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Text decoration used for banners and headers in replies.

use crate::types::STYLE_NAMES;

/// Decorates text in a named style.
///
/// Unknown style names fall back to a default style instead of failing.
pub trait TextStyler: Send + Sync + 'static {
    fn style(&self, text: &str, style: &str) -> String;

    /// Valid style names, in display order.
    fn style_names(&self) -> &[&'static str] {
        STYLE_NAMES
    }

    fn is_known_style(&self, name: &str) -> bool {
        self.style_names().contains(&name)
    }
}
