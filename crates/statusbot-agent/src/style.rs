// SPDX-FileCopyrightText: 2026 Statusbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Built-in text styler.
//!
//! Each style name maps onto one of the Unicode letterlike alphabets
//! (mathematical bold, double-struck, circled, fullwidth, ...). Characters
//! without a counterpart in the chosen alphabet pass through unchanged.

use statusbot_core::TextStyler;
use statusbot_core::types::DEFAULT_STYLE;

/// A Unicode alphabet laid out as contiguous code point runs.
#[derive(Debug, Clone, Copy)]
struct Alphabet {
    upper: Option<u32>,
    /// `None` folds lowercase onto the uppercase run.
    lower: Option<u32>,
    digits: Option<u32>,
    /// Letters whose slot in the run is reserved and lives elsewhere.
    holes: &'static [(char, char)],
}

impl Alphabet {
    const fn new(upper: u32, lower: u32, digits: Option<u32>) -> Self {
        Self {
            upper: Some(upper),
            lower: Some(lower),
            digits,
            holes: &[],
        }
    }

    fn map(&self, c: char) -> char {
        if let Some(&(_, replacement)) = self.holes.iter().find(|(from, _)| *from == c) {
            return replacement;
        }
        let shifted = match c {
            'A'..='Z' => self.upper.map(|base| base + (c as u32 - 'A' as u32)),
            'a'..='z' => match self.lower {
                Some(base) => Some(base + (c as u32 - 'a' as u32)),
                None => self.upper.map(|base| base + (c as u32 - 'a' as u32)),
            },
            '0'..='9' => self.digits.map(|base| base + (c as u32 - '0' as u32)),
            _ => None,
        };
        shifted.and_then(char::from_u32).unwrap_or(c)
    }
}

const BOLD: Alphabet = Alphabet::new(0x1D400, 0x1D41A, Some(0x1D7CE));
const ITALIC: Alphabet = Alphabet {
    holes: &[('h', '\u{210E}')],
    ..Alphabet::new(0x1D434, 0x1D44E, None)
};
const BOLD_ITALIC: Alphabet = Alphabet::new(0x1D468, 0x1D482, Some(0x1D7CE));
const BOLD_SCRIPT: Alphabet = Alphabet::new(0x1D4D0, 0x1D4EA, None);
const BOLD_FRAKTUR: Alphabet = Alphabet::new(0x1D56C, 0x1D586, None);
const DOUBLE_STRUCK: Alphabet = Alphabet {
    holes: &[
        ('C', '\u{2102}'),
        ('H', '\u{210D}'),
        ('N', '\u{2115}'),
        ('P', '\u{2119}'),
        ('Q', '\u{211A}'),
        ('R', '\u{211D}'),
        ('Z', '\u{2124}'),
    ],
    ..Alphabet::new(0x1D538, 0x1D552, Some(0x1D7D8))
};
const SANS_ITALIC: Alphabet = Alphabet::new(0x1D608, 0x1D622, Some(0x1D7E2));
const SANS_BOLD_ITALIC: Alphabet = Alphabet::new(0x1D63C, 0x1D656, Some(0x1D7EC));
const MONOSPACE: Alphabet = Alphabet::new(0x1D670, 0x1D68A, Some(0x1D7F6));
const FULLWIDTH: Alphabet = Alphabet::new(0xFF21, 0xFF41, Some(0xFF10));
const SQUARED: Alphabet = Alphabet {
    upper: Some(0x1F130),
    lower: None,
    digits: None,
    holes: &[],
};
const NEGATIVE_SQUARED: Alphabet = Alphabet {
    upper: Some(0x1F170),
    lower: None,
    digits: None,
    holes: &[],
};

const SMALL_CAPS: &[char] = &[
    'ᴀ', 'ʙ', 'ᴄ', 'ᴅ', 'ᴇ', 'ꜰ', 'ɢ', 'ʜ', 'ɪ', 'ᴊ', 'ᴋ', 'ʟ', 'ᴍ', 'ɴ', 'ᴏ', 'ᴘ', 'ǫ', 'ʀ', 'ꜱ',
    'ᴛ', 'ᴜ', 'ᴠ', 'ᴡ', 'x', 'ʏ', 'ᴢ',
];

#[derive(Debug, Clone, Copy)]
enum Glyphs {
    Plain,
    Alphabet(Alphabet),
    SmallCaps,
    Circled,
}

impl Glyphs {
    fn for_style(name: &str) -> Self {
        match name {
            "Big" => Glyphs::Alphabet(BOLD),
            "Slant" => Glyphs::Alphabet(ITALIC),
            "Small" => Glyphs::SmallCaps,
            "Block" => Glyphs::Alphabet(SQUARED),
            "Lean" => Glyphs::Alphabet(SANS_ITALIC),
            "Shadow" => Glyphs::Alphabet(BOLD_ITALIC),
            "Digital" => Glyphs::Alphabet(MONOSPACE),
            "Graffiti" => Glyphs::Alphabet(BOLD_FRAKTUR),
            "ANSI Shadow" => Glyphs::Alphabet(NEGATIVE_SQUARED),
            "Doom" => Glyphs::Alphabet(DOUBLE_STRUCK),
            "Small Slant" => Glyphs::Alphabet(SANS_BOLD_ITALIC),
            "Sub-Zero" => Glyphs::Circled,
            "Star Wars" => Glyphs::Alphabet(FULLWIDTH),
            "Script" => Glyphs::Alphabet(BOLD_SCRIPT),
            _ => Glyphs::Plain,
        }
    }

    fn map(self, c: char) -> char {
        match self {
            Glyphs::Plain => c,
            Glyphs::Alphabet(alphabet) => alphabet.map(c),
            Glyphs::SmallCaps => match c {
                'a'..='z' => SMALL_CAPS[(c as u8 - b'a') as usize],
                _ => c,
            },
            Glyphs::Circled => {
                let code = match c {
                    'A'..='Z' => Some(0x24B6 + (c as u32 - 'A' as u32)),
                    'a'..='z' => Some(0x24D0 + (c as u32 - 'a' as u32)),
                    '0' => Some(0x24EA),
                    '1'..='9' => Some(0x2460 + (c as u32 - '1' as u32)),
                    _ => None,
                };
                code.and_then(char::from_u32).unwrap_or(c)
            }
        }
    }
}

/// Styler over the fixed style set. Unknown names render as the default style.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnicodeStyler;

impl TextStyler for UnicodeStyler {
    fn style(&self, text: &str, style: &str) -> String {
        let name = if self.is_known_style(style) {
            style
        } else {
            DEFAULT_STYLE
        };
        let glyphs = Glyphs::for_style(name);
        text.chars().map(|c| glyphs.map(c)).collect()
    }
}
