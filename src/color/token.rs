use std::fmt;

use serde::{Deserialize, Serialize};

use crate::foundation::error::{PlotshotError, PlotshotResult};

/// Hex color string (`#rrggbb` or `#rrggbbaa`) as emitted into render configs.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColorToken(String);

impl ColorToken {
    /// Wrap a hex color string. No validation happens here; see [`ColorToken::to_rgba8`].
    pub fn new(hex: impl Into<String>) -> Self {
        Self(hex.into())
    }

    /// Borrow the hex string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Parse into straight (non-premultiplied) RGBA8.
    pub fn to_rgba8(&self) -> PlotshotResult<[u8; 4]> {
        parse_hex(&self.0).map_err(PlotshotError::render)
    }
}

impl fmt::Display for ColorToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ColorToken {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

fn parse_hex(s: &str) -> Result<[u8; 4], String> {
    let s = s.trim();
    let s = s.strip_prefix('#').unwrap_or(s);

    fn hex_byte(pair: &str) -> Result<u8, String> {
        u8::from_str_radix(pair, 16).map_err(|_| format!("invalid hex byte \"{pair}\""))
    }

    if !s.is_ascii() {
        return Err(format!("invalid hex color \"{s}\""));
    }

    match s.len() {
        3 => {
            // #rgb shorthand
            let expand = |i: usize| hex_byte(&s[i..i + 1].repeat(2));
            Ok([expand(0)?, expand(1)?, expand(2)?, 255])
        }
        6 => Ok([
            hex_byte(&s[0..2])?,
            hex_byte(&s[2..4])?,
            hex_byte(&s[4..6])?,
            255,
        ]),
        8 => Ok([
            hex_byte(&s[0..2])?,
            hex_byte(&s[2..4])?,
            hex_byte(&s[4..6])?,
            hex_byte(&s[6..8])?,
        ]),
        _ => Err(format!(
            "hex color must be #RGB, #RRGGBB or #RRGGBBAA, got \"#{s}\""
        )),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/color/token.rs"]
mod tests;
