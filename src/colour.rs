use crate::HandwritingError;
use std::fmt;

/// An 8-bit RGB colour, as stored in settings documents (`#rrggbb`)
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub struct Colour {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Colour {
    /// Create a new colour; r, g, and b range from 0 to 255
    pub const fn new_rgb_bytes(r: u8, g: u8, b: u8) -> Colour {
        Colour { r, g, b }
    }

    /// Parse a `#rrggbb` (or `rrggbb`) hex string
    pub fn from_hex(hex: &str) -> Result<Colour, HandwritingError> {
        let digits = hex.trim().trim_start_matches('#');
        if digits.len() != 6 || !digits.is_ascii() {
            return Err(HandwritingError::InvalidColour(hex.to_string()));
        }

        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&digits[range], 16)
                .map_err(|_| HandwritingError::InvalidColour(hex.to_string()))
        };

        Ok(Colour {
            r: channel(0..2)?,
            g: channel(2..4)?,
            b: channel(4..6)?,
        })
    }

    /// Lower-case `#rrggbb` representation
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    pub(crate) fn to_rgba(self, alpha: u8) -> image::Rgba<u8> {
        image::Rgba([self.r, self.g, self.b, alpha])
    }
}

impl fmt::Display for Colour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Convert an opacity in `[0, 1]` to an 8-bit alpha channel. Out of range values are clamped.
pub fn opacity_to_alpha(opacity: f32) -> u8 {
    if opacity.is_nan() {
        return u8::MAX;
    }
    (opacity.clamp(0.0, 1.0) * 255.0) as u8
}

/// A list of pre-defined colour constants
pub mod colours {
    use super::*;

    pub const BLACK: Colour = Colour::new_rgb_bytes(0, 0, 0);
    pub const WHITE: Colour = Colour::new_rgb_bytes(255, 255, 255);
    /// Off-white paper tone used when no background colour is configured
    pub const PAPER: Colour = Colour::new_rgb_bytes(0xfa, 0xf9, 0xde);
}
