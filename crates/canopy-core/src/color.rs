use serde::{Deserialize, Serialize};

use crate::rng::XorShift32;

/// An RGBA color with byte channels and a fractional alpha.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Rgba {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Parse a hex color string, with or without a leading `#`.
    ///
    /// Accepts both two-digit (`#e1e1e1`) and one-digit (`#abc`)
    /// channels. A one-digit channel is parsed as its literal value,
    /// not duplicated the way CSS shorthand is.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        let width = match digits.len() {
            3 => 1,
            6 => 2,
            _ => return None,
        };
        let channel = |i: usize| u8::from_str_radix(&digits[i * width..(i + 1) * width], 16).ok();
        Some(Self::rgb(channel(0)?, channel(1)?, channel(2)?))
    }

    /// Format as a css `rgba(...)` string for the draw surface.
    pub fn to_css(&self) -> String {
        format!("rgba({},{},{},{})", self.r, self.g, self.b, self.a)
    }

    /// A random fully-opaque color.
    pub fn random(rng: &mut XorShift32) -> Self {
        Self::rgb(
            rng.int_in(0, 255) as u8,
            rng.int_in(0, 255) as u8,
            rng.int_in(0, 255) as u8,
        )
    }
}
