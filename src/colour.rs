use crate::error::PlaceholderError;
use std::str::FromStr;

/// A straight (non-premultiplied) RGBA colour with 8 bits per channel
#[derive(Copy, Clone, PartialEq, Eq, Debug, Hash)]
pub struct Colour {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Colour {
    /// Create a new, fully opaque colour. r, g, and b range from 0 to 255
    pub const fn new_rgb_bytes(r: u8, g: u8, b: u8) -> Colour {
        Colour { r, g, b, a: 255 }
    }

    /// Create a new colour with an explicit alpha channel
    pub const fn new_rgba_bytes(r: u8, g: u8, b: u8, a: u8) -> Colour {
        Colour { r, g, b, a }
    }

    /// Create a new grey colour, g ranges from 0 to 255
    pub const fn new_grey_bytes(g: u8) -> Colour {
        Colour::new_rgb_bytes(g, g, g)
    }

    /// Parse a colour string. Accepts `#RRGGBB`, `#RRGGBBAA` and `rgb(r,g,b)`.
    /// Surrounding whitespace is ignored.
    pub fn parse(s: &str) -> Result<Colour, PlaceholderError> {
        let trimmed = s.trim();
        let invalid = || PlaceholderError::InvalidColour(s.to_string());

        if let Some(hex) = trimmed.strip_prefix('#') {
            parse_hex(hex).ok_or_else(invalid)
        } else if let Some(args) = trimmed
            .strip_prefix("rgb(")
            .and_then(|rest| rest.strip_suffix(')'))
        {
            parse_rgb_args(args).ok_or_else(invalid)
        } else {
            Err(invalid())
        }
    }
}

fn parse_hex(hex: &str) -> Option<Colour> {
    if !hex.is_ascii() || !(hex.len() == 6 || hex.len() == 8) {
        return None;
    }

    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    let alpha = if hex.len() == 8 { channel(6)? } else { 255 };
    Some(Colour::new_rgba_bytes(channel(0)?, channel(2)?, channel(4)?, alpha))
}

fn parse_rgb_args(args: &str) -> Option<Colour> {
    let mut parts = args.split(',').map(|part| part.trim().parse::<u8>());
    let r = parts.next()?.ok()?;
    let g = parts.next()?.ok()?;
    let b = parts.next()?.ok()?;
    if parts.next().is_some() {
        return None;
    }
    Some(Colour::new_rgb_bytes(r, g, b))
}

impl FromStr for Colour {
    type Err = PlaceholderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Colour::parse(s)
    }
}

impl From<(u8, u8, u8)> for Colour {
    fn from(c: (u8, u8, u8)) -> Self {
        Colour::new_rgb_bytes(c.0, c.1, c.2)
    }
}

impl From<[u8; 4]> for Colour {
    fn from(c: [u8; 4]) -> Self {
        let [r, g, b, a] = c;
        Colour { r, g, b, a }
    }
}

impl From<Colour> for image::Rgba<u8> {
    fn from(c: Colour) -> Self {
        image::Rgba([c.r, c.g, c.b, c.a])
    }
}

/// A list of pre-defined colour constants
pub mod colours {
    use super::*;

    pub const BLACK: Colour = Colour::new_grey_bytes(0);
    pub const WHITE: Colour = Colour::new_grey_bytes(255);
    pub const RED: Colour = Colour::new_rgb_bytes(255, 0, 0);
    pub const BLUE: Colour = Colour::new_rgb_bytes(0, 0, 255);
    pub const TRANSPARENT: Colour = Colour::new_rgba_bytes(0, 0, 0, 0);
}
