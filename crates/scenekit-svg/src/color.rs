//! Packed RGBA colors and color-string parsing.

use std::fmt;

/// Color packed as `0xRRGGBBAA`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Color(pub u32);

/// A color split into its four channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color(0x0000_00FF);
    pub const WHITE: Color = Color(0xFFFF_FFFF);
    pub const TRANSPARENT: Color = Color(0x0000_0000);

    pub const fn from_rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Color((r as u32) << 24 | (g as u32) << 16 | (b as u32) << 8 | a as u32)
    }

    pub const fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self::from_rgba(r, g, b, 0xFF)
    }

    /// Split into channels.
    pub const fn channels(self) -> Rgba {
        Rgba {
            r: (self.0 >> 24) as u8,
            g: (self.0 >> 16) as u8,
            b: (self.0 >> 8) as u8,
            a: self.0 as u8,
        }
    }

    pub const fn alpha(self) -> u8 {
        self.0 as u8
    }

    /// Scale the alpha channel by an opacity in `0.0..=1.0`.
    pub fn with_opacity(self, opacity: f32) -> Self {
        let Rgba { r, g, b, a } = self.channels();
        let a = (a as f32 * opacity.clamp(0.0, 1.0)).round() as u8;
        Self::from_rgba(r, g, b, a)
    }

    /// `#rrggbb`, with a trailing alpha byte only when not fully opaque.
    pub fn to_hex(self) -> String {
        let Rgba { r, g, b, a } = self.channels();
        if a == 0xFF {
            format!("#{r:02x}{g:02x}{b:02x}")
        } else {
            format!("#{r:02x}{g:02x}{b:02x}{a:02x}")
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl From<Rgba> for Color {
    fn from(c: Rgba) -> Self {
        Color::from_rgba(c.r, c.g, c.b, c.a)
    }
}

/// Parse an SVG color value.
///
/// Accepts `#rgb`, `#rrggbb`, `#rrggbbaa`, `rgb(r, g, b)`,
/// `rgba(r, g, b, a)` with `a` in `0..=1`, `none`, `transparent`, and
/// a set of common color keywords.
pub fn parse_color(s: &str) -> Option<Color> {
    let s = s.trim().to_ascii_lowercase();

    // Hex colors
    if let Some(hex) = s.strip_prefix('#') {
        if !hex.is_ascii() {
            return None;
        }
        let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16).ok();
        return match hex.len() {
            3 => {
                let r = channel(0..1)?;
                let g = channel(1..2)?;
                let b = channel(2..3)?;
                Some(Color::from_rgb(r * 17, g * 17, b * 17))
            }
            6 => Some(Color::from_rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?)),
            8 => Some(Color::from_rgba(
                channel(0..2)?,
                channel(2..4)?,
                channel(4..6)?,
                channel(6..8)?,
            )),
            _ => None,
        };
    }

    // RGB/RGBA functions
    if let Some(inner) = s
        .strip_prefix("rgba(")
        .or_else(|| s.strip_prefix("rgb("))
        .and_then(|rest| rest.strip_suffix(')'))
    {
        let parts: Vec<&str> = inner
            .split(|c: char| c == ',' || c == '/' || c.is_whitespace())
            .filter(|p| !p.is_empty())
            .collect();
        if !(3..=4).contains(&parts.len()) {
            return None;
        }
        let r: u8 = parts[0].parse().ok()?;
        let g: u8 = parts[1].parse().ok()?;
        let b: u8 = parts[2].parse().ok()?;
        let a = match parts.get(3) {
            Some(a) => (a.parse::<f32>().ok()?.clamp(0.0, 1.0) * 255.0).round() as u8,
            None => 0xFF,
        };
        return Some(Color::from_rgba(r, g, b, a));
    }

    // Named colors
    match s.as_str() {
        "none" | "transparent" => Some(Color::TRANSPARENT),
        "black" => Some(Color::from_rgb(0, 0, 0)),
        "white" => Some(Color::from_rgb(255, 255, 255)),
        "red" => Some(Color::from_rgb(255, 0, 0)),
        "green" => Some(Color::from_rgb(0, 128, 0)),
        "lime" => Some(Color::from_rgb(0, 255, 0)),
        "blue" => Some(Color::from_rgb(0, 0, 255)),
        "yellow" => Some(Color::from_rgb(255, 255, 0)),
        "cyan" | "aqua" => Some(Color::from_rgb(0, 255, 255)),
        "magenta" | "fuchsia" => Some(Color::from_rgb(255, 0, 255)),
        "gray" | "grey" => Some(Color::from_rgb(128, 128, 128)),
        "silver" => Some(Color::from_rgb(192, 192, 192)),
        "maroon" => Some(Color::from_rgb(128, 0, 0)),
        "navy" => Some(Color::from_rgb(0, 0, 128)),
        "teal" => Some(Color::from_rgb(0, 128, 128)),
        "olive" => Some(Color::from_rgb(128, 128, 0)),
        "orange" => Some(Color::from_rgb(255, 165, 0)),
        "purple" => Some(Color::from_rgb(128, 0, 128)),
        "pink" => Some(Color::from_rgb(255, 192, 203)),
        "brown" => Some(Color::from_rgb(165, 42, 42)),
        _ => None,
    }
}
