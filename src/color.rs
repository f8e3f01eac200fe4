//! RGB colors for the galaxy gradient.
//!
//! Colors are authored as sRGB hex strings (the way a color picker shows
//! them) but stored and interpolated in linear space. The render surface is
//! sRGB, so linear values written to the color buffer come out exactly as
//! authored at the two ends of the gradient.

use std::fmt;
use std::str::FromStr;

use glam::Vec3;

use crate::error::ColorParseError;

/// A linear-space RGB color with components in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0.0, 0.0, 0.0);
    pub const WHITE: Rgb = Rgb::new(1.0, 1.0, 1.0);

    /// Create a color from linear components.
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Create a color from sRGB-encoded bytes.
    pub fn from_srgb_u8(rgb: [u8; 3]) -> Self {
        Self {
            r: srgb_to_linear(rgb[0] as f32 / 255.0),
            g: srgb_to_linear(rgb[1] as f32 / 255.0),
            b: srgb_to_linear(rgb[2] as f32 / 255.0),
        }
    }

    /// Encode back to sRGB bytes.
    pub fn to_srgb_u8(self) -> [u8; 3] {
        let encode = |c: f32| (linear_to_srgb(c.clamp(0.0, 1.0)) * 255.0).round() as u8;
        [encode(self.r), encode(self.g), encode(self.b)]
    }

    /// Parse `#rrggbb`, `rrggbb` or the short `#rgb` form.
    pub fn from_hex(hex: &str) -> Result<Self, ColorParseError> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(ColorParseError::Digit(hex.to_string()));
        }
        let expanded: String = match digits.len() {
            3 => digits.chars().flat_map(|c| [c, c]).collect(),
            6 => digits.to_string(),
            _ => return Err(ColorParseError::Length(hex.to_string())),
        };

        let mut bytes = [0u8; 3];
        for (i, byte) in bytes.iter_mut().enumerate() {
            *byte = u8::from_str_radix(&expanded[i * 2..i * 2 + 2], 16)
                .map_err(|_| ColorParseError::Digit(hex.to_string()))?;
        }
        Ok(Self::from_srgb_u8(bytes))
    }

    /// Format as a lowercase `#rrggbb` sRGB string.
    pub fn to_hex(self) -> String {
        let [r, g, b] = self.to_srgb_u8();
        format!("#{r:02x}{g:02x}{b:02x}")
    }

    /// Linear interpolation towards `other`, component-wise.
    ///
    /// `t = 0` yields `self`, `t = 1` yields `other`.
    #[inline]
    pub fn lerp(self, other: Rgb, t: f32) -> Rgb {
        Rgb {
            r: self.r + (other.r - self.r) * t,
            g: self.g + (other.g - self.g) * t,
            b: self.b + (other.b - self.b) * t,
        }
    }

    #[inline]
    pub fn to_array(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }
}

impl From<Rgb> for Vec3 {
    fn from(c: Rgb) -> Self {
        Vec3::new(c.r, c.g, c.b)
    }
}

impl FromStr for Rgb {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Rgb::from_hex(s)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// sRGB transfer function, decode direction.
pub fn srgb_to_linear(c: f32) -> f32 {
    if c < 0.04045 {
        c * 0.0773993808
    } else {
        (c * 0.9478672986 + 0.0521327014).powf(2.4)
    }
}

/// sRGB transfer function, encode direction.
pub fn linear_to_srgb(c: f32) -> f32 {
    if c < 0.0031308 {
        c * 12.92
    } else {
        1.055 * c.powf(0.41666) - 0.055
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_forms() {
        let long = Rgb::from_hex("#ffffff").unwrap();
        let bare = Rgb::from_hex("ffffff").unwrap();
        let short = Rgb::from_hex("#fff").unwrap();
        assert_eq!(long, bare);
        assert_eq!(long, short);
        assert!((long.r - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_parse_hex_rejects_garbage() {
        assert!(matches!(Rgb::from_hex("#12345"), Err(ColorParseError::Length(_))));
        assert!(matches!(Rgb::from_hex("#zz0000"), Err(ColorParseError::Digit(_))));
        // Six bytes, but only five chars
        assert!(matches!(Rgb::from_hex("#a\u{e9}bcd"), Err(ColorParseError::Digit(_))));
        // from_str_radix alone would take the signs
        assert!(matches!(Rgb::from_hex("#+f+f+f"), Err(ColorParseError::Digit(_))));
        assert!(matches!("".parse::<Rgb>(), Err(ColorParseError::Length(_))));
    }

    #[test]
    fn test_hex_survives_linear_conversion() {
        for hex in ["#eb8cf2", "#0946e3", "#000000", "#808080"] {
            assert_eq!(Rgb::from_hex(hex).unwrap().to_hex(), hex);
        }
    }

    #[test]
    fn test_mid_gray_is_darker_in_linear_space() {
        let gray = Rgb::from_hex("#808080").unwrap();
        // 0x80 encodes roughly 21.6% linear intensity
        assert!((gray.r - 0.2158).abs() < 1e-3);
    }

    #[test]
    fn test_lerp_endpoints() {
        let a = Rgb::new(0.2, 0.4, 0.6);
        let b = Rgb::new(1.0, 0.0, 0.5);
        assert_eq!(a.lerp(b, 0.0), a);
        let end = a.lerp(b, 1.0);
        assert!((end.r - b.r).abs() < 1e-6);
        assert!((end.g - b.g).abs() < 1e-6);
        assert!((end.b - b.b).abs() < 1e-6);

        let mid = a.lerp(b, 0.5);
        assert!((mid.r - 0.6).abs() < 1e-6);
        assert!((mid.g - 0.2).abs() < 1e-6);
    }
}
