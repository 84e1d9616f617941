//! 8-bit sRGB color type
//!
//! [`Rgb`] is the color model shared by every pipeline stage: three 8-bit
//! gamma-encoded channels. Alpha is never part of a color; it lives only in
//! the [`PixelBuffer`](crate::PixelBuffer).

use std::fmt;
use std::str::FromStr;

use crate::palette::ParseColorError;

/// BT.709 luma weights for red, green and blue.
pub const BT709: [f64; 3] = [0.2126, 0.7152, 0.0722];

/// A color with three 8-bit sRGB channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgb {
    /// Red channel (0..=255)
    pub r: u8,
    /// Green channel (0..=255)
    pub g: u8,
    /// Blue channel (0..=255)
    pub b: u8,
}

impl Rgb {
    /// Create a color from 8-bit channels.
    ///
    /// # Example
    /// ```
    /// use four_color_dither::Rgb;
    /// let red = Rgb::new(200, 0, 0);
    /// assert_eq!(red.to_bytes(), [200, 0, 0]);
    /// ```
    #[inline]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Create a color from a byte array [R, G, B].
    #[inline]
    pub const fn from_bytes(bytes: [u8; 3]) -> Self {
        Self::new(bytes[0], bytes[1], bytes[2])
    }

    /// Convert to a byte array [R, G, B].
    #[inline]
    pub const fn to_bytes(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }

    /// Channels as floats on the 0..=255 scale.
    #[inline]
    pub fn to_f64(self) -> [f64; 3] {
        [self.r as f64, self.g as f64, self.b as f64]
    }

    /// BT.709 luma of the encoded channels, normalized to 0.0..=1.0.
    ///
    /// This is the `brightness` used by the red/yellow penalties.
    ///
    /// ```
    /// use four_color_dither::Rgb;
    /// assert!((Rgb::new(255, 255, 255).brightness() - 1.0).abs() < 1e-12);
    /// assert_eq!(Rgb::new(0, 0, 0).brightness(), 0.0);
    /// ```
    #[inline]
    pub fn brightness(self) -> f64 {
        let [r, g, b] = self.to_f64();
        ((BT709[0] * r + BT709[1] * g + BT709[2] * b) / 255.0).clamp(0.0, 1.0)
    }

    /// Whether this color counts as "red-like" for penalty classification.
    #[inline]
    pub fn is_red_like(self) -> bool {
        self.r > 150 && self.g < 50 && self.b < 50
    }

    /// Whether this color counts as "yellow-like" for penalty classification.
    #[inline]
    pub fn is_yellow_like(self) -> bool {
        self.r > 200 && self.g > 200 && self.b < 50
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl FromStr for Rgb {
    type Err = ParseColorError;

    /// Parse a color from a hex string.
    ///
    /// Supports `#RRGGBB`, `RRGGBB`, `#RGB` and `RGB`. Parsing is
    /// case-insensitive and surrounding whitespace is trimmed.
    ///
    /// ```
    /// use four_color_dither::Rgb;
    ///
    /// let yellow: Rgb = "#FFFF00".parse().unwrap();
    /// assert_eq!(yellow, Rgb::new(255, 255, 0));
    ///
    /// let red: Rgb = "f00".parse().unwrap();
    /// assert_eq!(red, Rgb::new(255, 0, 0));
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let s = s.strip_prefix('#').unwrap_or(s);

        if !s.is_ascii() {
            return Err(ParseColorError::InvalidLength);
        }

        match s.len() {
            3 => {
                // Shorthand: 0xF -> 0xFF
                let r = u8::from_str_radix(&s[0..1], 16)? * 17;
                let g = u8::from_str_radix(&s[1..2], 16)? * 17;
                let b = u8::from_str_radix(&s[2..3], 16)? * 17;
                Ok(Self::new(r, g, b))
            }
            6 => {
                let r = u8::from_str_radix(&s[0..2], 16)?;
                let g = u8::from_str_radix(&s[2..4], 16)?;
                let b = u8::from_str_radix(&s[4..6], 16)?;
                Ok(Self::new(r, g, b))
            }
            _ => Err(ParseColorError::InvalidLength),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_parsing_6digit() {
        let white: Rgb = "#FFFFFF".parse().unwrap();
        assert_eq!(white, Rgb::new(255, 255, 255));

        let red: Rgb = "C80000".parse().unwrap();
        assert_eq!(red, Rgb::new(200, 0, 0));

        let mixed: Rgb = "  #b1af9d ".parse().unwrap();
        assert_eq!(mixed, Rgb::new(177, 175, 157));
    }

    #[test]
    fn test_hex_parsing_shorthand() {
        let yellow: Rgb = "#FF0".parse().unwrap();
        assert_eq!(yellow, Rgb::new(255, 255, 0));
    }

    #[test]
    fn test_hex_parsing_errors() {
        assert_eq!(
            "#FFFF".parse::<Rgb>(),
            Err(ParseColorError::InvalidLength)
        );
        assert!(matches!(
            "#GG0000".parse::<Rgb>(),
            Err(ParseColorError::InvalidHex(_))
        ));
        assert_eq!("#ÿÿ".parse::<Rgb>(), Err(ParseColorError::InvalidLength));
    }

    #[test]
    fn test_display_round_trips() {
        let color = Rgb::new(198, 166, 26);
        let text = color.to_string();
        assert_eq!(text, "#C6A61A");
        assert_eq!(text.parse::<Rgb>().unwrap(), color);
    }

    #[test]
    fn test_penalty_classification() {
        assert!(Rgb::new(200, 0, 0).is_red_like());
        assert!(!Rgb::new(150, 0, 0).is_red_like(), "r must exceed 150");
        assert!(!Rgb::new(255, 50, 0).is_red_like(), "g must stay below 50");

        assert!(Rgb::new(255, 255, 0).is_yellow_like());
        assert!(!Rgb::new(255, 255, 50).is_yellow_like(), "b must stay below 50");
        assert!(!Rgb::new(200, 255, 0).is_yellow_like(), "r must exceed 200");

        assert!(!Rgb::new(255, 255, 255).is_red_like());
        assert!(!Rgb::new(0, 0, 0).is_yellow_like());
    }

    #[test]
    fn test_brightness_bt709() {
        let green = Rgb::new(0, 255, 0).brightness();
        assert!((green - 0.7152).abs() < 1e-12);
        let gray = Rgb::new(128, 128, 128).brightness();
        assert!((gray - 128.0 / 255.0).abs() < 1e-12);
    }
}
