//! Linear RGB color type
//!
//! Linear RGB represents physical light intensity. The Lab conversion and the
//! reconvert brightness correction operate on these values.

use super::lut::{linear_to_srgb, quantize_unit, srgb8_to_linear};
use super::srgb::{Rgb, BT709};

/// A color in linear RGB space (0.0..=1.0 per channel for in-gamut colors).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LinearRgb {
    /// Red channel (linear)
    pub r: f64,
    /// Green channel (linear)
    pub g: f64,
    /// Blue channel (linear)
    pub b: f64,
}

impl LinearRgb {
    /// Create a new linear RGB color.
    #[inline]
    pub const fn new(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }

    /// BT.709 relative luminance.
    #[inline]
    pub fn luminance(self) -> f64 {
        BT709[0] * self.r + BT709[1] * self.g + BT709[2] * self.b
    }

    /// Gamma-encode back to 8-bit sRGB.
    ///
    /// Each channel is clamped to 0.0..=1.0, encoded with the exact sRGB
    /// curve and rounded half-up.
    #[inline]
    pub fn to_rgb(self) -> Rgb {
        Rgb::new(
            quantize_unit(linear_to_srgb(self.r)),
            quantize_unit(linear_to_srgb(self.g)),
            quantize_unit(linear_to_srgb(self.b)),
        )
    }
}

impl From<Rgb> for LinearRgb {
    /// Decode 8-bit sRGB through the generated gamma table.
    #[inline]
    fn from(c: Rgb) -> Self {
        Self {
            r: srgb8_to_linear(c.r),
            g: srgb8_to_linear(c.g),
            b: srgb8_to_linear(c.b),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// u8 -> LinearRgb -> u8 must be lossless for every channel value.
    #[test]
    fn test_round_trip_exact() {
        for i in 0..=255u8 {
            let back = LinearRgb::from(Rgb::new(i, i, i)).to_rgb();
            assert_eq!(back, Rgb::new(i, i, i), "round trip failed for {i}");
        }
    }

    #[test]
    fn test_known_gamma_values() {
        // sRGB 128 -> linear ~0.2158
        let mid = LinearRgb::from(Rgb::new(128, 128, 128));
        assert!(
            (mid.r - 0.2158).abs() < 0.001,
            "sRGB 128 -> linear expected ~0.2158, got {}",
            mid.r
        );

        // linear 0.5 -> sRGB ~188
        let encoded = LinearRgb::new(0.5, 0.5, 0.5).to_rgb();
        assert_eq!(encoded, Rgb::new(188, 188, 188));
    }

    #[test]
    fn test_luminance_of_white_is_one() {
        let white = LinearRgb::from(Rgb::new(255, 255, 255));
        assert!((white.luminance() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_out_of_gamut_is_clamped() {
        let c = LinearRgb::new(-0.2, 1.4, 0.5).to_rgb();
        assert_eq!(c.r, 0);
        assert_eq!(c.g, 255);
    }
}
