//! Gamma conversion helpers
//!
//! Decoding of 8-bit channels goes through a table generated at compile time
//! by build.rs. Encoding and non-integer decoding use the exact IEC 61966-2-1
//! formulas.

// Include the generated LUT from build.rs
include!(concat!(env!("OUT_DIR"), "/gamma_lut.rs"));

/// Decode an 8-bit sRGB channel to linear light (0.0..=1.0).
#[inline]
pub fn srgb8_to_linear(value: u8) -> f64 {
    SRGB8_TO_LINEAR[value as usize]
}

/// Decode a normalized sRGB channel (0.0..=1.0) to linear light.
#[inline]
pub fn srgb_to_linear(srgb: f64) -> f64 {
    if srgb <= 0.04045 {
        srgb / 12.92
    } else {
        ((srgb + 0.055) / 1.055).powf(2.4)
    }
}

/// Encode a linear channel to normalized sRGB.
///
/// The input is clamped to 0.0..=1.0 first, so out-of-gamut linear values
/// produced by the Lab inverse land on the nearest representable channel.
#[inline]
pub fn linear_to_srgb(linear: f64) -> f64 {
    let c = linear.clamp(0.0, 1.0);
    if c <= 0.0031308 {
        c * 12.92
    } else {
        1.055 * c.powf(1.0 / 2.4) - 0.055
    }
}

/// Quantize a normalized channel to 8 bits with round-half-up.
#[inline]
pub fn quantize_unit(value: f64) -> u8 {
    (value * 255.0 + 0.5).clamp(0.0, 255.0) as u8
}

/// Quantize a 0..255 float channel to 8 bits with round-half-up.
#[inline]
pub fn quantize_255(value: f64) -> u8 {
    (value + 0.5).clamp(0.0, 255.0) as u8
}
