//! Illuminant: tint the image as if lit by a red and a yellow light.
//!
//! A red source contributes (1, 0, 0) and a yellow source (1, 1, 0), so the
//! channel scales are `(red + yellow, yellow, 0)`. The scales are divided by
//! their BT.709 luma to keep neutral luma, and a white-preserve term blends
//! bright pixels back toward the original.

use crate::color::{quantize_255, Rgb, BT709};

const SCALE_EPSILON: f64 = 1e-12;

/// Number of fixed-point refinements in the white-preserve inverse.
const INVERSE_ITERATIONS: usize = 2;

/// Prepared illuminant transform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Illuminant {
    scales: [f64; 3],
    white_preserve: f64,
}

impl Illuminant {
    /// Build from light weights. Negative weights count as 0 and
    /// `white_preserve` is clamped to 0..=1.
    pub fn new(red: f64, yellow: f64, white_preserve: f64) -> Self {
        let red = red.max(0.0);
        let yellow = yellow.max(0.0);
        Self::from_scales([red + yellow, yellow, 0.0], white_preserve)
    }

    /// Build from raw per-channel scales, normalized to unit BT.709 luma.
    pub fn from_scales(raw: [f64; 3], white_preserve: f64) -> Self {
        let luma = BT709[0] * raw[0] + BT709[1] * raw[1] + BT709[2] * raw[2];
        let norm = if luma > SCALE_EPSILON { 1.0 / luma } else { 1.0 };
        Self {
            scales: raw.map(|s| s * norm),
            white_preserve: white_preserve.clamp(0.0, 1.0),
        }
    }

    /// Normalized channel scales.
    pub fn scales(&self) -> [f64; 3] {
        self.scales
    }

    /// Weight of the original pixel for a given normalized luma.
    ///
    /// The weight is BT.709 luma squared, not the channel mean, so a
    /// saturated blue counts as dark and still takes the tint.
    #[inline]
    fn preserve(&self, luma: f64) -> f64 {
        (luma * luma * self.white_preserve).clamp(0.0, 1.0)
    }

    /// Map one pixel. The white-preserve weight uses BT.709 luma.
    pub fn apply(&self, c: Rgb) -> Rgb {
        let orig = c.to_f64();
        let p = if self.white_preserve > 0.0 {
            self.preserve(c.brightness())
        } else {
            0.0
        };
        let out: [f64; 3] =
            std::array::from_fn(|i| orig[i] * self.scales[i] * (1.0 - p) + orig[i] * p);
        Rgb::new(quantize_255(out[0]), quantize_255(out[1]), quantize_255(out[2]))
    }

    /// Approximate inverse.
    ///
    /// Without white-preserve each channel is divided by its scale and
    /// zero-scale channels come back as 0. With white-preserve the blend
    /// weight depends on the unknown original, so it is estimated from a
    /// rough inverse (zero-scale channels borrow the mean of the others)
    /// and refined by a short fixed-point iteration.
    pub fn invert(&self, c: Rgb) -> Rgb {
        let out = c.to_f64();
        let valid = self.scales.map(|s| s.abs() > SCALE_EPSILON);
        let inv: [f64; 3] = std::array::from_fn(|i| if valid[i] { 1.0 / self.scales[i] } else { 0.0 });

        let result = if self.white_preserve > 0.0 {
            let mut rough: [f64; 3] = std::array::from_fn(|i| out[i] * inv[i]);
            let n_valid = valid.iter().filter(|&&v| v).count();
            if n_valid > 0 && n_valid < 3 {
                let mean = (0..3).filter(|&i| valid[i]).map(|i| rough[i]).sum::<f64>() / n_valid as f64;
                for i in 0..3 {
                    if !valid[i] {
                        rough[i] = mean;
                    }
                }
            }

            let mut estimate = rough.map(|v| v.clamp(0.0, 255.0));
            for _ in 0..INVERSE_ITERATIONS {
                let luma = (BT709[0] * estimate[0] + BT709[1] * estimate[1] + BT709[2] * estimate[2]) / 255.0;
                let p = self.preserve(luma);
                for i in 0..3 {
                    let combined = self.scales[i] * (1.0 - p) + p;
                    let combined = if combined.abs() > SCALE_EPSILON { combined } else { 1.0 };
                    estimate[i] = (out[i] / combined).clamp(0.0, 255.0);
                    if !valid[i] {
                        estimate[i] = p * estimate[i] + (1.0 - p) * out[i];
                    }
                }
            }
            estimate
        } else {
            std::array::from_fn(|i| out[i] * inv[i])
        };

        Rgb::new(quantize_255(result[0]), quantize_255(result[1]), quantize_255(result[2]))
    }
}
