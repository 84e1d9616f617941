//! Chroma attenuation of the diffused error.
//!
//! The eye resolves fine luminance detail much better than fine color
//! detail. Splitting the error into BT.709 luma plus two color-difference
//! components (R-Y, B-Y) and scaling only the latter keeps brightness
//! accurate while damping colored speckle.

use crate::color::BT709;

/// Scale the chroma part of an RGB error by `weight`, keeping its luma.
///
/// `weight >= 1.0` returns the error unchanged.
#[inline]
pub fn attenuate_chroma(err: [f64; 3], weight: f64) -> [f64; 3] {
    if weight >= 1.0 {
        return err;
    }
    let y = BT709[0] * err[0] + BT709[1] * err[1] + BT709[2] * err[2];
    let cr = (err[0] - y) * weight;
    let cb = (err[2] - y) * weight;
    let g = y - (BT709[0] * cr + BT709[2] * cb) / BT709[1];
    [y + cr, g, y + cb]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn luma(e: [f64; 3]) -> f64 {
        BT709[0] * e[0] + BT709[1] * e[1] + BT709[2] * e[2]
    }

    #[test]
    fn test_unit_weight_is_identity() {
        let e = [12.0, -40.0, 7.5];
        assert_eq!(attenuate_chroma(e, 1.0), e);
    }

    #[test]
    fn test_zero_weight_leaves_luma_only() {
        let e = [60.0, -20.0, 5.0];
        let out = attenuate_chroma(e, 0.0);
        let y = luma(e);
        for c in out {
            assert!((c - y).abs() < 1e-9, "expected gray error {y}, got {out:?}");
        }
    }

    #[test]
    fn test_luma_is_preserved() {
        let e = [33.0, -71.0, 120.0];
        for w in [0.0, 0.25, 0.6, 0.99] {
            let out = attenuate_chroma(e, w);
            assert!((luma(out) - luma(e)).abs() < 1e-9, "luma changed at weight {w}");
        }
    }

    #[test]
    fn test_neutral_error_unchanged() {
        let e = [-25.0, -25.0, -25.0];
        let out = attenuate_chroma(e, 0.3);
        for c in out {
            assert!((c + 25.0).abs() < 1e-9);
        }
    }
}
