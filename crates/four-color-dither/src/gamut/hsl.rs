//! Range-based HSL used by the Grayout mapping.
//!
//! Saturation here is the raw channel spread `max - min` rather than the
//! lightness-normalized HSL saturation, so S and L can be edited
//! independently. All components are in 0.0..=1.0; hue wraps at 1.0.

use crate::color::{quantize_unit, Rgb};

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Hsl {
    pub h: f64,
    pub s: f64,
    pub l: f64,
}

impl From<Rgb> for Hsl {
    fn from(c: Rgb) -> Self {
        let [r, g, b] = c.to_f64().map(|v| v / 255.0);
        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let d = max - min;

        let h = if d > 0.0 {
            let sector = if max == r {
                ((g - b) / d).rem_euclid(6.0)
            } else if max == g {
                (b - r) / d + 2.0
            } else {
                (r - g) / d + 4.0
            };
            (sector / 6.0).rem_euclid(1.0)
        } else {
            0.0
        };

        Hsl {
            h,
            s: d,
            l: (max + min) / 2.0,
        }
    }
}

impl Hsl {
    /// Back to 8-bit RGB, clipping each channel to the unit range.
    pub fn to_rgb(self) -> Rgb {
        let Hsl { h, s, l } = self;
        let [r, g, b] = if s == 0.0 {
            [l, l, l]
        } else {
            let max = l + s / 2.0;
            let min = l - s / 2.0;
            let span = max - min;
            let h6 = (h - h.floor()) * 6.0;
            if h6 < 1.0 {
                [max, min + span * h6, min]
            } else if h6 < 2.0 {
                [min + span * (2.0 - h6), max, min]
            } else if h6 < 3.0 {
                [min, max, min + span * (h6 - 2.0)]
            } else if h6 < 4.0 {
                [min, min + span * (4.0 - h6), max]
            } else if h6 < 5.0 {
                [min + span * (h6 - 4.0), min, max]
            } else {
                [max, min, min + span * (6.0 - h6)]
            }
        };
        Rgb::new(quantize_unit(r), quantize_unit(g), quantize_unit(b))
    }
}

/// Signed hue difference `h1 - h2` wrapped into [-0.5, 0.5).
#[inline]
pub(crate) fn hue_diff(h1: f64, h2: f64) -> f64 {
    let d = (h1 - h2).rem_euclid(1.0);
    if d < 0.5 {
        d
    } else {
        d - 1.0
    }
}

/// Shortest signed step from `from` to `to` on the hue circle.
#[inline]
pub(crate) fn hue_step(from: f64, to: f64) -> f64 {
    (to - from + 0.5).rem_euclid(1.0) - 0.5
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primary_hues() {
        assert_eq!(Hsl::from(Rgb::new(255, 0, 0)).h, 0.0);
        assert!((Hsl::from(Rgb::new(255, 255, 0)).h - 1.0 / 6.0).abs() < 1e-12);
        assert!((Hsl::from(Rgb::new(0, 255, 0)).h - 2.0 / 6.0).abs() < 1e-12);
        assert!((Hsl::from(Rgb::new(0, 0, 255)).h - 4.0 / 6.0).abs() < 1e-12);
        // Magenta wraps through the red branch
        assert!((Hsl::from(Rgb::new(255, 0, 255)).h - 5.0 / 6.0).abs() < 1e-12);
    }

    #[test]
    fn test_saturation_is_channel_spread() {
        let hsl = Hsl::from(Rgb::new(200, 100, 50));
        assert!((hsl.s - 150.0 / 255.0).abs() < 1e-12);
        assert!((hsl.l - 125.0 / 255.0).abs() < 1e-12);
        assert_eq!(Hsl::from(Rgb::new(90, 90, 90)).s, 0.0);
    }

    #[test]
    fn test_round_trip_is_exact() {
        for r in (0..=255u16).step_by(17) {
            for g in (0..=255u16).step_by(17) {
                for b in (0..=255u16).step_by(17) {
                    let c = Rgb::new(r as u8, g as u8, b as u8);
                    let back = Hsl::from(c).to_rgb();
                    let max_err = c
                        .to_bytes()
                        .iter()
                        .zip(back.to_bytes())
                        .map(|(&x, y)| (x as i32 - y as i32).abs())
                        .max()
                        .unwrap_or(0);
                    assert!(max_err <= 1, "HSL round trip of {c} gave {back}");
                }
            }
        }
    }

    #[test]
    fn test_hue_diff_wraps() {
        assert!((hue_diff(0.95, 0.05) + 0.1).abs() < 1e-12);
        assert!((hue_diff(0.05, 0.95) - 0.1).abs() < 1e-12);
        assert_eq!(hue_diff(0.3, 0.3), 0.0);
        assert!((hue_step(0.9, 0.1) - 0.2).abs() < 1e-12);
    }
}
