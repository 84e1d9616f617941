//! Grayout: desaturate hues the palette cannot reproduce.
//!
//! The palette's chromatic entries define a hue window around the hue of
//! the palette's mean color. Pixel hues are pulled into that window and
//! pixels far outside it lose their saturation, so e.g. blue becomes a gray
//! of the same lightness instead of an arbitrary red/yellow mix.

use super::hsl::{hue_diff, hue_step, Hsl};
use crate::color::Rgb;
use crate::palette::Palette;

/// Hue distance (fraction of a turn) over which desaturation ramps to full.
pub const HUE_TOLERANCE: f64 = 60.0 / 360.0;

/// Entries below this saturation do not contribute to the hue window.
const CHROMATIC_THRESHOLD: f64 = 0.01;

/// The palette's reachable hue arc, in fractions of a turn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HueWindow {
    /// Start of the arc
    pub min: f64,
    /// Arc length
    pub range: f64,
}

impl HueWindow {
    /// Measure the hue spread of the palette's chromatic entries around the
    /// hue of the palette's mean color.
    pub fn of_palette(palette: &Palette) -> Self {
        let colors = palette.colors();
        let n = colors.len() as f64;
        let mean = |f: fn(&Rgb) -> u8| {
            (colors.iter().map(|c| f(c) as f64).sum::<f64>() / n).clamp(0.0, 255.0) as u8
        };
        let center = Hsl::from(Rgb::new(mean(|c| c.r), mean(|c| c.g), mean(|c| c.b))).h;

        let mut d_min = 0.0f64;
        let mut d_max = 0.0f64;
        for &c in colors {
            let hsl = Hsl::from(c);
            if hsl.s > CHROMATIC_THRESHOLD {
                let d = hue_diff(hsl.h, center);
                d_min = d_min.min(d);
                d_max = d_max.max(d);
            }
        }

        HueWindow {
            min: (center + d_min).rem_euclid(1.0),
            range: d_max - d_min,
        }
    }

    /// Clip a hue into the window, snapping to the nearer edge.
    pub fn clip(self, hue: f64) -> f64 {
        let radius = self.range / 2.0;
        let center = (self.min + radius).rem_euclid(1.0);
        let d = hue_diff(hue, center);
        let clipped = if d < -radius {
            center - radius
        } else if d > radius {
            center + radius
        } else {
            hue
        };
        clipped.rem_euclid(1.0)
    }

    /// Forward saturation multiplier for `hue` at `strength` (0..=1), plus
    /// the signed hue step toward the window.
    pub(crate) fn factor(self, hue: f64, strength: f64) -> (f64, f64) {
        let step = hue_step(hue, self.clip(hue));
        let distance = step.abs();
        let keep = if distance >= HUE_TOLERANCE {
            0.0
        } else {
            1.0 - distance / HUE_TOLERANCE
        };
        (1.0 - strength * (1.0 - keep), step)
    }
}

/// Precomputed Grayout transform for one palette and strength.
#[derive(Debug, Clone, Copy)]
pub struct Grayout {
    window: HueWindow,
    strength: f64,
}

impl Grayout {
    /// `strength` is capped at 1.0; values <= 0 make the transform the identity.
    pub fn new(palette: &Palette, strength: f64) -> Self {
        Self {
            window: HueWindow::of_palette(palette),
            strength: strength.min(1.0),
        }
    }

    /// The palette hue window in use.
    pub fn window(&self) -> HueWindow {
        self.window
    }

    /// Map one pixel. Lightness is untouched.
    pub fn apply(&self, c: Rgb) -> Rgb {
        if self.strength <= 0.0 {
            return c;
        }
        let hsl = Hsl::from(c);
        let (factor, step) = self.window.factor(hsl.h, self.strength);
        Hsl {
            h: (hsl.h + self.strength * step).rem_euclid(1.0),
            s: hsl.s * factor,
            l: hsl.l,
        }
        .to_rgb()
    }

    /// Undo the saturation loss of [`apply`](Self::apply).
    ///
    /// The hue of the input is kept as-is: the original hue cannot be
    /// recovered from a palette blend. Fully desaturated pixels (factor 0)
    /// stay unchanged.
    pub fn invert(&self, c: Rgb) -> Rgb {
        if self.strength <= 0.0 {
            return c;
        }
        let hsl = Hsl::from(c);
        let (factor, _) = self.window.factor(hsl.h, self.strength);
        let safe = if factor.abs() > 1e-12 { factor } else { 1.0 };
        Hsl {
            s: hsl.s / safe,
            ..hsl
        }
        .to_rgb()
    }
}
