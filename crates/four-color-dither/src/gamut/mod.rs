//! Gamut mapping: pre-bias colors toward what the palette can reproduce.
//!
//! Four interchangeable strategies selected by [`GamutMode`]:
//!
//! - **Grayout**: desaturate hues outside the palette's hue window (HSL)
//! - **Anti-Saturation**: project outside pixels to the nearest point on
//!   the palette tetrahedron
//! - **Centroid-Clip**: clip outside pixels along the ray from the
//!   tetrahedron centroid
//! - **Illuminant**: simulate red and yellow lighting with luma normalization
//!
//! The projection modes work in normalized RGB or Lab ([`GamutSpace`]).
//! Per-call geometry is prepared once by [`GamutMapper::new`] and every pixel
//! is then mapped independently.

mod geometry;
mod grayout;
mod hsl;
mod illuminant;
mod projection;

pub use geometry::{closest_point_on_triangle, Face, Tetrahedron, Vec3, INSIDE_EPSILON};
pub use grayout::{Grayout, HueWindow, HUE_TOLERANCE};
pub use illuminant::Illuminant;
pub use projection::{ClipMethod, Projection};

use crate::color::Rgb;
use crate::output::PixelBuffer;
use crate::palette::Palette;

/// Default Grayout strength.
pub const DEFAULT_STRENGTH: f64 = 0.7;

/// Coordinate space for the tetrahedron projection modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GamutSpace {
    /// Palette colors normalized to the unit cube
    #[default]
    Rgb,
    /// Palette colors in CIE Lab
    Lab,
}

/// Gamut mapping strategy with its parameters.
///
/// # Example
///
/// ```
/// use four_color_dither::{gamut_map, GamutMode, Palette, PixelBuffer, Rgb};
///
/// let palette = Palette::eink();
/// let input = PixelBuffer::from_rgb(&[Rgb::new(0, 0, 255)], 1, 1).unwrap();
/// let out = gamut_map(&input, &palette, GamutMode::Grayout { strength: 1.0 });
/// let c = out.pixel(0, 0);
/// assert!(c.r == c.g && c.g == c.b, "blue is grayed out");
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GamutMode {
    /// Hue-window desaturation; `strength` in 0..=1
    Grayout {
        /// 0 = identity, 1 = full clip
        strength: f64,
    },
    /// Nearest-surface projection
    AntiSaturation {
        /// Working space
        space: GamutSpace,
    },
    /// Centroid ray clip
    CentroidClip {
        /// Working space
        space: GamutSpace,
    },
    /// Colored lighting simulation
    Illuminant {
        /// Red light weight
        red: f64,
        /// Yellow light weight
        yellow: f64,
        /// Highlight protection in 0..=1
        white_preserve: f64,
    },
}

impl Default for GamutMode {
    fn default() -> Self {
        GamutMode::Grayout {
            strength: DEFAULT_STRENGTH,
        }
    }
}

impl GamutMode {
    /// Default illuminant parameters.
    pub const ILLUMINANT: GamutMode = GamutMode::Illuminant {
        red: 1.0,
        yellow: 1.0,
        white_preserve: 1.0,
    };

    /// Short lowercase name, for logs.
    pub fn name(&self) -> &'static str {
        match self {
            GamutMode::Grayout { .. } => "grayout",
            GamutMode::AntiSaturation { .. } => "anti_saturation",
            GamutMode::CentroidClip { .. } => "centroid_clip",
            GamutMode::Illuminant { .. } => "illuminant",
        }
    }

    /// Same mode with parameters clamped into their documented ranges.
    pub fn clamped(self) -> Self {
        match self {
            GamutMode::Grayout { strength } => GamutMode::Grayout {
                strength: strength.clamp(0.0, 1.0),
            },
            GamutMode::Illuminant {
                red,
                yellow,
                white_preserve,
            } => GamutMode::Illuminant {
                red: red.max(0.0),
                yellow: yellow.max(0.0),
                white_preserve: white_preserve.clamp(0.0, 1.0),
            },
            other => other,
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Prepared {
    Grayout(Grayout),
    Projection(Projection),
    Illuminant(Illuminant),
}

/// A gamut mapping prepared for one palette.
#[derive(Debug, Clone, Copy)]
pub struct GamutMapper {
    mode: GamutMode,
    prepared: Prepared,
}

impl GamutMapper {
    /// Precompute the hue window, tetrahedron or scales for `mode`.
    pub fn new(palette: &Palette, mode: GamutMode) -> Self {
        let prepared = match mode {
            GamutMode::Grayout { strength } => Prepared::Grayout(Grayout::new(palette, strength)),
            GamutMode::AntiSaturation { space } => {
                Prepared::Projection(Projection::new(palette, space, ClipMethod::Nearest))
            }
            GamutMode::CentroidClip { space } => {
                Prepared::Projection(Projection::new(palette, space, ClipMethod::Centroid))
            }
            GamutMode::Illuminant {
                red,
                yellow,
                white_preserve,
            } => Prepared::Illuminant(Illuminant::new(red, yellow, white_preserve)),
        };
        Self { mode, prepared }
    }

    /// The mode this mapper was built for.
    pub fn mode(&self) -> GamutMode {
        self.mode
    }

    /// Map one pixel.
    #[inline]
    pub fn apply(&self, c: Rgb) -> Rgb {
        match &self.prepared {
            Prepared::Grayout(g) => g.apply(c),
            Prepared::Projection(p) => p.apply(c),
            Prepared::Illuminant(i) => i.apply(c),
        }
    }

    /// Best-effort inverse of [`apply`](Self::apply). The projection modes
    /// are not invertible and return the pixel unchanged.
    #[inline]
    pub fn invert(&self, c: Rgb) -> Rgb {
        match &self.prepared {
            Prepared::Grayout(g) => g.invert(c),
            Prepared::Projection(_) => c,
            Prepared::Illuminant(i) => i.invert(c),
        }
    }

    /// Map a whole buffer into a new opaque buffer.
    pub fn map_buffer(&self, input: &PixelBuffer) -> PixelBuffer {
        if let Prepared::Projection(p) = &self.prepared {
            if tracing::enabled!(tracing::Level::TRACE) {
                let outside = input.to_rgb().iter().filter(|&&c| !p.is_inside(c)).count();
                tracing::trace!(outside, total = input.len(), "pixels outside palette tetrahedron");
            }
        }
        input.map_pixels(|c| self.apply(c))
    }

    /// Invert a whole buffer into a new opaque buffer.
    pub fn invert_buffer(&self, input: &PixelBuffer) -> PixelBuffer {
        input.map_pixels(|c| self.invert(c))
    }
}

/// Apply `mode` to every pixel of `input`.
pub fn gamut_map(input: &PixelBuffer, palette: &Palette, mode: GamutMode) -> PixelBuffer {
    GamutMapper::new(palette, mode).map_buffer(input)
}

/// Best-effort inverse of [`gamut_map`] for the same palette and mode.
pub fn inverse_gamut_map(input: &PixelBuffer, palette: &Palette, mode: GamutMode) -> PixelBuffer {
    GamutMapper::new(palette, mode).invert_buffer(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> PixelBuffer {
        let colors = [
            Rgb::new(0, 0, 255),
            Rgb::new(0, 255, 0),
            Rgb::new(200, 0, 0),
            Rgb::new(255, 255, 255),
            Rgb::new(90, 60, 30),
            Rgb::new(10, 200, 220),
        ];
        PixelBuffer::from_rgb(&colors, 3, 2).unwrap()
    }

    #[test]
    fn test_default_mode_is_grayout() {
        assert_eq!(GamutMode::default(), GamutMode::Grayout { strength: 0.7 });
        assert_eq!(GamutMode::default().name(), "grayout");
    }

    #[test]
    fn test_clamped_limits_parameters() {
        assert_eq!(
            GamutMode::Grayout { strength: 3.0 }.clamped(),
            GamutMode::Grayout { strength: 1.0 }
        );
        assert_eq!(
            GamutMode::Illuminant {
                red: -1.0,
                yellow: 2.5,
                white_preserve: 1.5
            }
            .clamped(),
            GamutMode::Illuminant {
                red: 0.0,
                yellow: 2.5,
                white_preserve: 1.0
            }
        );
    }

    #[test]
    fn test_every_mode_preserves_dimensions() {
        let palette = Palette::eink();
        let input = sample();
        for mode in [
            GamutMode::default(),
            GamutMode::AntiSaturation { space: GamutSpace::Rgb },
            GamutMode::AntiSaturation { space: GamutSpace::Lab },
            GamutMode::CentroidClip { space: GamutSpace::Rgb },
            GamutMode::CentroidClip { space: GamutSpace::Lab },
            GamutMode::ILLUMINANT,
        ] {
            let out = gamut_map(&input, &palette, mode);
            assert!(out.same_size(&input), "{} changed dimensions", mode.name());
            assert!(
                out.as_bytes().chunks(4).all(|p| p[3] == 255),
                "{} must produce opaque pixels",
                mode.name()
            );
        }
    }

    #[test]
    fn test_projection_inverse_is_identity() {
        let palette = Palette::eink();
        let input = sample();
        for space in [GamutSpace::Rgb, GamutSpace::Lab] {
            let out = inverse_gamut_map(&input, &palette, GamutMode::CentroidClip { space });
            assert_eq!(out, input);
        }
    }

    #[test]
    fn test_mapping_is_deterministic() {
        let palette = Palette::eink();
        let input = sample();
        let mode = GamutMode::CentroidClip { space: GamutSpace::Lab };
        assert_eq!(gamut_map(&input, &palette, mode), gamut_map(&input, &palette, mode));
    }
}
