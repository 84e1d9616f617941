//! Approximate restoration of an image from its dithered form.
//!
//! Three steps:
//!
//! 1. Separable Gaussian blur of the dithered sRGB image smooths the dot
//!    pattern back into continuous tone
//! 2. Inverse gamut mapping for the mode used at conversion time
//! 3. Brightness correction: the mean linear BT.709 luma of the restored
//!    image is matched to that of the blurred one (ratio clamped to
//!    0.5..=2.0), then scaled by a manual factor

use crate::color::{quantize_255, LinearRgb, Rgb};
use crate::gamut::{GamutMapper, GamutMode};
use crate::output::PixelBuffer;
use crate::palette::Palette;

/// Default blur radius.
pub const DEFAULT_BLUR_RADIUS: u32 = 2;

const MIN_AUTO_RATIO: f64 = 0.5;
const MAX_AUTO_RATIO: f64 = 2.0;

/// Reconvert parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReconvertParams {
    /// Gaussian sigma in pixels; 0 disables the blur
    pub blur_radius: u32,
    /// Gamut mode the image was converted with
    pub gamut: GamutMode,
    /// Manual brightness factor applied on top of the automatic one
    pub brightness: f64,
}

impl Default for ReconvertParams {
    fn default() -> Self {
        Self {
            blur_radius: DEFAULT_BLUR_RADIUS,
            gamut: GamutMode::default(),
            brightness: 1.0,
        }
    }
}

impl ReconvertParams {
    /// Parameters for undoing `gamut` with default blur and brightness.
    pub fn new(gamut: GamutMode) -> Self {
        Self {
            gamut,
            ..Self::default()
        }
    }

    /// Set the blur radius.
    pub fn blur_radius(mut self, radius: u32) -> Self {
        self.blur_radius = radius;
        self
    }

    /// Set the manual brightness factor, clamped to 0.5..=2.0.
    pub fn brightness(mut self, factor: f64) -> Self {
        self.brightness = if factor.is_nan() { 1.0 } else { factor.clamp(0.5, 2.0) };
        self
    }
}

/// Restore an approximation of the original from a dithered buffer.
///
/// ```
/// use four_color_dither::{reconvert, Palette, PixelBuffer, ReconvertParams, Rgb};
///
/// let px: Vec<Rgb> = (0..16).map(|i| if i % 2 == 0 { Rgb::new(0, 0, 0) } else { Rgb::new(255, 255, 255) }).collect();
/// let dithered = PixelBuffer::from_rgb(&px, 4, 4).unwrap();
/// let restored = reconvert(&dithered, &ReconvertParams::default(), &Palette::eink());
/// assert_eq!(restored.width(), 4);
/// ```
pub fn reconvert(dithered: &PixelBuffer, params: &ReconvertParams, palette: &Palette) -> PixelBuffer {
    let blurred = gaussian_blur(dithered, params.blur_radius);
    let restored = GamutMapper::new(palette, params.gamut.clamped()).invert_buffer(&blurred);

    let mut factor = params.brightness;
    let target = mean_linear_luma(&blurred);
    let current = mean_linear_luma(&restored);
    if target > 1e-6 && current > 1e-6 {
        factor *= (target / current).clamp(MIN_AUTO_RATIO, MAX_AUTO_RATIO);
    }
    tracing::debug!(
        radius = params.blur_radius,
        mode = params.gamut.name(),
        factor,
        "reconvert"
    );

    if (factor - 1.0).abs() <= 1e-6 {
        return restored;
    }
    restored.map_pixels(|c| {
        let v = c.to_f64();
        let scale = |x: f64| (x * factor + 0.5).clamp(0.0, 255.0) as u8;
        Rgb::new(scale(v[0]), scale(v[1]), scale(v[2]))
    })
}

/// Separable Gaussian blur with sigma = `radius` and edge-replicated borders.
///
/// The kernel spans `⌊2σ + 0.5⌋` pixels on each side. Radius 0 returns a
/// copy (alpha forced opaque).
pub fn gaussian_blur(input: &PixelBuffer, radius: u32) -> PixelBuffer {
    if radius == 0 {
        return input.map_pixels(|c| c);
    }
    let (w, h) = (input.width(), input.height());
    let kernel = gaussian_kernel(radius as f64);
    let half = (kernel.len() / 2) as isize;
    let clamp = |v: isize, n: usize| v.clamp(0, n as isize - 1) as usize;

    let src: Vec<[f64; 3]> = input.to_rgb().iter().map(|c| c.to_f64()).collect();

    let mut horiz = vec![[0.0; 3]; src.len()];
    for y in 0..h {
        for x in 0..w {
            let mut acc = [0.0; 3];
            for (k, &weight) in kernel.iter().enumerate() {
                let sx = clamp(x as isize + k as isize - half, w);
                let p = src[y * w + sx];
                for c in 0..3 {
                    acc[c] += weight * p[c];
                }
            }
            horiz[y * w + x] = acc;
        }
    }

    let mut i = 0;
    input.map_pixels(|_| {
        let (x, y) = (i % w, i / w);
        i += 1;
        let mut acc = [0.0; 3];
        for (k, &weight) in kernel.iter().enumerate() {
            let sy = clamp(y as isize + k as isize - half, h);
            let p = horiz[sy * w + x];
            for c in 0..3 {
                acc[c] += weight * p[c];
            }
        }
        Rgb::new(quantize_255(acc[0]), quantize_255(acc[1]), quantize_255(acc[2]))
    })
}

fn gaussian_kernel(sigma: f64) -> Vec<f64> {
    let half = (2.0 * sigma + 0.5) as i64;
    let raw: Vec<f64> = (-half..=half)
        .map(|x| (-((x * x) as f64) / (2.0 * sigma * sigma)).exp())
        .collect();
    let sum: f64 = raw.iter().sum();
    raw.into_iter().map(|v| v / sum).collect()
}

fn mean_linear_luma(buffer: &PixelBuffer) -> f64 {
    if buffer.is_empty() {
        return 0.0;
    }
    let total: f64 = buffer
        .to_rgb()
        .into_iter()
        .map(|c| LinearRgb::from(c).luminance())
        .sum();
    total / buffer.len() as f64
}
