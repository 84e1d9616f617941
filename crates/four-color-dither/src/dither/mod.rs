//! Error diffusion dithering to the four-color palette.
//!
//! # Algorithm
//!
//! A single raster scan, left to right and top to bottom, over a float
//! working arena seeded with the input colors. For each pixel:
//!
//! 1. Round the accumulated value to 8-bit RGB
//! 2. Pick the nearest palette entry: lookup table when no penalty is
//!    active, otherwise a penalized Lab search using the pixel's brightness
//! 3. Store the entry's output color in the arena at this pixel
//! 4. Error = accumulated value - matching color (perceived when present)
//! 5. Clamp the error per channel to `±error_clamp` (if nonzero)
//! 6. Attenuate its chroma by the CSF weight (if below 1.0)
//! 7. Spread it over unvisited neighbors with the kernel
//!
//! Every call is a pure function of its inputs; the arena belongs to the
//! call alone.
//!
//! # Example
//!
//! ```
//! use four_color_dither::{Dither, DitherOptions, FloydSteinberg, Palette, Rgb};
//!
//! let palette = Palette::eink();
//! let pixels = vec![Rgb::new(128, 128, 128); 4];
//! let indices = FloydSteinberg.dither(&pixels, 2, 2, &palette, &DitherOptions::new());
//! assert_eq!(indices.len(), 4);
//! assert!(indices.iter().all(|&i| i < 4));
//! ```

mod csf;
mod floyd_steinberg;
mod kernel;
mod options;

pub use csf::attenuate_chroma;
pub use floyd_steinberg::FloydSteinberg;
pub use kernel::{Kernel, FLOYD_STEINBERG};
pub use options::{
    DitherOptions, DEFAULT_ERROR_CLAMP, DEFAULT_RED_PENALTY, DEFAULT_YELLOW_PENALTY,
    MAX_ERROR_CLAMP, MAX_PENALTY,
};

use crate::color::{Lab, Rgb};
use crate::palette::{NearestLut, Palette};

/// Trait for error diffusion dithering algorithms.
pub trait Dither {
    /// Dither an image to palette indices.
    ///
    /// # Arguments
    ///
    /// * `image` - Input pixels (row-major order)
    /// * `width` - Image width in pixels
    /// * `height` - Image height in pixels
    /// * `palette` - Color palette for quantization
    /// * `options` - Dithering configuration
    ///
    /// # Returns
    ///
    /// One palette index per pixel in row-major order, each in `0..4`.
    ///
    /// # Panics
    ///
    /// Panics if `image.len() != width * height`.
    fn dither(
        &self,
        image: &[Rgb],
        width: usize,
        height: usize,
        palette: &Palette,
        options: &DitherOptions,
    ) -> Vec<u8>;
}

/// Flat row-major float working buffer owned by one dithering call.
#[derive(Debug)]
pub struct WorkBuffer {
    data: Vec<[f64; 3]>,
    width: usize,
    height: usize,
}

impl WorkBuffer {
    /// Seed the arena from 8-bit colors.
    ///
    /// # Panics
    ///
    /// Panics if `image.len() != width * height`.
    pub fn from_rgb(image: &[Rgb], width: usize, height: usize) -> Self {
        assert!(
            width.checked_mul(height) == Some(image.len()),
            "{} pixels do not fill a {width}x{height} image",
            image.len()
        );
        Self {
            data: image.iter().map(|c| c.to_f64()).collect(),
            width,
            height,
        }
    }

    /// Accumulated value at (x, y).
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> [f64; 3] {
        self.data[y * self.width + x]
    }

    /// Overwrite the value at (x, y).
    #[inline]
    pub fn set(&mut self, x: usize, y: usize, value: [f64; 3]) {
        self.data[y * self.width + x] = value;
    }

    /// Add `error * weight / divisor` at (x + dx, y + dy); silently ignores
    /// out-of-bounds targets.
    #[inline]
    pub fn diffuse(&mut self, x: usize, y: usize, (dx, dy, weight): (i32, i32, u8), divisor: f64, error: [f64; 3]) {
        let nx = x as i64 + dx as i64;
        let ny = y as i64 + dy as i64;
        if nx < 0 || ny < 0 || nx as usize >= self.width || ny as usize >= self.height {
            return;
        }
        let f = weight as f64 / divisor;
        let cell = &mut self.data[ny as usize * self.width + nx as usize];
        for c in 0..3 {
            cell[c] += error[c] * f;
        }
    }
}

/// Round a channel half-to-even and clamp to 0..=255.
#[inline]
fn round_channel(v: f64) -> u8 {
    v.round_ties_even().clamp(0.0, 255.0) as u8
}

/// Core error diffusion loop parameterized by kernel.
///
/// `lut` is used when both penalties are zero; pass a memoized table for
/// the same palette to skip rebuilding it. When it is `None` and needed, a
/// table is built for this call.
///
/// # Panics
///
/// Panics if `image.len() != width * height`. [`PixelBuffer`] inputs
/// always satisfy this.
///
/// [`PixelBuffer`]: crate::PixelBuffer
pub fn dither_with_kernel(
    image: &[Rgb],
    width: usize,
    height: usize,
    palette: &Palette,
    kernel: &Kernel,
    options: &DitherOptions,
    lut: Option<&NearestLut>,
) -> Vec<u8> {
    let mut work = WorkBuffer::from_rgb(image, width, height);
    let mut output = vec![0u8; image.len()];

    let penalties = options.penalties();
    let built;
    let lut = if penalties.is_active() {
        None
    } else {
        match lut {
            Some(l) => Some(l),
            None => {
                built = NearestLut::build(palette);
                Some(&built)
            }
        }
    };

    let clamp = options.error_clamp as f64;
    let divisor = kernel.divisor as f64;

    for y in 0..height {
        for x in 0..width {
            let old = work.get(x, y);
            let rounded = Rgb::new(round_channel(old[0]), round_channel(old[1]), round_channel(old[2]));

            let idx = match lut {
                Some(table) => table.index(rounded),
                None => {
                    palette
                        .find_nearest_with(
                            Lab::from(rounded),
                            options.distance_metric,
                            penalties,
                            rounded.brightness(),
                        )
                        .0
                }
            };
            output[y * width + x] = idx as u8;

            work.set(x, y, palette.color(idx).to_f64());

            let target = palette.matching_color(idx).to_f64();
            let mut error: [f64; 3] = std::array::from_fn(|c| old[c] - target[c]);
            if options.error_clamp > 0 {
                error = error.map(|e| e.clamp(-clamp, clamp));
            }
            let error = attenuate_chroma(error, options.csf_chroma_weight);

            for &entry in kernel.entries {
                work.diffuse(x, y, entry, divisor, error);
            }
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_channel_half_even() {
        assert_eq!(round_channel(2.5), 2);
        assert_eq!(round_channel(3.5), 4);
        assert_eq!(round_channel(-40.0), 0);
        assert_eq!(round_channel(300.2), 255);
    }

    #[test]
    fn test_diffuse_skips_out_of_bounds() {
        let mut work = WorkBuffer::from_rgb(&[Rgb::new(0, 0, 0); 4], 2, 2);
        // Bottom-left of (0, 0) is outside
        work.diffuse(0, 0, (-1, 1, 3), 16.0, [16.0, 16.0, 16.0]);
        assert_eq!(work.data.iter().map(|p| p[0]).sum::<f64>(), 0.0);
        // Right of (0, 0) is inside
        work.diffuse(0, 0, (1, 0, 7), 16.0, [16.0, 16.0, 16.0]);
        assert_eq!(work.get(1, 0), [7.0, 7.0, 7.0]);
        // Below the last row is outside
        work.diffuse(1, 1, (0, 1, 5), 16.0, [16.0, 0.0, 0.0]);
        assert_eq!(work.get(1, 1), [0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_penalty_path_and_lut_agree_without_penalties() {
        // With penalties at zero the LUT path is taken; a direct Euclidean
        // search on palette colors must give the same answer for exact entries.
        let palette = Palette::eink();
        let image: Vec<Rgb> = palette.colors().to_vec();
        let opts = DitherOptions::new().red_penalty(0.0).yellow_penalty(0.0);
        let out = dither_with_kernel(&image, 4, 1, &palette, &FLOYD_STEINBERG, &opts, None);
        assert_eq!(out, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_supplied_lut_is_used() {
        let palette = Palette::eink();
        let lut = NearestLut::build(&palette);
        let image = vec![Rgb::new(120, 60, 30); 9];
        let opts = DitherOptions::new().red_penalty(0.0).yellow_penalty(0.0);
        let with = dither_with_kernel(&image, 3, 3, &palette, &FLOYD_STEINBERG, &opts, Some(&lut));
        let without = dither_with_kernel(&image, 3, 3, &palette, &FLOYD_STEINBERG, &opts, None);
        assert_eq!(with, without);
    }

    #[test]
    #[should_panic(expected = "do not fill")]
    fn test_mismatched_image_length_panics_early() {
        WorkBuffer::from_rgb(&[Rgb::new(0, 0, 0); 5], 2, 3);
    }

    #[test]
    fn test_empty_image() {
        let out = dither_with_kernel(&[], 0, 0, &Palette::eink(), &FLOYD_STEINBERG, &DitherOptions::new(), None);
        assert!(out.is_empty());
    }
}
