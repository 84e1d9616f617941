//! Lightness remapping: CLAHE on the Lab L* channel only.
//!
//! a* and b* pass through unchanged, so local contrast improves without
//! shifting hues. This helps a palette with only two neutral levels use its
//! lightness range.

mod clahe;

pub use clahe::clahe_channel;

use crate::color::Lab;
use crate::output::PixelBuffer;

/// Default contrast clip limit.
pub const DEFAULT_CLIP_LIMIT: f64 = 2.0;
/// Default number of tiles per axis.
pub const DEFAULT_GRID_SIZE: usize = 8;
/// Histogram resolution.
pub const N_BINS: usize = 256;

/// CLAHE parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClaheParams {
    /// Contrast limit, 1.0 (gentle) ..= 4.0 (strong)
    pub clip_limit: f64,
    /// Tiles per axis, at least 1
    pub grid_size: usize,
}

impl Default for ClaheParams {
    fn default() -> Self {
        Self {
            clip_limit: DEFAULT_CLIP_LIMIT,
            grid_size: DEFAULT_GRID_SIZE,
        }
    }
}

impl ClaheParams {
    /// Create parameters, clamping into the supported ranges.
    pub fn new(clip_limit: f64, grid_size: usize) -> Self {
        Self {
            clip_limit: clip_limit.clamp(1.0, 4.0),
            grid_size: grid_size.max(1),
        }
    }

    /// Same parameters clamped into the supported ranges.
    pub fn clamped(self) -> Self {
        Self::new(self.clip_limit, self.grid_size)
    }
}

/// Apply CLAHE to the L* channel of `input`.
///
/// ```
/// use four_color_dither::{clahe_lightness, ClaheParams, PixelBuffer, Rgb};
///
/// let px: Vec<Rgb> = (0..64).map(|i| Rgb::new(100 + i as u8, 100 + i as u8, 100 + i as u8)).collect();
/// let input = PixelBuffer::from_rgb(&px, 8, 8).unwrap();
/// let out = clahe_lightness(&input, &ClaheParams::default());
/// assert_eq!(out.width(), 8);
/// ```
pub fn clahe_lightness(input: &PixelBuffer, params: &ClaheParams) -> PixelBuffer {
    let params = params.clamped();
    let labs: Vec<Lab> = input.to_rgb().into_iter().map(Lab::from).collect();
    let l_star: Vec<f64> = labs.iter().map(|lab| lab.l).collect();

    let enhanced = clahe_channel(
        &l_star,
        input.width(),
        input.height(),
        params.clip_limit,
        params.grid_size,
        0.0,
        100.0,
        N_BINS,
    );

    let mut i = 0;
    input.map_pixels(|_| {
        let lab = labs[i];
        let l = enhanced[i].clamp(0.0, 100.0);
        i += 1;
        Lab::new(l, lab.a, lab.b).to_rgb()
    })
}
