//! DitheredImage: palette indices plus the palette that produced them.
//!
//! The indexed form is canonical; RGBA outputs are computed on demand by
//! looking up palette colors.

use crate::palette::Palette;

use super::PixelBuffer;

/// The canonical output of the dithering pipeline.
///
/// Stores one `u8` palette index per pixel in row-major order, along with
/// image dimensions and the palette used for dithering. Two RGBA renderings
/// are available:
///
/// - [`to_rgba()`](DitheredImage::to_rgba): the output colors sent to the panel
/// - [`to_rgba_perceived()`](DitheredImage::to_rgba_perceived): the colors
///   the panel really shows, for previews
///
/// # Example
///
/// ```
/// use four_color_dither::{DitheredImage, Palette};
///
/// let image = DitheredImage::new(vec![0, 1, 2, 3], 2, 2, Palette::eink());
///
/// assert_eq!(image.indices(), &[0, 1, 2, 3]);
/// let rgba = image.to_rgba();
/// assert_eq!(&rgba.as_bytes()[8..12], &[200, 0, 0, 255]);
/// ```
#[derive(Debug, Clone)]
pub struct DitheredImage {
    indices: Vec<u8>,
    width: usize,
    height: usize,
    palette: Palette,
}

impl DitheredImage {
    /// Create a new `DitheredImage` from palette indices.
    ///
    /// # Panics (debug only)
    ///
    /// Debug-asserts that `indices.len() == width * height`.
    pub fn new(indices: Vec<u8>, width: usize, height: usize, palette: Palette) -> Self {
        debug_assert_eq!(
            indices.len(),
            width * height,
            "indices length ({}) must match width * height ({}x{})",
            indices.len(),
            width,
            height,
        );
        Self {
            indices,
            width,
            height,
            palette,
        }
    }

    /// Palette indices in row-major order.
    #[inline]
    pub fn indices(&self) -> &[u8] {
        &self.indices
    }

    /// Image width in pixels.
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Image height in pixels.
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// The palette used for this image.
    #[inline]
    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Render with the palette's output colors, alpha 255.
    pub fn to_rgba(&self) -> PixelBuffer {
        self.render(|i| self.palette.color(i))
    }

    /// Render with the perceived colors (output colors when none are set).
    pub fn to_rgba_perceived(&self) -> PixelBuffer {
        self.render(|i| self.palette.matching_color(i))
    }

    /// Per-entry pixel counts, in palette order.
    pub fn histogram(&self) -> [usize; crate::palette::PALETTE_SIZE] {
        let mut counts = [0usize; crate::palette::PALETTE_SIZE];
        for &idx in &self.indices {
            counts[idx as usize] += 1;
        }
        counts
    }

    fn render(&self, lookup: impl Fn(usize) -> crate::color::Rgb) -> PixelBuffer {
        let colors: Vec<_> = self.indices.iter().map(|&i| lookup(i as usize)).collect();
        PixelBuffer::from_rgb_unchecked(&colors, self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_stores_fields() {
        let image = DitheredImage::new(vec![0, 1, 2, 3, 0, 1], 3, 2, Palette::eink());

        assert_eq!(image.indices(), &[0, 1, 2, 3, 0, 1]);
        assert_eq!(image.width(), 3);
        assert_eq!(image.height(), 2);
        assert_eq!(image.palette().len(), 4);
    }

    #[test]
    fn test_to_rgba_uses_output_colors() {
        let image = DitheredImage::new(vec![3], 1, 1, Palette::eink_perceived());
        assert_eq!(image.to_rgba().as_bytes(), &[255, 255, 0, 255]);
    }

    #[test]
    fn test_to_rgba_perceived_uses_perceived_colors() {
        let image = DitheredImage::new(vec![3], 1, 1, Palette::eink_perceived());
        assert_eq!(image.to_rgba_perceived().as_bytes(), &[198, 166, 26, 255]);
    }

    #[test]
    fn test_perceived_falls_back_to_output() {
        let image = DitheredImage::new(vec![0, 2], 2, 1, Palette::eink());
        assert_eq!(image.to_rgba(), image.to_rgba_perceived());
        assert_eq!(
            image.to_rgba().as_bytes(),
            &[255, 255, 255, 255, 200, 0, 0, 255]
        );
    }

    #[test]
    fn test_histogram_counts() {
        let image = DitheredImage::new(vec![0, 0, 1, 3, 3, 3], 3, 2, Palette::eink());
        assert_eq!(image.histogram(), [2, 1, 0, 3]);
    }
}
