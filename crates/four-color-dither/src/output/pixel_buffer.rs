//! RGBA pixel buffer exchanged with the host application.

use crate::api::DitherError;
use crate::color::Rgb;

/// A width x height grid of straight-alpha RGBA pixels in row-major order.
///
/// Input alpha is ignored by every stage; buffers produced by the pipeline
/// always carry alpha 255.
///
/// ```
/// use four_color_dither::{PixelBuffer, Rgb};
///
/// let buf = PixelBuffer::from_rgb(&[Rgb::new(1, 2, 3), Rgb::new(4, 5, 6)], 2, 1).unwrap();
/// assert_eq!(buf.as_bytes(), &[1, 2, 3, 255, 4, 5, 6, 255]);
/// assert_eq!(buf.pixel(1, 0), Rgb::new(4, 5, 6));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    data: Vec<u8>,
    width: usize,
    height: usize,
}

impl PixelBuffer {
    /// Wrap raw RGBA bytes.
    ///
    /// # Errors
    ///
    /// Returns [`DitherError::BufferSize`] if `data.len() != width * height * 4`
    /// or the dimensions overflow.
    pub fn new(data: Vec<u8>, width: usize, height: usize) -> Result<Self, DitherError> {
        let size_error = |expected| DitherError::BufferSize {
            width,
            height,
            expected,
            actual: data.len(),
        };
        match Self::byte_len(width, height) {
            Some(expected) if expected == data.len() => {}
            Some(expected) => return Err(size_error(expected)),
            None => return Err(size_error(usize::MAX)),
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// Build an opaque buffer from colors.
    ///
    /// # Errors
    ///
    /// Returns [`DitherError::BufferSize`] if `pixels.len() != width * height`.
    pub fn from_rgb(pixels: &[Rgb], width: usize, height: usize) -> Result<Self, DitherError> {
        if width.checked_mul(height) != Some(pixels.len()) {
            return Err(DitherError::BufferSize {
                width,
                height,
                expected: Self::byte_len(width, height).unwrap_or(usize::MAX),
                actual: pixels.len() * 4,
            });
        }
        Ok(Self::from_rgb_unchecked(pixels, width, height))
    }

    /// RGBA byte length of a `width` x `height` image, `None` on overflow.
    pub fn byte_len(width: usize, height: usize) -> Option<usize> {
        width.checked_mul(height)?.checked_mul(4)
    }

    /// Callers guarantee `pixels.len() == width * height`.
    pub(crate) fn from_rgb_unchecked(pixels: &[Rgb], width: usize, height: usize) -> Self {
        let mut data = Vec::with_capacity(pixels.len() * 4);
        for c in pixels {
            data.extend_from_slice(&[c.r, c.g, c.b, 255]);
        }
        Self {
            data,
            width,
            height,
        }
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

    /// Number of pixels.
    #[inline]
    pub fn len(&self) -> usize {
        self.width * self.height
    }

    /// True for a zero-area image.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Raw RGBA bytes.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Consume the buffer and return its RGBA bytes.
    #[inline]
    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    /// Color at (x, y), alpha dropped.
    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> Rgb {
        let i = (y * self.width + x) * 4;
        Rgb::new(self.data[i], self.data[i + 1], self.data[i + 2])
    }

    /// All colors in row-major order, alpha dropped.
    pub fn to_rgb(&self) -> Vec<Rgb> {
        self.data
            .chunks_exact(4)
            .map(|p| Rgb::new(p[0], p[1], p[2]))
            .collect()
    }

    /// True if both buffers have the same dimensions.
    #[inline]
    pub fn same_size(&self, other: &PixelBuffer) -> bool {
        self.width == other.width && self.height == other.height
    }

    /// Fail with [`DitherError::DimensionMismatch`] unless sizes match.
    pub fn check_same_size(&self, other: &PixelBuffer) -> Result<(), DitherError> {
        if self.same_size(other) {
            Ok(())
        } else {
            Err(DitherError::DimensionMismatch {
                left_width: self.width,
                left_height: self.height,
                right_width: other.width,
                right_height: other.height,
            })
        }
    }

    /// Apply a per-pixel color transform, producing a new opaque buffer.
    pub fn map_pixels(&self, mut f: impl FnMut(Rgb) -> Rgb) -> PixelBuffer {
        let mut data = Vec::with_capacity(self.data.len());
        for p in self.data.chunks_exact(4) {
            let c = f(Rgb::new(p[0], p[1], p[2]));
            data.extend_from_slice(&[c.r, c.g, c.b, 255]);
        }
        PixelBuffer {
            data,
            width: self.width,
            height: self.height,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_wrong_length() {
        let err = PixelBuffer::new(vec![0; 15], 2, 2).unwrap_err();
        assert!(matches!(
            err,
            DitherError::BufferSize {
                expected: 16,
                actual: 15,
                ..
            }
        ));

        assert!(PixelBuffer::from_rgb(&[Rgb::new(0, 0, 0); 3], 2, 2).is_err());
    }

    #[test]
    fn test_overflowing_dimensions_are_rejected() {
        assert_eq!(PixelBuffer::byte_len(usize::MAX / 2, 4), None);
        assert_eq!(PixelBuffer::byte_len(3, 2), Some(24));

        let err = PixelBuffer::new(vec![0; 16], usize::MAX / 2, 4).unwrap_err();
        assert!(
            matches!(err, DitherError::BufferSize { expected: usize::MAX, actual: 16, .. }),
            "overflow must be a size error, got {err:?}"
        );
        assert!(PixelBuffer::from_rgb(&[Rgb::new(0, 0, 0); 4], usize::MAX, 2).is_err());
    }

    #[test]
    fn test_input_alpha_is_ignored_and_output_opaque() {
        let buf = PixelBuffer::new(vec![10, 20, 30, 0, 40, 50, 60, 17], 2, 1).unwrap();
        assert_eq!(buf.to_rgb(), vec![Rgb::new(10, 20, 30), Rgb::new(40, 50, 60)]);

        let mapped = buf.map_pixels(|c| c);
        assert_eq!(mapped.as_bytes(), &[10, 20, 30, 255, 40, 50, 60, 255]);
    }

    #[test]
    fn test_pixel_addressing_is_row_major() {
        let colors: Vec<Rgb> = (0..6).map(|i| Rgb::new(i, 0, 0)).collect();
        let buf = PixelBuffer::from_rgb(&colors, 3, 2).unwrap();
        assert_eq!(buf.pixel(2, 0).r, 2);
        assert_eq!(buf.pixel(0, 1).r, 3);
        assert_eq!(buf.len(), 6);
    }

    #[test]
    fn test_dimension_check() {
        let a = PixelBuffer::from_rgb(&[Rgb::default(); 4], 2, 2).unwrap();
        let b = PixelBuffer::from_rgb(&[Rgb::default(); 4], 4, 1).unwrap();
        assert!(a.check_same_size(&a).is_ok());
        assert!(matches!(
            a.check_same_size(&b),
            Err(DitherError::DimensionMismatch { right_width: 4, .. })
        ));
    }

    #[test]
    fn test_empty_image() {
        let buf = PixelBuffer::new(Vec::new(), 0, 0).unwrap();
        assert!(buf.is_empty());
        assert!(buf.to_rgb().is_empty());
    }
}
