//! Unified error type for the public API.
//!
//! [`DitherError`] wraps all error types from the crate into a single enum
//! for convenient `?` propagation in application code.

use thiserror::Error;

use crate::palette::{PaletteError, ParseColorError};

/// Unified error type for the public API.
///
/// Pixel values never produce errors; only structural preconditions do
/// (palette shape, buffer length, mismatched image sizes).
///
/// # Example
///
/// ```
/// use four_color_dither::{DitherError, Palette};
///
/// fn create_palette() -> Result<Palette, DitherError> {
///     let palette = Palette::from_hex(&["#FFFFFF", "#000000", "#C80000", "#FFFF00"], None)?;
///     Ok(palette)
/// }
/// # assert!(create_palette().is_ok());
/// ```
#[derive(Debug, Error)]
pub enum DitherError {
    /// Palette validation error
    #[error("palette error: {0}")]
    Palette(#[from] PaletteError),

    /// Color parsing error (invalid hex string)
    #[error("color parse error: {0}")]
    ParseColor(#[from] ParseColorError),

    /// RGBA byte length does not match the declared dimensions
    #[error("buffer of {actual} bytes does not match {width}x{height} RGBA ({expected} bytes)")]
    BufferSize {
        width: usize,
        height: usize,
        expected: usize,
        actual: usize,
    },

    /// Two images that must be compared have different sizes
    #[error("image dimensions differ: {left_width}x{left_height} vs {right_width}x{right_height}")]
    DimensionMismatch {
        left_width: usize,
        left_height: usize,
        right_width: usize,
        right_height: usize,
    },
}
