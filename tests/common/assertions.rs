//! Assertion helpers for tests.

use four_color_dither::{PixelBuffer, Rgb};
use pretty_assertions::assert_eq;

/// Assert every pixel is one of `colors` and fully opaque
pub fn assert_palette_exact(buffer: &PixelBuffer, colors: &[Rgb]) {
    for (i, chunk) in buffer.as_bytes().chunks_exact(4).enumerate() {
        let c = Rgb::new(chunk[0], chunk[1], chunk[2]);
        assert!(
            colors.contains(&c),
            "Pixel {} ({}, {}) is {}, not a palette color",
            i,
            i % buffer.width(),
            i / buffer.width(),
            c
        );
        assert_eq!(chunk[3], 255, "Pixel {i} is not opaque");
    }
}

/// Assert a raw RGBA file has the size of a width x height image
pub fn assert_raw_size(bytes: &[u8], width: usize, height: usize) {
    assert_eq!(
        bytes.len(),
        width * height * 4,
        "Expected {}x{} RGBA ({} bytes), got {} bytes",
        width,
        height,
        width * height * 4,
        bytes.len()
    );
}
