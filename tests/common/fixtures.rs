//! Test fixtures: synthetic images written to a scratch directory.

use epaper_palette::services::write_rgba;
use four_color_dither::{PixelBuffer, Rgb};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Image dimensions used by most tests
pub const WIDTH: usize = 24;
pub const HEIGHT: usize = 16;

/// A sweep over hue and lightness, including out-of-gamut blues and greens
pub fn sweep(width: usize, height: usize) -> PixelBuffer {
    let px: Vec<Rgb> = (0..width * height)
        .map(|i| {
            let (x, y) = (i % width, i / width);
            let r = (x * 255 / (width - 1)) as u8;
            let g = (y * 255 / (height - 1)) as u8;
            let b = ((x + y) * 255 / (width + height - 2)) as u8;
            Rgb::new(r, g, 255 - b)
        })
        .collect();
    PixelBuffer::from_rgb(&px, width, height).unwrap()
}

/// A raw RGBA image on disk plus its scratch directory
pub struct TestImage {
    pub dir: TempDir,
    pub input: PathBuf,
    pub buffer: PixelBuffer,
}

impl TestImage {
    /// Write the default sweep image
    pub fn new() -> Self {
        Self::with_buffer(sweep(WIDTH, HEIGHT))
    }

    pub fn with_buffer(buffer: PixelBuffer) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("input.rgba");
        write_rgba(&input, &buffer).unwrap();
        Self { dir, input, buffer }
    }

    /// Path for a scratch file in the test directory
    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    /// Write a YAML configuration into the test directory
    pub fn write_config(&self, yaml: &str) -> PathBuf {
        let path = self.path("config.yaml");
        std::fs::write(&path, yaml).unwrap();
        path
    }
}

pub fn read_bytes(path: &Path) -> Vec<u8> {
    std::fs::read(path).unwrap()
}
