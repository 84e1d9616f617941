use four_color_dither::{DitherError, PaletteError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config error: {0}")]
    Config(#[from] serde_yaml::Error),

    #[error("Palette error: {0}")]
    Palette(#[from] PaletteError),

    #[error("Dither error: {0}")]
    Dither(#[from] DitherError),

    #[error("Raw image size mismatch: {path} holds {actual} bytes, {width}x{height} RGBA needs {expected}")]
    RawSize {
        path: String,
        width: usize,
        height: usize,
        expected: usize,
        actual: usize,
    },
}
