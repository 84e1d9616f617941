//! Raw RGBA file I/O.
//!
//! Files hold `width * height * 4` bytes of straight RGBA in row-major
//! order with no header, as produced by e.g.
//! `convert photo.jpg -depth 8 rgba:photo.rgba`.

use crate::error::ConvertError;
use four_color_dither::PixelBuffer;
use std::path::Path;

/// Read a raw RGBA file of the given dimensions
pub fn read_rgba(path: impl AsRef<Path>, width: usize, height: usize) -> Result<PixelBuffer, ConvertError> {
    let path = path.as_ref();
    let size_error = |expected, actual| ConvertError::RawSize {
        path: path.display().to_string(),
        width,
        height,
        expected,
        actual,
    };
    let expected = match PixelBuffer::byte_len(width, height) {
        Some(expected) => expected,
        None => {
            let actual = std::fs::metadata(path)?.len() as usize;
            return Err(size_error(usize::MAX, actual));
        }
    };
    let data = std::fs::read(path)?;
    if data.len() != expected {
        return Err(size_error(expected, data.len()));
    }
    tracing::debug!(path = %path.display(), width, height, "Read raw RGBA");
    Ok(PixelBuffer::new(data, width, height)?)
}

/// Write a buffer as raw RGBA
pub fn write_rgba(path: impl AsRef<Path>, buffer: &PixelBuffer) -> Result<(), ConvertError> {
    let path = path.as_ref();
    std::fs::write(path, buffer.as_bytes())?;
    tracing::debug!(
        path = %path.display(),
        width = buffer.width(),
        height = buffer.height(),
        "Wrote raw RGBA"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use four_color_dither::Rgb;

    #[test]
    fn test_write_then_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("img.rgba");
        let buffer = PixelBuffer::from_rgb(&[Rgb::new(1, 2, 3), Rgb::new(250, 128, 0)], 2, 1).unwrap();

        write_rgba(&path, &buffer).unwrap();
        assert_eq!(std::fs::metadata(&path).unwrap().len(), 8);
        assert_eq!(read_rgba(&path, 2, 1).unwrap(), buffer);
    }

    #[test]
    fn test_read_wrong_size() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("short.rgba");
        std::fs::write(&path, [0u8; 10]).unwrap();

        match read_rgba(&path, 2, 2) {
            Err(ConvertError::RawSize {
                expected, actual, ..
            }) => {
                assert_eq!(expected, 16);
                assert_eq!(actual, 10);
            }
            other => panic!("Expected RawSize error, got {other:?}"),
        }
    }

    #[test]
    fn test_read_overflowing_dimensions() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tiny.rgba");
        std::fs::write(&path, [0u8; 16]).unwrap();

        match read_rgba(&path, usize::MAX / 2, 4) {
            Err(ConvertError::RawSize {
                expected, actual, ..
            }) => {
                assert_eq!(expected, usize::MAX, "overflow reports a saturated size");
                assert_eq!(actual, 16);
            }
            other => panic!("Expected RawSize error, got {other:?}"),
        }
    }

    #[test]
    fn test_read_missing_file() {
        let result = read_rgba("/nonexistent/missing.rgba", 1, 1);
        assert!(matches!(result, Err(ConvertError::Io(_))));
    }
}
