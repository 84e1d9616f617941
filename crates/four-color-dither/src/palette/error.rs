//! Error types for palette operations

use std::num::ParseIntError;

use thiserror::Error;

/// Error type for parsing hex color strings.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseColorError {
    /// Hex string has invalid length (must be 3 or 6 characters after stripping '#')
    #[error("invalid hex color length (expected 3 or 6 characters)")]
    InvalidLength,
    /// Invalid hexadecimal character encountered
    #[error("invalid hex character: {0}")]
    InvalidHex(#[from] ParseIntError),
}

/// Error type for palette validation.
///
/// The gamut-mapping geometry needs exactly four colors spanning a real
/// volume, so anything else is rejected when the palette is built.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaletteError {
    /// Palette does not have exactly four colors
    #[error("palette must contain exactly {expected} colors, got {actual}")]
    WrongSize {
        /// Required number of colors
        expected: usize,
        /// Number of colors supplied
        actual: usize,
    },
    /// Duplicate color found at the specified index
    #[error("duplicate color found at index {index}")]
    DuplicateColor {
        /// Index where the duplicate was found
        index: usize,
    },
    /// Output and perceived palette lengths don't match
    #[error("palette length mismatch: output has {output} colors, perceived has {perceived}")]
    LengthMismatch {
        /// Length of the output palette
        output: usize,
        /// Length of the perceived palette
        perceived: usize,
    },
    /// The four colors are (nearly) coplanar
    #[error("palette colors do not span a tetrahedron")]
    Degenerate,
    /// Invalid hex color string
    #[error("invalid color: {0}")]
    ParseColor(#[from] ParseColorError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = PaletteError::WrongSize {
            expected: 4,
            actual: 3,
        };
        assert_eq!(
            err.to_string(),
            "palette must contain exactly 4 colors, got 3"
        );
        assert_eq!(
            PaletteError::DuplicateColor { index: 2 }.to_string(),
            "duplicate color found at index 2"
        );
        assert_eq!(
            PaletteError::Degenerate.to_string(),
            "palette colors do not span a tetrahedron"
        );
    }

    #[test]
    fn test_parse_error_is_wrapped() {
        let inner = ParseColorError::InvalidLength;
        let err: PaletteError = inner.clone().into();
        assert_eq!(err, PaletteError::ParseColor(inner));
        assert!(err.to_string().starts_with("invalid color: "));
    }
}
