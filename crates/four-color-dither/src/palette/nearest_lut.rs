//! Precomputed nearest-color lookup table.
//!
//! The RGB cube is sampled in steps of [`LUT_STEP`]; each cell stores the
//! palette index nearest (Euclidean Lab) to the cell's center color. The
//! dither loop uses it only when both penalties are zero, since penalties
//! depend on brightness and cannot be folded into a static table.

use super::palette::Palette;
use crate::color::{Lab, Rgb};

/// Quantization step of each RGB channel.
pub const LUT_STEP: usize = 4;

/// Number of levels per channel (`256 / LUT_STEP`).
pub const LUT_LEVELS: usize = 256 / LUT_STEP;

/// A 64x64x64 table mapping quantized RGB to palette indices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NearestLut {
    table: Vec<u8>,
}

impl NearestLut {
    /// Build the table for `palette`, matching against its perceived colors
    /// when present.
    pub fn build(palette: &Palette) -> Self {
        let mut table = Vec::with_capacity(LUT_LEVELS * LUT_LEVELS * LUT_LEVELS);
        let candidates: Vec<Lab> = (0..palette.len()).map(|i| palette.matching_lab(i)).collect();

        for ri in 0..LUT_LEVELS {
            for gi in 0..LUT_LEVELS {
                for bi in 0..LUT_LEVELS {
                    let center = Rgb::new(cell_center(ri), cell_center(gi), cell_center(bi));
                    let lab = Lab::from(center);

                    let mut best = 0usize;
                    let mut best_dist = f64::INFINITY;
                    for (i, &c) in candidates.iter().enumerate() {
                        let d = lab.distance_squared(c);
                        if d < best_dist {
                            best_dist = d;
                            best = i;
                        }
                    }
                    table.push(best as u8);
                }
            }
        }

        tracing::debug!(
            entries = table.len(),
            perceived = palette.has_perceived(),
            "built nearest-color lookup table"
        );

        Self { table }
    }

    /// Palette index for a color, looked up by its quantized cell.
    #[inline]
    pub fn index(&self, color: Rgb) -> usize {
        let r = color.r as usize / LUT_STEP;
        let g = color.g as usize / LUT_STEP;
        let b = color.b as usize / LUT_STEP;
        self.table[(r * LUT_LEVELS + g) * LUT_LEVELS + b] as usize
    }

    /// Number of cells in the table.
    #[inline]
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Always false for a built table.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

#[inline]
fn cell_center(level: usize) -> u8 {
    (level * LUT_STEP + LUT_STEP / 2) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::{DistanceMetric, Penalties};

    #[test]
    fn test_table_size() {
        let lut = NearestLut::build(&Palette::eink());
        assert_eq!(lut.len(), 64 * 64 * 64);
        assert!(!lut.is_empty());
    }

    #[test]
    fn test_palette_entries_map_to_themselves() {
        let palette = Palette::eink();
        let lut = NearestLut::build(&palette);
        for (i, &c) in palette.colors().iter().enumerate() {
            assert_eq!(lut.index(c), i, "palette entry {c} maps to wrong cell");
        }
    }

    #[test]
    fn test_agrees_with_direct_search_at_cell_centers() {
        let palette = Palette::eink_perceived();
        let lut = NearestLut::build(&palette);
        for level in (0..LUT_LEVELS).step_by(7) {
            let c = Rgb::new(
                cell_center(level),
                cell_center((level * 3) % LUT_LEVELS),
                cell_center((level * 5) % LUT_LEVELS),
            );
            let (direct, _) = palette.find_nearest_with(
                Lab::from(c),
                DistanceMetric::Euclidean,
                Penalties::NONE,
                c.brightness(),
            );
            assert_eq!(lut.index(c), direct, "LUT disagrees with direct search at {c}");
        }
    }

    #[test]
    fn test_cell_lookup_uses_shift() {
        let lut = NearestLut::build(&Palette::eink());
        // All colors in one cell share the answer
        let a = lut.index(Rgb::new(100, 40, 200));
        let b = lut.index(Rgb::new(103, 43, 203));
        assert_eq!(a, b);
    }
}
