//! Error diffusion kernel definitions.

/// An error diffusion kernel.
///
/// Each entry specifies an offset (dx, dy) to a not-yet-visited neighbor
/// and its weight. A neighbor receives `error * weight / divisor`; entries
/// that fall outside the image are skipped without renormalizing the rest.
#[derive(Debug, Clone, Copy)]
pub struct Kernel {
    /// (dx, dy, weight) entries. `dy` is never negative.
    pub entries: &'static [(i32, i32, u8)],

    /// Total divisor for normalizing weights.
    pub divisor: u8,
}

impl Kernel {
    /// Sum of weights over the divisor (1.0 = all error propagated).
    pub fn propagation(&self) -> f64 {
        let sum: u32 = self.entries.iter().map(|&(_, _, w)| w as u32).sum();
        sum as f64 / self.divisor as f64
    }
}

/// Floyd-Steinberg dithering kernel.
///
/// Distributes error to 4 neighbors with 100% total propagation (16/16).
///
/// ```text
///        X   7
///    3   5   1
/// ```
pub const FLOYD_STEINBERG: Kernel = Kernel {
    entries: &[
        (1, 0, 7),  // right
        (-1, 1, 3), // bottom-left
        (0, 1, 5),  // bottom
        (1, 1, 1),  // bottom-right
    ],
    divisor: 16,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_floyd_steinberg_propagates_everything() {
        assert_eq!(FLOYD_STEINBERG.propagation(), 1.0);
    }

    #[test]
    fn test_entries_only_reach_unvisited_pixels() {
        for &(dx, dy, _) in FLOYD_STEINBERG.entries {
            assert!(dy > 0 || dx > 0, "({dx}, {dy}) points at a visited pixel");
            assert!(dy <= 1, "({dx}, {dy}) reaches past the next row");
        }
    }
}
