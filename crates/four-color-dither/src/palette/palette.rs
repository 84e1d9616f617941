//! Four-color palette with optional perceived colors and nearest-color search.
//!
//! The palette stores the *output* colors (the codes written to the panel)
//! and optionally the *perceived* colors (what the panel really shows).
//! Distances are measured against the perceived colors when present, while
//! the red/yellow penalty classification always looks at the output colors.

use std::collections::HashSet;
use std::str::FromStr;

use super::error::PaletteError;
use crate::color::{ciede2000, Lab, Rgb};

/// Number of colors every palette must have.
pub const PALETTE_SIZE: usize = 4;

/// Minimum |det| of the edge vectors (normalized RGB) for a usable tetrahedron.
const MIN_VOLUME_DET: f64 = 1e-9;

/// Distance metric for palette color matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DistanceMetric {
    /// Full CIEDE2000 difference. Used by [`Palette::find_nearest_color`].
    #[default]
    Ciede2000,
    /// Euclidean Lab distance (CIE76). Cheaper; used by the dither loop and
    /// the lookup table.
    Euclidean,
}

impl DistanceMetric {
    /// Distance between two Lab colors under this metric.
    #[inline]
    pub fn distance(self, a: Lab, b: Lab) -> f64 {
        match self {
            DistanceMetric::Ciede2000 => ciede2000(a, b),
            DistanceMetric::Euclidean => a.delta_e76(b),
        }
    }
}

/// Red/yellow classification penalties added to the distance of matching
/// palette entries.
///
/// A red-like entry costs `red * brightness` extra, a yellow-like entry
/// costs `yellow * (1 - brightness)`. This discourages red dots in
/// highlights and yellow dots in shadows. Zero disables a penalty.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Penalties {
    /// Penalty weight for red-like entries (applied in bright areas)
    pub red: f64,
    /// Penalty weight for yellow-like entries (applied in dark areas)
    pub yellow: f64,
}

impl Penalties {
    /// No penalties.
    pub const NONE: Penalties = Penalties {
        red: 0.0,
        yellow: 0.0,
    };

    /// Create penalties from red and yellow weights.
    #[inline]
    pub const fn new(red: f64, yellow: f64) -> Self {
        Self { red, yellow }
    }

    /// True if either penalty is enabled.
    #[inline]
    pub fn is_active(self) -> bool {
        self.red > 0.0 || self.yellow > 0.0
    }

    /// Extra distance for a palette entry given the query brightness.
    #[inline]
    pub fn cost(self, entry: Rgb, brightness: f64) -> f64 {
        if self.red > 0.0 && entry.is_red_like() {
            self.red * brightness
        } else if self.yellow > 0.0 && entry.is_yellow_like() {
            self.yellow * (1.0 - brightness)
        } else {
            0.0
        }
    }
}

/// A four-color e-paper palette.
///
/// Order is significant: it is the tie-break order of every nearest-color
/// search. All Lab coordinates are computed once at construction.
///
/// # Example
///
/// ```
/// use four_color_dither::{Palette, Rgb};
///
/// let palette = Palette::eink();
/// assert_eq!(palette.len(), 4);
/// assert_eq!(palette.color(2), Rgb::new(200, 0, 0));
///
/// let custom = Palette::from_hex(&["#FFFFFF", "#000000", "#C80000", "#FFFF00"], None).unwrap();
/// assert_eq!(custom.colors(), palette.colors());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    output: [Rgb; PALETTE_SIZE],
    perceived: Option<[Rgb; PALETTE_SIZE]>,
    output_lab: [Lab; PALETTE_SIZE],
    matching_lab: [Lab; PALETTE_SIZE],
    distance_metric: DistanceMetric,
}

impl Palette {
    /// The stock 4-color e-paper palette: white, black, red, yellow.
    pub const EINK: [Rgb; PALETTE_SIZE] = [
        Rgb::new(255, 255, 255),
        Rgb::new(0, 0, 0),
        Rgb::new(200, 0, 0),
        Rgb::new(255, 255, 0),
    ];

    /// How [`Palette::EINK`] actually looks on a typical panel.
    pub const EINK_PERCEIVED: [Rgb; PALETTE_SIZE] = [
        Rgb::new(177, 175, 157),
        Rgb::new(46, 38, 43),
        Rgb::new(177, 51, 37),
        Rgb::new(198, 166, 26),
    ];

    /// Create a palette from four output colors and optional perceived colors.
    ///
    /// # Errors
    ///
    /// - [`PaletteError::WrongSize`] unless exactly four colors are given
    /// - [`PaletteError::LengthMismatch`] if `perceived` has another length
    /// - [`PaletteError::DuplicateColor`] if either set repeats a color
    /// - [`PaletteError::Degenerate`] if the output colors are coplanar
    pub fn new(output: &[Rgb], perceived: Option<&[Rgb]>) -> Result<Self, PaletteError> {
        let output: [Rgb; PALETTE_SIZE] =
            output.try_into().map_err(|_| PaletteError::WrongSize {
                expected: PALETTE_SIZE,
                actual: output.len(),
            })?;

        let perceived: Option<[Rgb; PALETTE_SIZE]> = match perceived {
            Some(p) => Some(p.try_into().map_err(|_| PaletteError::LengthMismatch {
                output: PALETTE_SIZE,
                perceived: p.len(),
            })?),
            None => None,
        };

        check_duplicates(&output)?;
        if let Some(p) = &perceived {
            check_duplicates(p)?;
        }
        if volume_det(&output).abs() < MIN_VOLUME_DET {
            return Err(PaletteError::Degenerate);
        }

        let output_lab = output.map(Lab::from);
        let matching_lab = match &perceived {
            Some(p) => p.map(Lab::from),
            None => output_lab,
        };

        Ok(Self {
            output,
            perceived,
            output_lab,
            matching_lab,
            distance_metric: DistanceMetric::default(),
        })
    }

    /// The stock palette without perceived colors.
    pub fn eink() -> Self {
        Self {
            output: Self::EINK,
            perceived: None,
            output_lab: Self::EINK.map(Lab::from),
            matching_lab: Self::EINK.map(Lab::from),
            distance_metric: DistanceMetric::default(),
        }
    }

    /// The stock palette matched against its perceived colors.
    pub fn eink_perceived() -> Self {
        Self {
            perceived: Some(Self::EINK_PERCEIVED),
            matching_lab: Self::EINK_PERCEIVED.map(Lab::from),
            ..Self::eink()
        }
    }

    /// Create a palette from hex color strings.
    ///
    /// # Errors
    ///
    /// Returns [`PaletteError::ParseColor`] if any hex string is invalid,
    /// or the validation errors of [`Palette::new`].
    pub fn from_hex(output: &[&str], perceived: Option<&[&str]>) -> Result<Self, PaletteError> {
        let output_rgb: Vec<Rgb> = output
            .iter()
            .map(|s| Rgb::from_str(s).map_err(PaletteError::ParseColor))
            .collect::<Result<Vec<_>, _>>()?;
        let perceived_rgb = match perceived {
            Some(p) => Some(
                p.iter()
                    .map(|s| Rgb::from_str(s).map_err(PaletteError::ParseColor))
                    .collect::<Result<Vec<_>, _>>()?,
            ),
            None => None,
        };
        Palette::new(&output_rgb, perceived_rgb.as_deref())
    }

    /// Override the metric used by [`find_nearest`](Self::find_nearest).
    pub fn with_distance_metric(mut self, metric: DistanceMetric) -> Self {
        self.distance_metric = metric;
        self
    }

    /// The metric used by [`find_nearest`](Self::find_nearest).
    #[inline]
    pub fn distance_metric(&self) -> DistanceMetric {
        self.distance_metric
    }

    /// Number of colors (always 4).
    #[inline]
    pub fn len(&self) -> usize {
        self.output.len()
    }

    /// Always false; empty palettes cannot be constructed.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.output.is_empty()
    }

    /// All output colors in palette order.
    #[inline]
    pub fn colors(&self) -> &[Rgb; PALETTE_SIZE] {
        &self.output
    }

    /// Output color at `idx`.
    #[inline]
    pub fn color(&self, idx: usize) -> Rgb {
        self.output[idx]
    }

    /// True if perceived colors were supplied.
    #[inline]
    pub fn has_perceived(&self) -> bool {
        self.perceived.is_some()
    }

    /// Color used for matching and error computation at `idx`: the
    /// perceived color if present, otherwise the output color.
    #[inline]
    pub fn matching_color(&self, idx: usize) -> Rgb {
        match &self.perceived {
            Some(p) => p[idx],
            None => self.output[idx],
        }
    }

    /// Lab coordinates of the output color at `idx`.
    #[inline]
    pub fn output_lab(&self, idx: usize) -> Lab {
        self.output_lab[idx]
    }

    /// Lab coordinates of the matching color at `idx`.
    #[inline]
    pub fn matching_lab(&self, idx: usize) -> Lab {
        self.matching_lab[idx]
    }

    /// Nearest palette entry under the palette's own metric.
    ///
    /// Returns `(index, distance)` where distance includes any penalty.
    #[inline]
    pub fn find_nearest(&self, color: Lab, penalties: Penalties, brightness: f64) -> (usize, f64) {
        self.find_nearest_with(color, self.distance_metric, penalties, brightness)
    }

    /// Nearest palette entry under an explicit metric.
    ///
    /// Linear scan over the four entries. The comparison is strict, so the
    /// first entry in palette order wins ties.
    pub fn find_nearest_with(
        &self,
        color: Lab,
        metric: DistanceMetric,
        penalties: Penalties,
        brightness: f64,
    ) -> (usize, f64) {
        let mut best_idx = 0;
        let mut best_dist = f64::INFINITY;

        for (i, &candidate) in self.matching_lab.iter().enumerate() {
            let dist =
                metric.distance(color, candidate) + penalties.cost(self.output[i], brightness);
            if dist < best_dist {
                best_dist = dist;
                best_idx = i;
            }
        }

        (best_idx, best_dist)
    }

    /// Return the output color nearest to `color` under CIEDE2000.
    ///
    /// `brightness` is the BT.709 luma of the query normalized to 0..=1
    /// (see [`Rgb::brightness`]); it only matters when a penalty is set.
    ///
    /// ```
    /// use four_color_dither::{Palette, Rgb};
    ///
    /// let palette = Palette::eink();
    /// let c = Rgb::new(255, 255, 0);
    /// assert_eq!(palette.find_nearest_color(c, 0.0, 0.0, c.brightness()), c);
    /// ```
    pub fn find_nearest_color(
        &self,
        color: Rgb,
        red_penalty: f64,
        yellow_penalty: f64,
        brightness: f64,
    ) -> Rgb {
        let (idx, _) = self.find_nearest_with(
            Lab::from(color),
            DistanceMetric::Ciede2000,
            Penalties::new(red_penalty, yellow_penalty),
            brightness,
        );
        self.output[idx]
    }
}

fn check_duplicates(colors: &[Rgb]) -> Result<(), PaletteError> {
    let mut seen = HashSet::new();
    for (i, color) in colors.iter().enumerate() {
        if !seen.insert(*color) {
            return Err(PaletteError::DuplicateColor { index: i });
        }
    }
    Ok(())
}

/// Determinant of the three edge vectors from vertex 0, in normalized RGB.
fn volume_det(colors: &[Rgb; PALETTE_SIZE]) -> f64 {
    let v = colors.map(|c| c.to_f64().map(|x| x / 255.0));
    let e = |i: usize| [v[i][0] - v[0][0], v[i][1] - v[0][1], v[i][2] - v[0][2]];
    let (a, b, c) = (e(1), e(2), e(3));
    a[0] * (b[1] * c[2] - b[2] * c[1]) - a[1] * (b[0] * c[2] - b[2] * c[0])
        + a[2] * (b[0] * c[1] - b[1] * c[0])
}
