//! Dithering options and configuration.

use crate::palette::{DistanceMetric, Penalties};

/// Default per-channel error clamp (0..=255 scale).
pub const DEFAULT_ERROR_CLAMP: u8 = 85;
/// Largest accepted error clamp.
pub const MAX_ERROR_CLAMP: u8 = 128;
/// Default red penalty.
pub const DEFAULT_RED_PENALTY: f64 = 10.0;
/// Default yellow penalty.
pub const DEFAULT_YELLOW_PENALTY: f64 = 15.0;
/// Largest accepted penalty weight.
pub const MAX_PENALTY: f64 = 100.0;

/// Configuration options for error diffusion dithering.
///
/// # Defaults
///
/// - Error clamp: 85 (limits blooming from the large quantization steps of
///   a four-color palette)
/// - Red penalty: 10, yellow penalty: 15
/// - CSF chroma weight: 1.0 (no chroma attenuation)
/// - Distance metric: Euclidean Lab
///
/// # Example
///
/// ```
/// use four_color_dither::DitherOptions;
///
/// let options = DitherOptions::new()
///     .error_clamp(0)
///     .red_penalty(0.0)
///     .csf_chroma_weight(0.6);
/// assert_eq!(options.error_clamp, 0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DitherOptions {
    /// Maximum error magnitude per channel; 0 disables clamping.
    pub error_clamp: u8,

    /// Extra distance for red-like entries in bright areas; 0 disables.
    pub red_penalty: f64,

    /// Extra distance for yellow-like entries in dark areas; 0 disables.
    pub yellow_penalty: f64,

    /// Scale of the chroma part of the diffused error (1.0 = unchanged,
    /// 0.0 = luma only).
    pub csf_chroma_weight: f64,

    /// Metric of the penalized nearest-color search. The no-penalty path
    /// always uses the Euclidean lookup table.
    pub distance_metric: DistanceMetric,
}

impl Default for DitherOptions {
    fn default() -> Self {
        Self {
            error_clamp: DEFAULT_ERROR_CLAMP,
            red_penalty: DEFAULT_RED_PENALTY,
            yellow_penalty: DEFAULT_YELLOW_PENALTY,
            csf_chroma_weight: 1.0,
            distance_metric: DistanceMetric::Euclidean,
        }
    }
}

impl DitherOptions {
    /// Create new dither options with default values.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the error clamp, capped at [`MAX_ERROR_CLAMP`].
    #[inline]
    pub fn error_clamp(mut self, clamp: u8) -> Self {
        self.error_clamp = clamp.min(MAX_ERROR_CLAMP);
        self
    }

    /// Set the red penalty, clamped to 0..=100.
    #[inline]
    pub fn red_penalty(mut self, penalty: f64) -> Self {
        self.red_penalty = clamp_penalty(penalty);
        self
    }

    /// Set the yellow penalty, clamped to 0..=100.
    #[inline]
    pub fn yellow_penalty(mut self, penalty: f64) -> Self {
        self.yellow_penalty = clamp_penalty(penalty);
        self
    }

    /// Set the CSF chroma weight, clamped to 0..=1.
    #[inline]
    pub fn csf_chroma_weight(mut self, weight: f64) -> Self {
        self.csf_chroma_weight = if weight.is_nan() { 1.0 } else { weight.clamp(0.0, 1.0) };
        self
    }

    /// Set the metric of the penalized search.
    #[inline]
    pub fn distance_metric(mut self, metric: DistanceMetric) -> Self {
        self.distance_metric = metric;
        self
    }

    /// The red/yellow penalties as one value.
    #[inline]
    pub fn penalties(&self) -> Penalties {
        Penalties::new(self.red_penalty, self.yellow_penalty)
    }
}

fn clamp_penalty(p: f64) -> f64 {
    if p.is_nan() {
        0.0
    } else {
        p.clamp(0.0, MAX_PENALTY)
    }
}
