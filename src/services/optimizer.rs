//! Parameter search for the conversion pipeline.
//!
//! A candidate configuration is scored by converting the source, restoring
//! it with a fixed blur radius of 1 and neutral brightness, and taking the
//! composite similarity of the restoration against the source. The search
//! is deterministic: one coordinate pass over every parameter's coarse grid,
//! then a second pass over the fine grid around the best value found.

use crate::error::ConvertError;
use crate::models::{GamutConfig, PipelineConfig};
use crate::services::converter::MetricsReport;
use four_color_dither::{EpaperConverter, ImageMetrics, PixelBuffer};

/// Blur radius used to restore each candidate
pub const RECONVERT_BLUR_RADIUS: u32 = 1;

/// Brightness factor used to restore each candidate
pub const RECONVERT_BRIGHTNESS: f64 = 1.0;

/// Default evaluation budget, the starting configuration included
pub const DEFAULT_MAX_EVALUATIONS: usize = 150;

const GRID_EPSILON: f64 = 1e-9;

/// A tunable pipeline parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Param {
    GamutStrength,
    IlluminantRed,
    IlluminantYellow,
    IlluminantWhite,
    ErrorClamp,
    RedPenalty,
    YellowPenalty,
    CsfChromaWeight,
}

/// Search range of a parameter
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamRange {
    pub min: f64,
    pub max: f64,
    pub coarse_step: f64,
    pub fine_step: f64,
}

const UNIT_RANGE: ParamRange = ParamRange {
    min: 0.0,
    max: 1.0,
    coarse_step: 0.2,
    fine_step: 0.05,
};

const PENALTY_RANGE: ParamRange = ParamRange {
    min: 0.0,
    max: 100.0,
    coarse_step: 20.0,
    fine_step: 5.0,
};

const CLAMP_RANGE: ParamRange = ParamRange {
    min: 0.0,
    max: 128.0,
    coarse_step: 32.0,
    fine_step: 8.0,
};

/// Dithering parameters searched in every mode
const DITHER_PARAMS: [Param; 4] = [
    Param::ErrorClamp,
    Param::RedPenalty,
    Param::YellowPenalty,
    Param::CsfChromaWeight,
];

impl Param {
    /// Parameters searched for a gamut mode, mode parameters first
    pub fn for_mode(gamut: &GamutConfig) -> Vec<Param> {
        let mode_params: &[Param] = match gamut {
            GamutConfig::Grayout { .. } => &[Param::GamutStrength],
            GamutConfig::Illuminant { .. } => &[
                Param::IlluminantRed,
                Param::IlluminantYellow,
                Param::IlluminantWhite,
            ],
            GamutConfig::AntiSaturation { .. } | GamutConfig::CentroidClip { .. } => &[],
        };
        mode_params.iter().chain(DITHER_PARAMS.iter()).copied().collect()
    }

    /// Configuration key of the parameter
    pub fn name(self) -> &'static str {
        match self {
            Param::GamutStrength => "strength",
            Param::IlluminantRed => "red",
            Param::IlluminantYellow => "yellow",
            Param::IlluminantWhite => "white_preserve",
            Param::ErrorClamp => "error_clamp",
            Param::RedPenalty => "red_penalty",
            Param::YellowPenalty => "yellow_penalty",
            Param::CsfChromaWeight => "csf_chroma_weight",
        }
    }

    pub fn range(self) -> ParamRange {
        match self {
            Param::ErrorClamp => CLAMP_RANGE,
            Param::RedPenalty | Param::YellowPenalty => PENALTY_RANGE,
            _ => UNIT_RANGE,
        }
    }

    /// Current value in `config`. Mode parameters of another mode read as
    /// the range minimum.
    pub fn get(self, config: &PipelineConfig) -> f64 {
        match (self, config.gamut) {
            (Param::GamutStrength, GamutConfig::Grayout { strength }) => strength,
            (Param::IlluminantRed, GamutConfig::Illuminant { red, .. }) => red,
            (Param::IlluminantYellow, GamutConfig::Illuminant { yellow, .. }) => yellow,
            (Param::IlluminantWhite, GamutConfig::Illuminant { white_preserve, .. }) => white_preserve,
            (Param::ErrorClamp, _) => config.dither.error_clamp as f64,
            (Param::RedPenalty, _) => config.dither.red_penalty,
            (Param::YellowPenalty, _) => config.dither.yellow_penalty,
            (Param::CsfChromaWeight, _) => config.dither.csf_chroma_weight,
            _ => self.range().min,
        }
    }

    /// Store `value` in `config`. Mode parameters of another mode are ignored.
    pub fn set(self, config: &mut PipelineConfig, value: f64) {
        match (self, &mut config.gamut) {
            (Param::GamutStrength, GamutConfig::Grayout { strength }) => *strength = value,
            (Param::IlluminantRed, GamutConfig::Illuminant { red, .. }) => *red = value,
            (Param::IlluminantYellow, GamutConfig::Illuminant { yellow, .. }) => *yellow = value,
            (Param::IlluminantWhite, GamutConfig::Illuminant { white_preserve, .. }) => {
                *white_preserve = value
            }
            (Param::ErrorClamp, _) => {
                config.dither.error_clamp = value.round().clamp(0.0, CLAMP_RANGE.max) as u8
            }
            (Param::RedPenalty, _) => config.dither.red_penalty = value,
            (Param::YellowPenalty, _) => config.dither.yellow_penalty = value,
            (Param::CsfChromaWeight, _) => config.dither.csf_chroma_weight = value,
            _ => {}
        }
    }
}

impl ParamRange {
    /// Grid points `min + k * step` inside `lo..=hi`
    fn grid(&self, lo: f64, hi: f64, step: f64) -> Vec<f64> {
        let first = ((lo - self.min) / step - GRID_EPSILON).ceil() as i64;
        let last = ((hi - self.min) / step + GRID_EPSILON).floor() as i64;
        (first..=last).map(|k| self.min + k as f64 * step).collect()
    }

    /// Coarse grid over the whole range
    pub fn coarse_grid(&self) -> Vec<f64> {
        self.grid(self.min, self.max, self.coarse_step)
    }

    /// Fine grid within one coarse step of `center`, clipped to the range
    pub fn fine_grid(&self, center: f64) -> Vec<f64> {
        let lo = (center - self.coarse_step).max(self.min);
        let hi = (center + self.coarse_step).min(self.max);
        self.grid(lo, hi, self.fine_step)
    }
}

/// Outcome of a search
#[derive(Debug, Clone)]
pub struct OptimizeResult {
    /// Best configuration found; equals the input when nothing scored higher
    pub config: PipelineConfig,
    pub score: f64,
    pub initial_score: f64,
    pub metrics: MetricsReport,
    /// Candidates scored, the starting configuration included
    pub evaluations: usize,
}

/// Searches the mode and dithering parameters of a configuration.
///
/// Palette, lightness remapping and distance metric stay as configured.
pub struct Optimizer {
    config: PipelineConfig,
    base: EpaperConverter,
    max_evaluations: usize,
}

impl Optimizer {
    pub fn new(config: PipelineConfig) -> Result<Self, ConvertError> {
        let base = config.converter()?;
        // Candidates are clones of `base` and share its table
        base.lut();
        Ok(Self {
            config,
            base,
            max_evaluations: DEFAULT_MAX_EVALUATIONS,
        })
    }

    /// Limit the number of scored candidates (at least 1)
    pub fn max_evaluations(mut self, max: usize) -> Self {
        self.max_evaluations = max.max(1);
        self
    }

    fn converter_for(&self, config: &PipelineConfig) -> EpaperConverter {
        self.base
            .clone()
            .gamut(config.gamut.into())
            .error_clamp(config.dither.error_clamp)
            .red_penalty(config.dither.red_penalty)
            .yellow_penalty(config.dither.yellow_penalty)
            .csf_chroma_weight(config.dither.csf_chroma_weight)
    }

    /// Convert, restore and compare one configuration
    pub fn score(&self, source: &PixelBuffer, config: &PipelineConfig) -> Result<ImageMetrics, ConvertError> {
        let converter = self.converter_for(config);
        let dithered = converter.convert(source).to_rgba();
        let restored = converter.reconvert(&dithered, RECONVERT_BLUR_RADIUS, RECONVERT_BRIGHTNESS);
        Ok(ImageMetrics::compute(source, &restored)?)
    }

    /// Search for the configuration with the highest composite score.
    ///
    /// Only strict improvements are kept, so the result never scores below
    /// the starting configuration.
    pub fn optimize(&self, source: &PixelBuffer) -> Result<OptimizeResult, ConvertError> {
        let params = Param::for_mode(&self.config.gamut);
        let mut best = self.config.clone();
        let initial_score = self.score(source, &best)?.composite;
        let mut best_score = initial_score;
        let mut evaluations = 1;

        'search: for fine in [false, true] {
            for &param in &params {
                let range = param.range();
                let current = param.get(&best);
                let values = if fine {
                    range.fine_grid(current)
                } else {
                    range.coarse_grid()
                };

                for value in values {
                    if (value - current).abs() < GRID_EPSILON {
                        continue;
                    }
                    if evaluations >= self.max_evaluations {
                        break 'search;
                    }
                    let mut candidate = best.clone();
                    param.set(&mut candidate, value);
                    let score = self.score(source, &candidate)?.composite;
                    evaluations += 1;

                    if score > best_score {
                        tracing::debug!(param = param.name(), value, score, "Improved score");
                        best_score = score;
                        best = candidate;
                    }
                }
            }
        }

        let metrics = MetricsReport::from(self.score(source, &best)?);
        tracing::info!(
            evaluations,
            initial_score,
            score = best_score,
            psnr = metrics.psnr,
            ssim = metrics.ssim,
            blur_radius = RECONVERT_BLUR_RADIUS,
            brightness = RECONVERT_BRIGHTNESS,
            "Optimization finished"
        );

        Ok(OptimizeResult {
            config: best,
            score: best_score,
            initial_score,
            metrics,
            evaluations,
        })
    }
}
