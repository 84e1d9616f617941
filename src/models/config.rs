use crate::error::ConvertError;
use four_color_dither::{
    ClaheParams, DistanceMetric, EpaperConverter, GamutMode, GamutSpace, Palette, Rgb,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Pipeline configuration loaded from a YAML file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Output palette as hex strings, in palette order
    #[serde(default = "default_palette")]
    pub palette: Vec<String>,

    /// Colors the panel really shows, matched instead of `palette`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub perceived_palette: Option<Vec<String>>,

    /// Use the built-in perceived colors of the stock panel
    #[serde(default)]
    pub use_perceived_palette: bool,

    #[serde(default)]
    pub gamut: GamutConfig,

    #[serde(default)]
    pub lightness: LightnessConfig,

    #[serde(default)]
    pub dither: DitherConfig,
}

fn default_palette() -> Vec<String> {
    hex_list(&Palette::EINK)
}

fn hex_list(colors: &[Rgb]) -> Vec<String> {
    colors.iter().map(|c| c.to_string()).collect()
}

/// Gamut mapping mode and its parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum GamutConfig {
    Grayout {
        #[serde(default = "default_strength")]
        strength: f64,
    },
    AntiSaturation {
        #[serde(default)]
        space: SpaceConfig,
    },
    CentroidClip {
        #[serde(default)]
        space: SpaceConfig,
    },
    Illuminant {
        #[serde(default = "default_weight")]
        red: f64,
        #[serde(default = "default_weight")]
        yellow: f64,
        #[serde(default = "default_weight")]
        white_preserve: f64,
    },
}

fn default_strength() -> f64 {
    0.7
}

fn default_weight() -> f64 {
    1.0
}

impl Default for GamutConfig {
    fn default() -> Self {
        GamutConfig::Grayout {
            strength: default_strength(),
        }
    }
}

impl From<GamutConfig> for GamutMode {
    fn from(config: GamutConfig) -> Self {
        match config {
            GamutConfig::Grayout { strength } => GamutMode::Grayout { strength },
            GamutConfig::AntiSaturation { space } => GamutMode::AntiSaturation {
                space: space.into(),
            },
            GamutConfig::CentroidClip { space } => GamutMode::CentroidClip {
                space: space.into(),
            },
            GamutConfig::Illuminant {
                red,
                yellow,
                white_preserve,
            } => GamutMode::Illuminant {
                red,
                yellow,
                white_preserve,
            },
        }
    }
}

/// Working space of the tetrahedron modes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpaceConfig {
    #[default]
    Rgb,
    Lab,
}

impl From<SpaceConfig> for GamutSpace {
    fn from(space: SpaceConfig) -> Self {
        match space {
            SpaceConfig::Rgb => GamutSpace::Rgb,
            SpaceConfig::Lab => GamutSpace::Lab,
        }
    }
}

/// CLAHE lightness remapping
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LightnessConfig {
    #[serde(default)]
    pub enabled: bool,

    #[serde(default = "default_clip_limit")]
    pub clip_limit: f64,

    #[serde(default = "default_grid_size")]
    pub grid_size: usize,
}

fn default_clip_limit() -> f64 {
    2.0
}

fn default_grid_size() -> usize {
    8
}

impl Default for LightnessConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            clip_limit: default_clip_limit(),
            grid_size: default_grid_size(),
        }
    }
}

impl LightnessConfig {
    /// CLAHE parameters when enabled
    pub fn params(&self) -> Option<ClaheParams> {
        self.enabled
            .then(|| ClaheParams::new(self.clip_limit, self.grid_size))
    }
}

/// Error diffusion settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DitherConfig {
    /// When false, the gamut-mapped preview is written instead
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    #[serde(default = "default_error_clamp")]
    pub error_clamp: u8,

    #[serde(default = "default_red_penalty")]
    pub red_penalty: f64,

    #[serde(default = "default_yellow_penalty")]
    pub yellow_penalty: f64,

    #[serde(default = "default_weight")]
    pub csf_chroma_weight: f64,

    #[serde(default)]
    pub metric: MetricConfig,
}

fn default_enabled() -> bool {
    true
}

fn default_error_clamp() -> u8 {
    85
}

fn default_red_penalty() -> f64 {
    10.0
}

fn default_yellow_penalty() -> f64 {
    15.0
}

impl Default for DitherConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            error_clamp: default_error_clamp(),
            red_penalty: default_red_penalty(),
            yellow_penalty: default_yellow_penalty(),
            csf_chroma_weight: default_weight(),
            metric: MetricConfig::default(),
        }
    }
}

/// Distance used by the penalized nearest-color search
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricConfig {
    #[default]
    Euclidean,
    Ciede2000,
}

impl From<MetricConfig> for DistanceMetric {
    fn from(metric: MetricConfig) -> Self {
        match metric {
            MetricConfig::Euclidean => DistanceMetric::Euclidean,
            MetricConfig::Ciede2000 => DistanceMetric::Ciede2000,
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            palette: default_palette(),
            perceived_palette: None,
            use_perceived_palette: false,
            gamut: GamutConfig::default(),
            lightness: LightnessConfig::default(),
            dither: DitherConfig::default(),
        }
    }
}

impl PipelineConfig {
    /// Load configuration from a YAML file; an empty file yields the defaults
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConvertError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_yaml_str(&content)?;
        tracing::info!(
            path = %path.display(),
            mode = GamutMode::from(config.gamut).name(),
            lightness = config.lightness.enabled,
            dither = config.dither.enabled,
            "Loaded configuration"
        );
        Ok(config)
    }

    /// Parse configuration from YAML text
    pub fn from_yaml_str(content: &str) -> Result<Self, ConvertError> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    /// Render as YAML
    pub fn to_yaml(&self) -> Result<String, ConvertError> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Build the validated palette
    pub fn palette(&self) -> Result<Palette, ConvertError> {
        let output: Vec<&str> = self.palette.iter().map(String::as_str).collect();
        let builtin = hex_list(&Palette::EINK_PERCEIVED);
        let perceived: Option<Vec<&str>> = match &self.perceived_palette {
            Some(list) => Some(list.iter().map(String::as_str).collect()),
            None if self.use_perceived_palette => Some(builtin.iter().map(String::as_str).collect()),
            None => None,
        };
        Ok(Palette::from_hex(&output, perceived.as_deref())?)
    }

    /// Build a converter for this configuration
    pub fn converter(&self) -> Result<EpaperConverter, ConvertError> {
        Ok(EpaperConverter::new(self.palette()?)
            .gamut(self.gamut.into())
            .lightness(self.lightness.params())
            .error_clamp(self.dither.error_clamp)
            .red_penalty(self.dither.red_penalty)
            .yellow_penalty(self.dither.yellow_penalty)
            .csf_chroma_weight(self.dither.csf_chroma_weight)
            .distance_metric(self.dither.metric.into()))
    }
}
