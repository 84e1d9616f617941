pub mod config;

pub use config::{DitherConfig, GamutConfig, LightnessConfig, MetricConfig, PipelineConfig, SpaceConfig};
