use crate::error::ConvertError;
use crate::models::PipelineConfig;
use crate::services::raw_io::{read_rgba, write_rgba};
use four_color_dither::{EpaperConverter, ImageMetrics, PixelBuffer};
use serde::Serialize;
use std::path::Path;

/// Metric report, serializable for the CLI.
///
/// An infinite PSNR (identical images) serializes as `null` in JSON.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MetricsReport {
    pub psnr: f64,
    pub ssim: f64,
    pub mean_delta_e: f64,
    pub histogram_correlation: f64,
    pub composite: f64,
}

impl From<ImageMetrics> for MetricsReport {
    fn from(m: ImageMetrics) -> Self {
        Self {
            psnr: m.psnr,
            ssim: m.ssim,
            mean_delta_e: m.mean_delta_e,
            histogram_correlation: m.histogram_correlation,
            composite: m.composite,
        }
    }
}

/// Runs the configured pipeline on pixel buffers and raw files
pub struct ConversionService {
    config: PipelineConfig,
    converter: EpaperConverter,
}

impl ConversionService {
    pub fn new(config: PipelineConfig) -> Result<Self, ConvertError> {
        let converter = config.converter()?;
        Ok(Self { config, converter })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn converter(&self) -> &EpaperConverter {
        &self.converter
    }

    /// Convert a buffer. With `preview` set, or dithering disabled in the
    /// configuration, the gamut-mapped preview is returned instead.
    pub fn process(&self, input: &PixelBuffer, preview: bool) -> PixelBuffer {
        if preview || !self.config.dither.enabled {
            return self.converter.preview(input);
        }
        let dithered = self.converter.convert(input);
        let counts = dithered.histogram();
        tracing::info!(
            width = dithered.width(),
            height = dithered.height(),
            white = counts[0],
            black = counts[1],
            red = counts[2],
            yellow = counts[3],
            "Converted image"
        );
        dithered.to_rgba()
    }

    /// Convert a raw RGBA file into another raw RGBA file
    pub fn convert_file(
        &self,
        input: &Path,
        output: &Path,
        width: usize,
        height: usize,
        preview: bool,
    ) -> Result<(PixelBuffer, PixelBuffer), ConvertError> {
        let source = read_rgba(input, width, height)?;
        let result = self.process(&source, preview);
        write_rgba(output, &result)?;
        Ok((source, result))
    }

    /// Restore an approximation of the original from a dithered raw file
    pub fn reconvert_file(
        &self,
        input: &Path,
        output: &Path,
        width: usize,
        height: usize,
        blur_radius: u32,
        brightness: f64,
    ) -> Result<PixelBuffer, ConvertError> {
        let dithered = read_rgba(input, width, height)?;
        let restored = self.converter.reconvert(&dithered, blur_radius, brightness);
        write_rgba(output, &restored)?;
        tracing::info!(blur_radius, brightness, "Reconverted image");
        Ok(restored)
    }
}

/// Compare two buffers
pub fn compare(original: &PixelBuffer, reconstructed: &PixelBuffer) -> Result<MetricsReport, ConvertError> {
    Ok(ImageMetrics::compute(original, reconstructed)?.into())
}
