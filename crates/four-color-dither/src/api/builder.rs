//! EpaperConverter builder -- the primary ergonomic entry point for the crate.
//!
//! [`EpaperConverter`] wraps gamut mapping, optional lightness remapping and
//! Floyd-Steinberg dithering behind fluent configuration.

use std::sync::OnceLock;
use std::time::Instant;

use crate::dither::{dither_with_kernel, DitherOptions, FLOYD_STEINBERG};
use crate::gamut::{GamutMapper, GamutMode};
use crate::lightness::{clahe_lightness, ClaheParams};
use crate::output::{DitheredImage, PixelBuffer};
use crate::palette::{DistanceMetric, NearestLut, Palette};
use crate::reconvert::{reconvert, ReconvertParams};

/// High-level converter for four-color e-paper displays.
///
/// # Design
///
/// - Constructor requires a [`Palette`] (no invalid states)
/// - Configuration methods consume and return `self` and clamp their
///   arguments into the supported ranges
/// - [`convert()`](Self::convert) takes `&self` so the converter is
///   **reusable** across images; the nearest-color lookup table is built on
///   first use and kept for the converter's lifetime
///
/// # Example
///
/// ```
/// use four_color_dither::{EpaperConverter, GamutMode, Palette, PixelBuffer, Rgb};
///
/// let converter = EpaperConverter::new(Palette::eink())
///     .gamut(GamutMode::Grayout { strength: 0.7 })
///     .error_clamp(85);
///
/// let input = PixelBuffer::from_rgb(&vec![Rgb::new(128, 128, 128); 4], 2, 2).unwrap();
/// let result = converter.convert(&input);
///
/// assert_eq!(result.width(), 2);
/// assert_eq!(result.height(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct EpaperConverter {
    palette: Palette,
    gamut: GamutMode,
    lightness: Option<ClaheParams>,
    dither_opts: DitherOptions,
    lut: OnceLock<NearestLut>,
}

impl EpaperConverter {
    /// Create a converter for `palette`.
    ///
    /// Defaults: Grayout at strength 0.7, no lightness remapping, error
    /// clamp 85, red penalty 10, yellow penalty 15, no chroma attenuation.
    pub fn new(palette: Palette) -> Self {
        Self {
            palette,
            gamut: GamutMode::default(),
            lightness: None,
            dither_opts: DitherOptions::new(),
            lut: OnceLock::new(),
        }
    }

    /// Set the gamut mapping mode.
    #[inline]
    pub fn gamut(mut self, mode: GamutMode) -> Self {
        self.gamut = mode.clamped();
        self
    }

    /// Enable CLAHE lightness remapping with `params`, or disable it with `None`.
    #[inline]
    pub fn lightness(mut self, params: Option<ClaheParams>) -> Self {
        self.lightness = params.map(ClaheParams::clamped);
        self
    }

    /// Set the per-channel error clamp (0 disables).
    #[inline]
    pub fn error_clamp(mut self, clamp: u8) -> Self {
        self.dither_opts = self.dither_opts.error_clamp(clamp);
        self
    }

    /// Set the red penalty (0 disables).
    #[inline]
    pub fn red_penalty(mut self, penalty: f64) -> Self {
        self.dither_opts = self.dither_opts.red_penalty(penalty);
        self
    }

    /// Set the yellow penalty (0 disables).
    #[inline]
    pub fn yellow_penalty(mut self, penalty: f64) -> Self {
        self.dither_opts = self.dither_opts.yellow_penalty(penalty);
        self
    }

    /// Set the CSF chroma weight of the diffused error.
    #[inline]
    pub fn csf_chroma_weight(mut self, weight: f64) -> Self {
        self.dither_opts = self.dither_opts.csf_chroma_weight(weight);
        self
    }

    /// Set the metric of the penalized nearest-color search.
    #[inline]
    pub fn distance_metric(mut self, metric: DistanceMetric) -> Self {
        self.dither_opts = self.dither_opts.distance_metric(metric);
        self
    }

    /// The palette.
    #[inline]
    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// The gamut mode.
    #[inline]
    pub fn gamut_mode(&self) -> GamutMode {
        self.gamut
    }

    /// The lightness remapping parameters, if enabled.
    #[inline]
    pub fn lightness_params(&self) -> Option<ClaheParams> {
        self.lightness
    }

    /// The dithering options.
    #[inline]
    pub fn dither_options(&self) -> &DitherOptions {
        &self.dither_opts
    }

    /// Nearest-color table for the palette, built on first call.
    ///
    /// Clones made afterwards carry the built table along.
    pub fn lut(&self) -> &NearestLut {
        self.lut.get_or_init(|| NearestLut::build(&self.palette))
    }

    /// Gamut map and, if enabled, remap lightness. This is the output when
    /// dithering is skipped.
    pub fn preview(&self, input: &PixelBuffer) -> PixelBuffer {
        let start = Instant::now();
        let mapped = GamutMapper::new(&self.palette, self.gamut).map_buffer(input);
        tracing::debug!(
            mode = self.gamut.name(),
            width = input.width(),
            height = input.height(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "gamut mapped"
        );

        match &self.lightness {
            Some(params) => {
                let start = Instant::now();
                let remapped = clahe_lightness(&mapped, params);
                tracing::debug!(
                    clip_limit = params.clip_limit,
                    grid_size = params.grid_size,
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    "lightness remapped"
                );
                remapped
            }
            None => mapped,
        }
    }

    /// Run the full pipeline and dither to palette indices.
    ///
    /// Applies:
    /// 1. Gamut mapping with the selected mode
    /// 2. CLAHE lightness remapping (if enabled)
    /// 3. Floyd-Steinberg error diffusion
    pub fn convert(&self, input: &PixelBuffer) -> DitheredImage {
        let prepared = self.preview(input);

        let start = Instant::now();
        let lut = if self.dither_opts.penalties().is_active() {
            None
        } else {
            Some(self.lut())
        };
        let indices = dither_with_kernel(
            &prepared.to_rgb(),
            prepared.width(),
            prepared.height(),
            &self.palette,
            &FLOYD_STEINBERG,
            &self.dither_opts,
            lut,
        );
        tracing::debug!(
            error_clamp = self.dither_opts.error_clamp,
            lut = lut.is_some(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "dithered"
        );

        DitheredImage::new(indices, prepared.width(), prepared.height(), self.palette.clone())
    }

    /// Approximately restore the original from a dithered buffer produced
    /// with this converter's palette and gamut mode.
    pub fn reconvert(&self, dithered: &PixelBuffer, blur_radius: u32, brightness: f64) -> PixelBuffer {
        let params = ReconvertParams::new(self.gamut)
            .blur_radius(blur_radius)
            .brightness(brightness);
        reconvert(dithered, &params, &self.palette)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgb;
    use crate::gamut::GamutSpace;

    /// Helper: a 4x4 color ramp.
    fn ramp_4x4() -> PixelBuffer {
        let px: Vec<Rgb> = (0..16)
            .map(|i| {
                let v = (i as f64 / 15.0 * 255.0) as u8;
                Rgb::new(v, 255 - v, 128)
            })
            .collect();
        PixelBuffer::from_rgb(&px, 4, 4).unwrap()
    }

    #[test]
    fn test_new_defaults() {
        let converter = EpaperConverter::new(Palette::eink());
        assert_eq!(converter.gamut_mode(), GamutMode::Grayout { strength: 0.7 });
        assert_eq!(converter.lightness_params(), None, "lightness remap is opt-in");
        assert_eq!(converter.dither_options(), &DitherOptions::default());
    }

    #[test]
    fn test_builder_chaining_clamps() {
        let converter = EpaperConverter::new(Palette::eink())
            .gamut(GamutMode::Grayout { strength: 3.0 })
            .lightness(Some(ClaheParams {
                clip_limit: 9.0,
                grid_size: 0,
            }))
            .error_clamp(200)
            .red_penalty(150.0)
            .yellow_penalty(-1.0)
            .csf_chroma_weight(0.6);

        assert_eq!(converter.gamut_mode(), GamutMode::Grayout { strength: 1.0 });
        assert_eq!(converter.lightness_params(), Some(ClaheParams::new(4.0, 1)));
        let opts = converter.dither_options();
        assert_eq!(opts.error_clamp, 128);
        assert_eq!(opts.red_penalty, 100.0);
        assert_eq!(opts.yellow_penalty, 0.0);
        assert_eq!(opts.csf_chroma_weight, 0.6);
    }

    #[test]
    fn test_convert_produces_valid_output() {
        let converter = EpaperConverter::new(Palette::eink());
        let result = converter.convert(&ramp_4x4());

        assert_eq!(result.width(), 4);
        assert_eq!(result.height(), 4);
        assert_eq!(result.indices().len(), 16);
        for &idx in result.indices() {
            assert!(idx < 4, "Index {idx} out of palette range");
        }
    }

    #[test]
    fn test_convert_reusable_with_memoized_lut() {
        let converter = EpaperConverter::new(Palette::eink())
            .red_penalty(0.0)
            .yellow_penalty(0.0);
        let input = ramp_4x4();

        let first = converter.convert(&input);
        assert!(converter.lut.get().is_some(), "LUT should be memoized after first use");
        let second = converter.convert(&input);
        assert_eq!(first.indices(), second.indices());
    }

    #[test]
    fn test_penalties_skip_lut() {
        let converter = EpaperConverter::new(Palette::eink());
        converter.convert(&ramp_4x4());
        assert!(converter.lut.get().is_none());
    }

    #[test]
    fn test_clone_after_lut_shares_table() {
        let converter = EpaperConverter::new(Palette::eink());
        let expected = converter.lut().clone();

        let tuned = converter.clone().red_penalty(0.0).yellow_penalty(0.0);
        assert!(tuned.lut.get().is_some(), "clone should carry the built table");
        assert_eq!(tuned.lut(), &expected);
    }

    #[test]
    fn test_preview_is_not_palette_exact() {
        let converter = EpaperConverter::new(Palette::eink()).gamut(GamutMode::AntiSaturation {
            space: GamutSpace::Rgb,
        });
        let input = PixelBuffer::from_rgb(&[Rgb::new(150, 120, 90); 4], 2, 2).unwrap();
        let preview = converter.preview(&input);
        assert_eq!(preview.width(), 2);
        let c = preview.pixel(0, 0);
        assert!(
            !Palette::eink().colors().contains(&c),
            "preview of an in-gamut color should not be quantized, got {c}"
        );
    }

    #[test]
    fn test_reconvert_uses_gamut_mode() {
        let converter = EpaperConverter::new(Palette::eink()).gamut(GamutMode::CentroidClip {
            space: GamutSpace::Rgb,
        });
        let dithered = converter.convert(&ramp_4x4()).to_rgba();
        let restored = converter.reconvert(&dithered, 1, 1.0);
        assert_eq!(restored.width(), 4);
        assert_eq!(restored.height(), 4);
    }
}
