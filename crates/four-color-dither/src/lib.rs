// Numeric color code -- suppress clippy lints that are impractical to fix
// (generated LUT tables, index-heavy image loops, etc.)
#![allow(
    clippy::excessive_precision,
    clippy::needless_range_loop,
    clippy::module_inception,
    clippy::doc_overindented_list_items,
    clippy::manual_range_contains
)]

//! four-color-dither: photo conversion for four-color e-paper displays
//!
//! This library converts arbitrary images to a fixed palette of exactly
//! four colors (white, black, red, yellow on the stock panels): gamut
//! mapping pre-biases colors toward what the panel can show, an optional
//! CLAHE pass redistributes lightness, and Floyd-Steinberg error diffusion
//! quantizes every pixel to a palette entry.
//!
//! # Quick Start
//!
//! The [`EpaperConverter`] builder is the primary entry point:
//!
//! ```
//! use four_color_dither::{EpaperConverter, Palette, PixelBuffer, Rgb};
//!
//! let converter = EpaperConverter::new(Palette::eink());
//! let input = PixelBuffer::from_rgb(&vec![Rgb::new(200, 120, 40); 16], 4, 4).unwrap();
//! let result = converter.convert(&input);
//!
//! assert_eq!(result.width(), 4);
//! assert!(result.indices().iter().all(|&i| i < 4));
//! ```
//!
//! # Stages
//!
//! Each stage is also usable on its own:
//!
//! ```
//! use four_color_dither::{
//!     clahe_lightness, gamut_map, ClaheParams, Dither, DitherOptions, FloydSteinberg, GamutMode,
//!     Palette, PixelBuffer, Rgb,
//! };
//!
//! let palette = Palette::eink();
//! let input = PixelBuffer::from_rgb(&vec![Rgb::new(30, 90, 220); 4], 2, 2).unwrap();
//!
//! let mapped = gamut_map(&input, &palette, GamutMode::default());
//! let remapped = clahe_lightness(&mapped, &ClaheParams::default());
//! let indices = FloydSteinberg.dither(&remapped.to_rgb(), 2, 2, &palette, &DitherOptions::new());
//! assert_eq!(indices.len(), 4);
//! ```
//!
//! # Color Science
//!
//! ## Two Color Spaces, Two Purposes
//!
//! | Color Space | Key Property | Used For |
//! |-------------|--------------|----------|
//! | **sRGB** | Display encoding, 8 bits per channel | Input/output, error accumulation, palette entries |
//! | **CIE Lab (D65)** | Approximately perceptually uniform | Palette matching, Lab gamut mapping, CLAHE on L* |
//!
//! [`LinearRgb`] appears only as the bridge between the two and for
//! luminance measurements.
//!
//! ## Distances
//!
//! [`ciede2000`] is the reference perceptual difference and the default of
//! [`Palette::find_nearest`]. The dithering hot loop uses plain Euclidean
//! Lab distance instead: through a 64x64x64 lookup table when no penalty is
//! active, or a four-entry scan when brightness-dependent penalties are.
//!
//! ## Perceived Palettes
//!
//! E-paper pigments are far duller than their nominal sRGB values. A
//! [`Palette`] may carry the colors the panel really shows; matching and
//! error computation then use those, while the output keeps the nominal
//! colors the display controller expects. Without the perceived colors the
//! ditherer believes white paper is 255 and under-represents highlights.
//!
//! ## Pipeline Overview
//!
//! ```text
//! RGBA input
//!     |
//!     v
//! [Gamut mapping]           Grayout | Anti-Saturation | Centroid-Clip | Illuminant
//!     |
//!     v
//! [CLAHE on L*]             optional; a*, b* untouched
//!     |
//!     v
//! +-------------------------------------------+
//! |  Floyd-Steinberg loop (sRGB floats)       |
//! |                                           |
//! |  accumulated value -> round -> nearest    |
//! |  error = value - matching color           |
//! |  clamp, attenuate chroma, diffuse 7/3/5/1 |
//! +-------------------------------------------+
//!     |
//!     v
//! palette indices -> RGBA (every pixel a palette color)
//! ```

pub mod api;
pub mod color;
pub mod dither;
pub mod gamut;
pub mod lightness;
pub mod metrics;
pub mod output;
pub mod palette;
pub mod reconvert;


pub use api::{DitherError, EpaperConverter};
pub use color::{ciede2000, Lab, LinearRgb, Rgb};
pub use dither::{Dither, DitherOptions, FloydSteinberg};
pub use gamut::{gamut_map, inverse_gamut_map, GamutMapper, GamutMode, GamutSpace};
pub use lightness::{clahe_lightness, ClaheParams};
pub use metrics::ImageMetrics;
pub use output::{DitheredImage, PixelBuffer};
pub use palette::{DistanceMetric, NearestLut, Palette, PaletteError, ParseColorError, Penalties};
pub use reconvert::{reconvert, ReconvertParams};
