//! Color types and conversion utilities
//!
//! - [`Rgb`]: 8-bit sRGB, the color model of every input and output pixel
//! - [`LinearRgb`]: linear light, the intermediate of the Lab conversion
//! - [`Lab`]: CIE L*a*b* (D65), used for perceptual distance and the
//!   Lab-space gamut and lightness operations
//!
//! # Example
//!
//! ```
//! use four_color_dither::{ciede2000, Lab, Rgb};
//!
//! let red = Lab::from(Rgb::new(200, 0, 0));
//! let yellow = Lab::from(Rgb::new(255, 255, 0));
//! assert!(ciede2000(red, yellow) > 10.0);
//! assert_eq!(ciede2000(red, red), 0.0);
//! ```

mod ciede2000;
mod lab;
mod linear_rgb;
mod lut;
mod srgb;

pub use ciede2000::ciede2000;
pub use lab::Lab;
pub use linear_rgb::LinearRgb;
pub use lut::{linear_to_srgb, quantize_255, quantize_unit, srgb8_to_linear, srgb_to_linear};
pub use srgb::{Rgb, BT709};
