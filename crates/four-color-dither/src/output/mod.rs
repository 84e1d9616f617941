//! Pixel containers exchanged with the host application.
//!
//! - [`PixelBuffer`]: validated RGBA input and preview output
//! - [`DitheredImage`]: palette indices with output and perceived renderings

mod dithered_image;
mod pixel_buffer;

pub use dithered_image::DitheredImage;
pub use pixel_buffer::PixelBuffer;
