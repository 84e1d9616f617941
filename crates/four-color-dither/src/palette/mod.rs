//! Palette types and nearest-color search
//!
//! [`Palette`] holds the four output colors of the panel (and optionally the
//! colors the panel is perceived to show). [`NearestLut`] is the O(1) lookup
//! used by the ditherer when no penalties are active.

mod error;
mod nearest_lut;
mod palette;

pub use error::{PaletteError, ParseColorError};
pub use nearest_lut::{NearestLut, LUT_LEVELS, LUT_STEP};
pub use palette::{DistanceMetric, Palette, Penalties, PALETTE_SIZE};
