//! Public API for the four-color-dither crate.
//!
//! This module provides the high-level API: [`EpaperConverter`] builder and
//! [`DitherError`] unified error type.

mod builder;
mod error;

pub use builder::EpaperConverter;
pub use error::DitherError;
