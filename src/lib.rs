//! epaper-palette - photo conversion for 4-color e-paper displays
//!
//! Thin host application around the `four-color-dither` crate: YAML
//! pipeline configuration, raw RGBA file I/O and a conversion service.
//! This library exposes modules for integration testing.

pub mod error;
pub mod models;
pub mod services;
