//! # convkit-core
//!
//! Core types for in-memory RGB raster processing.
//!
//! This crate provides the foundational types used throughout convkit:
//!
//! - [`Pixel`] - Three 8-bit channels (red, green, blue), no alpha
//! - [`PixelBuffer`] - Owned, row-major buffer of pixels with fixed dimensions
//! - [`Error`] / [`Result`] - Shared error type
//!
//! ## Crate Structure
//!
//! ```text
//! convkit-core (this crate)
//!    ^
//!    |
//!    +-- convkit-ops (kernels, convolution, pipeline)
//!    +-- convkit-io  (BMP ingestion/egress)
//!    +-- convkit-cli (command line)
//! ```
//!
//! ## Ownership
//!
//! A [`PixelBuffer`] has exactly one owner. Processing stages either mutate
//! it in place or consume it and return a freshly allocated buffer of the
//! same shape.

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod error;
pub mod image;
pub mod pixel;

pub use error::{Error, Result};
pub use image::{checked_pixel_count, try_alloc_samples, PixelBuffer};
pub use pixel::{clamp_channel, Channel, Pixel, MAX_CHANNEL};

/// Prelude module for convenient imports.
///
/// # Usage
///
/// ```
/// use convkit_core::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::image::PixelBuffer;
    pub use crate::pixel::{Channel, Pixel, MAX_CHANNEL};
}
