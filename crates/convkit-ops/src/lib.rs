//! # convkit-ops
//!
//! Convolution and point filters for 24-bit RGB rasters.
//!
//! This crate provides the 3x3 convolution engine, the per-pixel transforms
//! and the composite edge detectors built from them.
//!
//! # Modules
//!
//! - [`kernel`] - Fixed 3x3 kernels and the Sobel directions
//! - [`convolve`] - Row-partitioned parallel convolution
//! - [`point`] - Greyscale, thresholds and colour adjustments
//! - [`pipeline`] - Named filters, chains and edge detection
//! - [`config`] - Worker count and filter constants
//!
//! # Example
//!
//! ```rust
//! use convkit_core::{Pixel, PixelBuffer};
//! use convkit_ops::{apply, Filter, FilterConfig};
//!
//! let img = PixelBuffer::filled(32, 32, Pixel::grey(100)).unwrap();
//! let edges = apply(img, Filter::DirectionalEdges, &FilterConfig::default()).unwrap();
//! assert!(edges.samples().iter().all(|&p| p == Pixel::BLACK));
//! ```
//!
//! # Common Operations
//!
//! ## Single convolution
//!
//! ```rust,ignore
//! use convkit_ops::{convolve, Kernel};
//!
//! let sharpened = convolve(&image, &Kernel::SHARPEN, 8)?;
//! ```
//!
//! ## Filter chain
//!
//! ```rust,ignore
//! use convkit_ops::{apply_chain, Filter, FilterConfig};
//!
//! let cfg = FilterConfig::from_file("convkit.yaml")?;
//! let out = apply_chain(image, &[Filter::Greyscale, Filter::Sharpen], &cfg)?;
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod error;
pub mod border;
pub mod config;
pub mod convolve;
pub mod kernel;
pub mod parallel;
pub mod partition;
pub mod pipeline;
pub mod point;

pub use config::FilterConfig;
pub use convolve::{convolve, convolve_default};
pub use error::{OpsError, OpsResult};
pub use kernel::{Direction, Kernel, KernelKind};
pub use partition::{partition_rows, DEFAULT_WORKERS};
pub use pipeline::{
    apply, apply_chain, combine_max, directional_edges, directional_gradients,
    simple_edge_detection, Filter,
};
