//! # convkit-io
//!
//! Reading and writing of uncompressed 24-bit BMP files.
//!
//! Decoded images are always top-down [`PixelBuffer`](convkit_core::PixelBuffer)s
//! regardless of the row order stored in the file; the writer always emits
//! bottom-up rows with a 54-byte header.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use convkit_io::bmp;
//!
//! let image = bmp::read("input.bmp")?;
//! bmp::write("copy.bmp", &image)?;
//! ```
//!
//! # Supported Files
//!
//! | Field | Accepted |
//! |-------|----------|
//! | Magic | `BM` |
//! | Info header | 40 bytes or larger |
//! | Bits per pixel | 24 |
//! | Compression | `BI_RGB` (none) |
//! | Row order | bottom-up or top-down |

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod bmp;
mod error;

pub use bmp::{decode, encode, read, write, BmpHeader};
pub use error::{IoError, IoResult};
