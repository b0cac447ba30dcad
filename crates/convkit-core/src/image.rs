//! Owned pixel buffer.
//!
//! [`PixelBuffer`] is the unit of work passed between processing stages.
//!
//! # Memory Layout
//!
//! Pixels are stored in **row-major** order, top-to-bottom:
//!
//! ```text
//! samples: [P(0,0) P(1,0) ... P(w-1,0)]  <- row 0 (top)
//!          [P(0,1) P(1,1) ... P(w-1,1)]  <- row 1
//!          ...
//! ```
//!
//! The pixel at `(x, y)` lives at index `y * width + x`. The sample count is
//! fixed at construction and always equals `width * height`.
//!
//! # Usage
//!
//! ```rust
//! use convkit_core::{Pixel, PixelBuffer};
//!
//! let mut img = PixelBuffer::filled(4, 3, Pixel::grey(128)).unwrap();
//! img.set_pixel(1, 2, Pixel::WHITE);
//! assert_eq!(img.pixel(1, 2), Pixel::WHITE);
//! assert_eq!(img.index(1, 2), 9);
//! ```

use crate::{Error, Pixel, Result};

/// Owned RGB image with fixed, non-zero dimensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    samples: Vec<Pixel>,
}

impl PixelBuffer {
    /// Creates a black image.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidDimensions`] if either side is zero or the pixel
    ///   count overflows `usize`
    /// - [`Error::AllocationFailed`] if the sample storage cannot be reserved
    pub fn new(width: u32, height: u32) -> Result<Self> {
        Self::filled(width, height, Pixel::BLACK)
    }

    /// Creates an image where every pixel is `pixel`.
    pub fn filled(width: u32, height: u32, pixel: Pixel) -> Result<Self> {
        let count = checked_pixel_count(width, height)?;
        let samples = try_alloc_samples(count, pixel)?;
        Ok(Self {
            width,
            height,
            samples,
        })
    }

    /// Wraps existing samples.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimensions`] if the dimensions are invalid or
    /// `samples.len() != width * height`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use convkit_core::{Pixel, PixelBuffer};
    ///
    /// let img = PixelBuffer::from_samples(2, 1, vec![Pixel::BLACK, Pixel::WHITE]).unwrap();
    /// assert_eq!(img.dimensions(), (2, 1));
    /// assert!(PixelBuffer::from_samples(2, 2, vec![Pixel::BLACK]).is_err());
    /// ```
    pub fn from_samples(width: u32, height: u32, samples: Vec<Pixel>) -> Result<Self> {
        let expected = checked_pixel_count(width, height)?;
        if samples.len() != expected {
            return Err(Error::invalid_dimensions(
                width,
                height,
                format!("expected {} samples, got {}", expected, samples.len()),
            ));
        }
        Ok(Self {
            width,
            height,
            samples,
        })
    }

    /// Builds an image by evaluating `f(x, y)` for every pixel.
    pub fn from_fn(width: u32, height: u32, mut f: impl FnMut(u32, u32) -> Pixel) -> Result<Self> {
        let mut img = Self::new(width, height)?;
        for y in 0..height {
            for x in 0..width {
                img.set_pixel(x, y, f(x, y));
            }
        }
        Ok(img)
    }

    /// Image width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Image height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// `(width, height)`.
    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Total number of pixels (`width * height`).
    #[inline]
    pub fn pixel_count(&self) -> usize {
        self.samples.len()
    }

    /// Flat index of `(x, y)`.
    #[inline]
    pub fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Returns the pixel at `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if `(x, y)` is out of bounds.
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> Pixel {
        debug_assert!(x < self.width && y < self.height, "pixel out of bounds");
        self.samples[self.index(x, y)]
    }

    /// Returns the pixel at `(x, y)`, or an error if out of bounds.
    pub fn try_pixel(&self, x: u32, y: u32) -> Result<Pixel> {
        if x < self.width && y < self.height {
            Ok(self.pixel(x, y))
        } else {
            Err(Error::out_of_bounds(x, y, self.width, self.height))
        }
    }

    /// Sets the pixel at `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if `(x, y)` is out of bounds.
    #[inline]
    pub fn set_pixel(&mut self, x: u32, y: u32, pixel: Pixel) {
        debug_assert!(x < self.width && y < self.height, "pixel out of bounds");
        let idx = self.index(x, y);
        self.samples[idx] = pixel;
    }

    /// All samples in row-major order.
    #[inline]
    pub fn samples(&self) -> &[Pixel] {
        &self.samples
    }

    /// Mutable access to the samples. The length cannot change.
    #[inline]
    pub fn samples_mut(&mut self) -> &mut [Pixel] {
        &mut self.samples
    }

    /// Consumes the buffer, returning its samples.
    #[inline]
    pub fn into_samples(self) -> Vec<Pixel> {
        self.samples
    }

    /// One row of pixels.
    ///
    /// # Panics
    ///
    /// Panics if `y >= height`.
    #[inline]
    pub fn row(&self, y: u32) -> &[Pixel] {
        let start = y as usize * self.width as usize;
        &self.samples[start..start + self.width as usize]
    }

    /// One mutable row of pixels.
    #[inline]
    pub fn row_mut(&mut self, y: u32) -> &mut [Pixel] {
        let start = y as usize * self.width as usize;
        let end = start + self.width as usize;
        &mut self.samples[start..end]
    }

    /// Iterates over rows, top to bottom.
    pub fn rows(&self) -> impl DoubleEndedIterator<Item = &[Pixel]> + ExactSizeIterator + '_ {
        self.samples.chunks_exact(self.width as usize)
    }

    /// Returns `true` if `other` has the same width and height.
    #[inline]
    pub fn same_shape(&self, other: &PixelBuffer) -> bool {
        self.dimensions() == other.dimensions()
    }

    /// Fails with [`Error::DimensionMismatch`] unless both buffers share a shape.
    pub fn ensure_same_shape(&self, other: &PixelBuffer) -> Result<()> {
        if self.same_shape(other) {
            Ok(())
        } else {
            Err(Error::dimension_mismatch(self.dimensions(), other.dimensions()))
        }
    }
}

/// Validates dimensions and returns `width * height`.
pub fn checked_pixel_count(width: u32, height: u32) -> Result<usize> {
    if width == 0 || height == 0 {
        return Err(Error::invalid_dimensions(
            width,
            height,
            "width and height must be > 0",
        ));
    }
    (width as usize)
        .checked_mul(height as usize)
        .ok_or_else(|| Error::invalid_dimensions(width, height, "pixel count overflows"))
}

/// Allocates `count` samples initialised to `fill`.
///
/// Reports failure as [`Error::AllocationFailed`] instead of aborting.
pub fn try_alloc_samples(count: usize, fill: Pixel) -> Result<Vec<Pixel>> {
    let mut samples = Vec::new();
    samples.try_reserve_exact(count).map_err(|e| {
        Error::allocation_failed(
            count.saturating_mul(std::mem::size_of::<Pixel>()),
            e.to_string(),
        )
    })?;
    samples.resize(count, fill);
    Ok(samples)
}
