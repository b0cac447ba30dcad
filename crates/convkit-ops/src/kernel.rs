//! Fixed 3x3 convolution kernels.
//!
//! Kernels are indexed `weights[row][col]` where row `0` is the neighbour
//! row above the pixel and col `0` is the neighbour column to its left:
//! the neighbour at `(x + dx, y + dy)` uses `weights[1 + dy][1 + dx]`.
//! They are applied as a correlation, never flipped.
//!
//! # Kernels
//!
//! - [`Kernel::IDENTITY`] - Passes pixels through unchanged
//! - [`Kernel::BOX_BLUR`] - Near-uniform average
//! - [`Kernel::GAUSSIAN_BLUR`] - 1-2-1 binomial blur
//! - [`Kernel::SHARPEN`] - 4-neighbour sharpen
//! - [`Kernel::EMBOSS`] - Diagonal relief
//! - [`Kernel::EDGE_DETECT`] - 8-neighbour Laplacian
//! - [`Kernel::SOBEL_TOP`], [`Kernel::SOBEL_BOTTOM`], [`Kernel::SOBEL_LEFT`],
//!   [`Kernel::SOBEL_RIGHT`] - Directional gradients
//!
//! # Example
//!
//! ```rust
//! use convkit_ops::kernel::{Direction, Kernel, KernelKind};
//!
//! assert_eq!(KernelKind::GaussianBlur.kernel(), Kernel::GAUSSIAN_BLUR);
//! assert_eq!(Direction::Left.kernel().weight(-1, 0), 2.0);
//! ```

use std::fmt;

/// Side length of every kernel.
pub const KERNEL_SIZE: usize = 3;

/// Immutable 3x3 matrix of weights.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Kernel {
    weights: [[f64; KERNEL_SIZE]; KERNEL_SIZE],
}

impl Kernel {
    /// Identity: output equals input.
    pub const IDENTITY: Kernel = Kernel::new([
        [0.0, 0.0, 0.0],
        [0.0, 1.0, 0.0],
        [0.0, 0.0, 0.0],
    ]);

    /// Box blur with a slightly heavier centre so weights sum to 1.
    pub const BOX_BLUR: Kernel = Kernel::new([
        [0.11, 0.11, 0.11],
        [0.11, 0.12, 0.11],
        [0.11, 0.11, 0.11],
    ]);

    /// 3x3 Gaussian approximation.
    pub const GAUSSIAN_BLUR: Kernel = Kernel::new([
        [0.0625, 0.125, 0.0625],
        [0.125, 0.25, 0.125],
        [0.0625, 0.125, 0.0625],
    ]);

    /// Sharpen.
    pub const SHARPEN: Kernel = Kernel::new([
        [0.0, -1.0, 0.0],
        [-1.0, 5.0, -1.0],
        [0.0, -1.0, 0.0],
    ]);

    /// Emboss: light from the upper left.
    pub const EMBOSS: Kernel = Kernel::new([
        [-2.0, -1.0, 0.0],
        [-1.0, 1.0, 1.0],
        [0.0, 1.0, 2.0],
    ]);

    /// Laplacian edge detector.
    pub const EDGE_DETECT: Kernel = Kernel::new([
        [-2.0, -2.0, -2.0],
        [-2.0, 16.0, -2.0],
        [-2.0, -2.0, -2.0],
    ]);

    /// Responds where the row above is brighter than the row below.
    pub const SOBEL_TOP: Kernel = Kernel::new([
        [1.0, 2.0, 1.0],
        [0.0, 0.0, 0.0],
        [-1.0, -2.0, -1.0],
    ]);

    /// Responds where the row below is brighter than the row above.
    pub const SOBEL_BOTTOM: Kernel = Kernel::new([
        [-1.0, -2.0, -1.0],
        [0.0, 0.0, 0.0],
        [1.0, 2.0, 1.0],
    ]);

    /// Responds where the left column is brighter than the right column.
    pub const SOBEL_LEFT: Kernel = Kernel::new([
        [1.0, 0.0, -1.0],
        [2.0, 0.0, -2.0],
        [1.0, 0.0, -1.0],
    ]);

    /// Responds where the right column is brighter than the left column.
    pub const SOBEL_RIGHT: Kernel = Kernel::new([
        [-1.0, 0.0, 1.0],
        [-2.0, 0.0, 2.0],
        [-1.0, 0.0, 1.0],
    ]);

    /// Creates a kernel from row-major weights.
    pub const fn new(weights: [[f64; KERNEL_SIZE]; KERNEL_SIZE]) -> Self {
        Self { weights }
    }

    /// Row-major weights.
    #[inline]
    pub fn weights(&self) -> &[[f64; KERNEL_SIZE]; KERNEL_SIZE] {
        &self.weights
    }

    /// Weight applied to the neighbour at offset `(dx, dy)`.
    ///
    /// # Panics
    ///
    /// Panics if either offset is outside `-1..=1`.
    #[inline]
    pub fn weight(&self, dx: isize, dy: isize) -> f64 {
        self.weights[(1 + dy) as usize][(1 + dx) as usize]
    }

    /// Sum of all weights.
    pub fn sum(&self) -> f64 {
        self.weights.iter().flatten().sum()
    }
}

impl fmt::Display for Kernel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, row) in self.weights.iter().enumerate() {
            if i > 0 {
                f.write_str(" / ")?;
            }
            write!(f, "{} {} {}", row[0], row[1], row[2])?;
        }
        Ok(())
    }
}

/// Gradient direction of a Sobel kernel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Brighter above.
    Top,
    /// Brighter below.
    Bottom,
    /// Brighter to the left.
    Left,
    /// Brighter to the right.
    Right,
}

impl Direction {
    /// All four directions, in the order the edge pipeline evaluates them.
    pub const ALL: [Direction; 4] = [
        Direction::Top,
        Direction::Bottom,
        Direction::Left,
        Direction::Right,
    ];

    /// The Sobel kernel for this direction.
    pub const fn kernel(self) -> Kernel {
        match self {
            Direction::Top => Kernel::SOBEL_TOP,
            Direction::Bottom => Kernel::SOBEL_BOTTOM,
            Direction::Left => Kernel::SOBEL_LEFT,
            Direction::Right => Kernel::SOBEL_RIGHT,
        }
    }
}

/// Named kernel selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KernelKind {
    /// [`Kernel::IDENTITY`]
    Identity,
    /// [`Kernel::BOX_BLUR`]
    BoxBlur,
    /// [`Kernel::GAUSSIAN_BLUR`]
    GaussianBlur,
    /// [`Kernel::SHARPEN`]
    Sharpen,
    /// [`Kernel::EMBOSS`]
    Emboss,
    /// [`Kernel::EDGE_DETECT`]
    EdgeDetect,
    /// One of the four Sobel kernels.
    Sobel(Direction),
}

impl KernelKind {
    /// Resolves the selector to its constant kernel.
    pub const fn kernel(self) -> Kernel {
        match self {
            KernelKind::Identity => Kernel::IDENTITY,
            KernelKind::BoxBlur => Kernel::BOX_BLUR,
            KernelKind::GaussianBlur => Kernel::GAUSSIAN_BLUR,
            KernelKind::Sharpen => Kernel::SHARPEN,
            KernelKind::Emboss => Kernel::EMBOSS,
            KernelKind::EdgeDetect => Kernel::EDGE_DETECT,
            KernelKind::Sobel(direction) => direction.kernel(),
        }
    }
}
