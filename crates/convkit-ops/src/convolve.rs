//! 3x3 convolution engine.
//!
//! [`convolve`] applies one [`Kernel`] to one [`PixelBuffer`] and returns a
//! new buffer of the same shape. The input is never modified.
//!
//! Per output pixel and channel the weighted neighbourhood sum is accumulated
//! in `f64`, clamped to `[0, 255]` and truncated. Neighbours that fall outside
//! the image are mirrored back in (see [`crate::border`]).
//!
//! Rows are split into `workers` partitions (see [`crate::partition`]), each
//! handled by its own scoped task writing only its own output rows. The call
//! returns after every task has finished.
//!
//! # Example
//!
//! ```rust
//! use convkit_core::{Pixel, PixelBuffer};
//! use convkit_ops::convolve::convolve;
//! use convkit_ops::kernel::Kernel;
//!
//! let src = PixelBuffer::filled(16, 16, Pixel::grey(90)).unwrap();
//! let out = convolve(&src, &Kernel::GAUSSIAN_BLUR, 4).unwrap();
//! assert_eq!(out, src);
//! ```

use crate::border::{neighbour_table, neighbours};
use crate::kernel::Kernel;
use crate::parallel::{for_each_row_job, RowJob};
use crate::partition::{partition_rows, DEFAULT_WORKERS};
use crate::OpsResult;
use convkit_core::{try_alloc_samples, Pixel, PixelBuffer, MAX_CHANNEL};
use std::ops::Range;
use tracing::{debug, trace};

/// Convolves `input` with `kernel` using `workers` row partitions.
///
/// # Errors
///
/// - [`OpsError::InvalidParameter`](crate::OpsError::InvalidParameter) if
///   `workers` is zero
/// - [`OpsError::Core`](crate::OpsError::Core) wrapping
///   `AllocationFailed` if the output buffer cannot be allocated
pub fn convolve(input: &PixelBuffer, kernel: &Kernel, workers: usize) -> OpsResult<PixelBuffer> {
    let (width, height) = input.dimensions();
    trace!(width, height, workers, kernel = %kernel, "convolve");

    let partitions = partition_rows(height as usize, workers)?;
    debug!(
        partitions = partitions.len(),
        rows_per_partition = partitions[0].len(),
        "partitioned rows"
    );

    let row_len = width as usize;
    let mut output = try_alloc_samples(input.pixel_count(), Pixel::BLACK)?;
    let columns = neighbour_table(row_len);

    let mut jobs: Vec<RowJob<'_>> = Vec::with_capacity(partitions.len());
    let mut rest = output.as_mut_slice();
    for rows in partitions {
        let (chunk, tail) = std::mem::take(&mut rest).split_at_mut(rows.len() * row_len);
        jobs.push((rows, chunk));
        rest = tail;
    }

    for_each_row_job(jobs, |rows, out| {
        convolve_rows(input, kernel, &columns, rows, out)
    });

    Ok(PixelBuffer::from_samples(width, height, output)?)
}

/// [`convolve`] with [`DEFAULT_WORKERS`] partitions.
pub fn convolve_default(input: &PixelBuffer, kernel: &Kernel) -> OpsResult<PixelBuffer> {
    convolve(input, kernel, DEFAULT_WORKERS)
}

/// Fills `out` with the convolved pixels of `rows`.
///
/// `out` holds exactly `rows.len()` rows; `columns` is the reflected column
/// table for the image width.
fn convolve_rows(
    input: &PixelBuffer,
    kernel: &Kernel,
    columns: &[[usize; 3]],
    rows: Range<usize>,
    out: &mut [Pixel],
) {
    let width = columns.len();
    let height = input.height() as usize;
    let src = input.samples();
    let weights = kernel.weights();

    for (local, y) in rows.enumerate() {
        let row_starts = neighbours(y, height).map(|sy| sy * width);
        let dst = &mut out[local * width..(local + 1) * width];

        for (px, cols) in dst.iter_mut().zip(columns) {
            let mut acc = [0.0f64; 3];
            for (krow, &start) in weights.iter().zip(&row_starts) {
                for (&w, &sx) in krow.iter().zip(cols) {
                    let s = src[start + sx];
                    acc[0] += s.red as f64 * w;
                    acc[1] += s.green as f64 * w;
                    acc[2] += s.blue as f64 * w;
                }
            }
            *px = Pixel::new(quantize(acc[0]), quantize(acc[1]), quantize(acc[2]));
        }
    }
}

/// Clamps into the channel range and truncates toward zero.
#[inline]
fn quantize(sum: f64) -> u8 {
    sum.clamp(0.0, MAX_CHANNEL as f64) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::Direction;
    use crate::OpsError;

    fn pattern(width: u32, height: u32) -> PixelBuffer {
        PixelBuffer::from_fn(width, height, |x, y| {
            Pixel::new(
                ((x * 37 + y * 11) % 256) as u8,
                ((x * 5 + y * 91) % 256) as u8,
                ((x * y * 13 + 7) % 256) as u8,
            )
        })
        .unwrap()
    }

    /// Direct per-pixel evaluation used as an oracle.
    fn reference(input: &PixelBuffer, kernel: &Kernel) -> PixelBuffer {
        let (w, h) = input.dimensions();
        PixelBuffer::from_fn(w, h, |x, y| {
            let mut acc = [0.0f64; 3];
            for dy in -1isize..=1 {
                for dx in -1isize..=1 {
                    let sx = crate::border::reflect(x as isize + dx, w as usize) as u32;
                    let sy = crate::border::reflect(y as isize + dy, h as usize) as u32;
                    let s = input.pixel(sx, sy);
                    let k = kernel.weight(dx, dy);
                    acc[0] += s.red as f64 * k;
                    acc[1] += s.green as f64 * k;
                    acc[2] += s.blue as f64 * k;
                }
            }
            Pixel::new(quantize(acc[0]), quantize(acc[1]), quantize(acc[2]))
        })
        .unwrap()
    }

    #[test]
    fn test_shape_preserved() {
        for (w, h) in [(1, 1), (1, 7), (7, 1), (5, 3), (33, 21)] {
            let src = pattern(w, h);
            let out = convolve_default(&src, &Kernel::SHARPEN).unwrap();
            assert_eq!(out.dimensions(), (w, h));
            assert_eq!(out.pixel_count(), src.pixel_count());
        }
    }

    #[test]
    fn test_identity_is_bit_exact() {
        for (w, h) in [(1, 1), (2, 3), (17, 9), (40, 25)] {
            let src = pattern(w, h);
            let out = convolve_default(&src, &Kernel::IDENTITY).unwrap();
            assert_eq!(out, src);
        }
    }

    #[test]
    fn test_single_pixel_reflects_onto_itself() {
        let px = Pixel::new(10, 20, 30);
        let src = PixelBuffer::filled(1, 1, px).unwrap();

        for kernel in [Kernel::GAUSSIAN_BLUR, Kernel::SHARPEN, Kernel::EMBOSS] {
            let out = convolve_default(&src, &kernel).unwrap();
            assert_eq!(out.pixel(0, 0), px, "kernel {kernel}");
        }

        let edge = convolve_default(&src, &Kernel::EDGE_DETECT).unwrap();
        assert_eq!(edge.pixel(0, 0), Pixel::BLACK);

        let doubling = Kernel::new([[2.0; 3]; 3]);
        let out = convolve_default(&src, &doubling).unwrap();
        assert_eq!(out.pixel(0, 0), Pixel::new(180, 255, 255));
    }

    #[test]
    fn test_sharpen_clamps_instead_of_wrapping() {
        let mut src = PixelBuffer::new(3, 3).unwrap();
        src.set_pixel(1, 1, Pixel::WHITE);

        let out = convolve_default(&src, &Kernel::SHARPEN).unwrap();
        assert_eq!(out.pixel(1, 1), Pixel::WHITE);
        for (x, y) in [(0, 0), (1, 0), (2, 0), (0, 1), (2, 1), (0, 2), (1, 2), (2, 2)] {
            assert_eq!(out.pixel(x, y), Pixel::BLACK, "({x}, {y})");
        }
    }

    #[test]
    fn test_uniform_box_blur_within_truncation() {
        let src = PixelBuffer::filled(3, 3, Pixel::grey(128)).unwrap();
        let out = convolve_default(&src, &Kernel::BOX_BLUR).unwrap();
        for px in out.samples() {
            for c in px.to_array() {
                assert!((127..=128).contains(&c), "got {c}");
            }
        }
    }

    #[test]
    fn test_matches_reference() {
        let src = pattern(13, 11);
        for kernel in [Kernel::EMBOSS, Kernel::BOX_BLUR, Kernel::SOBEL_LEFT, Kernel::EDGE_DETECT] {
            assert_eq!(convolve(&src, &kernel, 3).unwrap(), reference(&src, &kernel));
        }
    }

    #[test]
    fn test_worker_count_does_not_change_result() {
        let src = pattern(31, 17);
        let expected = convolve(&src, &Kernel::EMBOSS, 1).unwrap();
        for workers in [2, 5, 17, 20, 64] {
            assert_eq!(convolve(&src, &Kernel::EMBOSS, workers).unwrap(), expected);
        }
    }

    #[test]
    fn test_sobel_directions_fire_on_expected_side() {
        // Bright upper half, dark lower half.
        let horizontal = PixelBuffer::from_fn(4, 4, |_, y| {
            if y < 2 { Pixel::WHITE } else { Pixel::BLACK }
        })
        .unwrap();
        let top = convolve_default(&horizontal, &Direction::Top.kernel()).unwrap();
        let bottom = convolve_default(&horizontal, &Direction::Bottom.kernel()).unwrap();
        assert_eq!(top.row(1), &[Pixel::WHITE; 4]);
        assert_eq!(top.row(2), &[Pixel::WHITE; 4]);
        assert_eq!(top.row(0), &[Pixel::BLACK; 4]);
        assert!(bottom.samples().iter().all(|&p| p == Pixel::BLACK));

        // Bright left half, dark right half.
        let vertical = PixelBuffer::from_fn(4, 4, |x, _| {
            if x < 2 { Pixel::WHITE } else { Pixel::BLACK }
        })
        .unwrap();
        let left = convolve_default(&vertical, &Direction::Left.kernel()).unwrap();
        let right = convolve_default(&vertical, &Direction::Right.kernel()).unwrap();
        assert_eq!(left.pixel(1, 0), Pixel::WHITE);
        assert_eq!(left.pixel(2, 3), Pixel::WHITE);
        assert_eq!(left.pixel(0, 2), Pixel::BLACK);
        assert!(right.samples().iter().all(|&p| p == Pixel::BLACK));
    }

    #[test]
    fn test_zero_workers_rejected() {
        let src = pattern(4, 4);
        assert!(matches!(
            convolve(&src, &Kernel::IDENTITY, 0),
            Err(OpsError::InvalidParameter(_))
        ));
    }
}
