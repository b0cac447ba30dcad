//! Scoped parallel execution helpers using Rayon.
//!
//! Each helper blocks until every task it started has finished, so borrowed
//! inputs and output slices never outlive the call. With the `parallel`
//! feature disabled the same work runs in order on the calling thread.
//!
//! # Example
//!
//! ```rust
//! use convkit_ops::parallel::join4;
//!
//! let (a, b, c, d) = join4(|| 1, || 2, || 3, || 4);
//! assert_eq!(a + b + c + d, 10);
//! ```

use convkit_core::Pixel;
use std::ops::Range;

/// One worker's share of a convolution: its row range and output rows.
pub type RowJob<'a> = (Range<usize>, &'a mut [Pixel]);

/// Runs `work` once per job, one scoped task per job, and waits for all.
///
/// Jobs must own disjoint output slices; the borrow checker enforces this
/// because each job holds a unique `&mut` slice.
#[cfg(feature = "parallel")]
pub fn for_each_row_job<F>(jobs: Vec<RowJob<'_>>, work: F)
where
    F: Fn(Range<usize>, &mut [Pixel]) + Sync,
{
    let work = &work;
    rayon::scope(|s| {
        for (rows, out) in jobs {
            s.spawn(move |_| work(rows, out));
        }
    });
}

/// Sequential fallback for [`for_each_row_job`].
#[cfg(not(feature = "parallel"))]
pub fn for_each_row_job<F>(jobs: Vec<RowJob<'_>>, work: F)
where
    F: Fn(Range<usize>, &mut [Pixel]) + Sync,
{
    for (rows, out) in jobs {
        work(rows, out);
    }
}

/// Runs four independent closures, potentially in parallel.
#[cfg(feature = "parallel")]
pub fn join4<A, B, C, D, RA, RB, RC, RD>(a: A, b: B, c: C, d: D) -> (RA, RB, RC, RD)
where
    A: FnOnce() -> RA + Send,
    B: FnOnce() -> RB + Send,
    C: FnOnce() -> RC + Send,
    D: FnOnce() -> RD + Send,
    RA: Send,
    RB: Send,
    RC: Send,
    RD: Send,
{
    let ((ra, rb), (rc, rd)) = rayon::join(|| rayon::join(a, b), || rayon::join(c, d));
    (ra, rb, rc, rd)
}

/// Sequential fallback for [`join4`].
#[cfg(not(feature = "parallel"))]
pub fn join4<A, B, C, D, RA, RB, RC, RD>(a: A, b: B, c: C, d: D) -> (RA, RB, RC, RD)
where
    A: FnOnce() -> RA + Send,
    B: FnOnce() -> RB + Send,
    C: FnOnce() -> RC + Send,
    D: FnOnce() -> RD + Send,
    RA: Send,
    RB: Send,
    RC: Send,
    RD: Send,
{
    (a(), b(), c(), d())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_jobs_write_disjoint_rows() {
        let width = 4;
        let mut out = vec![Pixel::BLACK; width * 6];
        let (first, second) = out.split_at_mut(width * 2);
        let jobs = vec![(0..2, first), (2..6, second)];

        for_each_row_job(jobs, |rows, slice| {
            for (local, y) in rows.enumerate() {
                for px in &mut slice[local * width..(local + 1) * width] {
                    *px = Pixel::grey(y as u8);
                }
            }
        });

        for (i, px) in out.iter().enumerate() {
            assert_eq!(*px, Pixel::grey((i / width) as u8));
        }
    }

    #[test]
    fn test_empty_jobs_are_noops() {
        let mut out = vec![Pixel::WHITE; 2];
        let (empty, rest) = out.split_at_mut(0);
        let jobs = vec![(0..0, empty), (0..1, rest)];
        for_each_row_job(jobs, |rows, slice| {
            assert_eq!(slice.len(), rows.len() * 2);
        });
    }

    #[test]
    fn test_join4_preserves_order() {
        let data = vec![1u32, 2, 3, 4];
        let (a, b, c, d) = join4(|| data[0], || data[1], || data[2], || data[3]);
        assert_eq!([a, b, c, d], [1, 2, 3, 4]);
    }
}
