//! Row partitioning for the convolution workers.
//!
//! `[0, height)` is cut into `workers` contiguous half-open ranges of
//! `height / workers` rows each; the last range absorbs the remainder. When
//! there are fewer rows than workers every range but the last is empty.

use crate::{OpsError, OpsResult};
use std::ops::Range;

/// Worker count used when none is configured.
pub const DEFAULT_WORKERS: usize = 20;

/// Splits `[0, height)` into exactly `workers` disjoint ranges.
///
/// # Errors
///
/// Returns [`OpsError::InvalidParameter`] if `workers` is zero.
///
/// # Example
///
/// ```rust
/// use convkit_ops::partition::partition_rows;
///
/// let parts = partition_rows(10, 3).unwrap();
/// assert_eq!(parts, vec![0..3, 3..6, 6..10]);
/// ```
pub fn partition_rows(height: usize, workers: usize) -> OpsResult<Vec<Range<usize>>> {
    if workers == 0 {
        return Err(OpsError::InvalidParameter(
            "worker count must be > 0".into(),
        ));
    }
    let rows_per = height / workers;
    Ok((0..workers)
        .map(|i| {
            let start = i * rows_per;
            let end = if i + 1 == workers { height } else { start + rows_per };
            start..end
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_exact_cover(height: usize, workers: usize) {
        let parts = partition_rows(height, workers).unwrap();
        assert_eq!(parts.len(), workers);

        let mut covered = vec![0u32; height];
        let mut next = 0;
        for part in &parts {
            assert_eq!(part.start, next, "gap or overlap at {height}/{workers}");
            for row in part.clone() {
                covered[row] += 1;
            }
            next = part.end;
        }
        assert_eq!(next, height);
        assert!(covered.iter().all(|&n| n == 1));
    }

    #[test]
    fn test_exact_cover() {
        for height in 1..64 {
            for workers in 1..25 {
                assert_exact_cover(height, workers);
            }
        }
        assert_exact_cover(1080, DEFAULT_WORKERS);
    }

    #[test]
    fn test_fewer_rows_than_workers() {
        let parts = partition_rows(3, 20).unwrap();
        assert!(parts[..19].iter().all(|p| p.is_empty()));
        assert_eq!(parts[19], 0..3);
    }

    #[test]
    fn test_last_absorbs_remainder() {
        let parts = partition_rows(45, 20).unwrap();
        assert!(parts[..19].iter().all(|p| p.len() == 2));
        assert_eq!(parts[19], 38..45);
    }

    #[test]
    fn test_zero_workers_rejected() {
        assert!(matches!(
            partition_rows(10, 0),
            Err(OpsError::InvalidParameter(_))
        ));
    }
}
