//! Reflective boundary mapping.
//!
//! A coordinate outside `[0, len)` is mirrored across the nearest edge:
//! negative coordinates negate, coordinates at or past the far edge fold back
//! to `2 * (len - 1) - c`. The edge pixel itself is not repeated.
//!
//! A single reflection is enough for a 3x3 kernel, which only ever reaches
//! one pixel past an edge. A one-pixel axis maps everything to `0`.

/// Maps `coord` onto `[0, len)` by one mirror step.
///
/// `len` must be non-zero and `coord` at most `len - 1` past either edge.
///
/// ```rust
/// use convkit_ops::border::reflect;
///
/// assert_eq!(reflect(-1, 5), 1);
/// assert_eq!(reflect(5, 5), 3);
/// assert_eq!(reflect(2, 5), 2);
/// assert_eq!(reflect(1, 1), 0);
/// ```
#[inline]
pub fn reflect(coord: isize, len: usize) -> usize {
    debug_assert!(len > 0, "reflect on empty axis");
    if len == 1 {
        return 0;
    }
    let last = len as isize - 1;
    let mut c = coord;
    if c < 0 {
        c = -c;
    }
    if c > last {
        c = 2 * last - c;
    }
    debug_assert!((0..=last).contains(&c), "coordinate {coord} overreaches axis {len}");
    c as usize
}

/// Indices of `c - 1`, `c`, `c + 1` after reflection.
#[inline]
pub fn neighbours(c: usize, len: usize) -> [usize; 3] {
    let c = c as isize;
    [reflect(c - 1, len), reflect(c, len), reflect(c + 1, len)]
}

/// Precomputes [`neighbours`] for every position along an axis.
pub fn neighbour_table(len: usize) -> Vec<[usize; 3]> {
    (0..len).map(|c| neighbours(c, len)).collect()
}
