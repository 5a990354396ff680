//! Generic numeric helpers for precomputed-grid interpolation.
//!
//! Modules that precompute an expensive simulation over a parameter grid
//! rely on these to stay interactive: a binary bracket search over a sorted
//! axis, linear/bilinear interpolation, and trapezoidal accumulation. The
//! page runtime ships JavaScript twins of the same routines (see
//! [`crate::site::runtime`]); keep semantics in sync.

/// Result of a bracket search over a sorted axis.
///
/// `i0`/`i1` are the indices of the enclosing cell and `t` the normalized
/// position within it. Out-of-range queries clamp to the first/last cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bracket {
    /// Lower cell index.
    pub i0: usize,
    /// Upper cell index.
    pub i1: usize,
    /// Normalized position in `[0, 1]`.
    pub t: f64,
}

/// Binary search for the cell of `values` that brackets `x`.
///
/// `values` must be sorted ascending. Axes shorter than 2 yield a
/// degenerate bracket at index 0.
#[must_use]
pub fn find_bracket(values: &[f64], x: f64) -> Bracket {
    let n = values.len();
    if n < 2 {
        return Bracket { i0: 0, i1: 0, t: 0.0 };
    }
    if x <= values[0] {
        return Bracket { i0: 0, i1: 1, t: 0.0 };
    }
    if x >= values[n - 1] {
        return Bracket {
            i0: n - 2,
            i1: n - 1,
            t: 1.0,
        };
    }
    let (mut lo, mut hi) = (0, n - 1);
    while hi - lo > 1 {
        let mid = (lo + hi) / 2;
        if values[mid] <= x {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    let (a, b) = (values[lo], values[hi]);
    Bracket {
        i0: lo,
        i1: hi,
        t: (x - a) / (b - a),
    }
}

/// Linear interpolation between `a` and `b`.
#[must_use]
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a * (1.0 - t) + b * t
}

/// Bilinear interpolation of the four cell corners.
#[must_use]
pub fn bilinear(a00: f64, a01: f64, a10: f64, a11: f64, tx: f64, ty: f64) -> f64 {
    let a0 = lerp(a00, a01, ty);
    let a1 = lerp(a10, a11, ty);
    lerp(a0, a1, tx)
}

/// Bilinear interpolation of a series grid `grid[nx][ny][n]` at `(x, y)`.
///
/// Each grid node holds a time series of equal length; the result is the
/// pointwise bilinear blend of the four surrounding series.
///
/// # Panics
///
/// Panics if the four bracketing series have different lengths (a grid
/// construction bug, not a runtime condition).
#[must_use]
pub fn bilinear_series(grid: &[Vec<Vec<f64>>], xs: &[f64], ys: &[f64], x: f64, y: f64) -> Vec<f64> {
    let bx = find_bracket(xs, x);
    let by = find_bracket(ys, y);
    let g00 = &grid[bx.i0][by.i0];
    let g01 = &grid[bx.i0][by.i1];
    let g10 = &grid[bx.i1][by.i0];
    let g11 = &grid[bx.i1][by.i1];
    assert!(
        g00.len() == g01.len() && g00.len() == g10.len() && g00.len() == g11.len(),
        "grid series length mismatch"
    );
    (0..g00.len())
        .map(|k| bilinear(g00[k], g01[k], g10[k], g11[k], bx.t, by.t))
        .collect()
}

/// Cumulative trapezoidal integral of uniformly sampled `values` with step `dt`.
///
/// Returns a series of the same length; element 0 is 0.
#[must_use]
pub fn cumulative_trapezoid(values: &[f64], dt: f64) -> Vec<f64> {
    let mut out = vec![0.0; values.len()];
    for k in 1..values.len() {
        out[k] = out[k - 1] + 0.5 * (values[k - 1] + values[k]) * dt;
    }
    out
}

/// Evenly spaced samples from `start` to `end` inclusive.
#[must_use]
pub fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (n - 1) as f64;
            (0..n).map(|i| start + step * i as f64).collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn bracket_below_range_clamps() {
        let b = find_bracket(&[1.0, 2.0, 3.0], 0.5);
        assert_eq!((b.i0, b.i1), (0, 1));
        assert!((b.t - 0.0).abs() < 1e-12);
    }

    #[test]
    fn bracket_above_range_clamps() {
        let b = find_bracket(&[1.0, 2.0, 3.0], 9.0);
        assert_eq!((b.i0, b.i1), (1, 2));
        assert!((b.t - 1.0).abs() < 1e-12);
    }

    #[test]
    fn bracket_interior() {
        let b = find_bracket(&[0.0, 1.0, 2.0, 4.0], 3.0);
        assert_eq!((b.i0, b.i1), (2, 3));
        assert!((b.t - 0.5).abs() < 1e-12);
    }

    #[test]
    fn bracket_degenerate_axis() {
        let b = find_bracket(&[5.0], 5.0);
        assert_eq!((b.i0, b.i1, b.t), (0, 0, 0.0));
        let b = find_bracket(&[], 5.0);
        assert_eq!((b.i0, b.i1, b.t), (0, 0, 0.0));
    }

    #[test]
    fn lerp_endpoints() {
        assert!((lerp(2.0, 6.0, 0.0) - 2.0).abs() < 1e-12);
        assert!((lerp(2.0, 6.0, 1.0) - 6.0).abs() < 1e-12);
        assert!((lerp(2.0, 6.0, 0.5) - 4.0).abs() < 1e-12);
    }

    #[test]
    fn bilinear_corners() {
        assert!((bilinear(1.0, 2.0, 3.0, 4.0, 0.0, 0.0) - 1.0).abs() < 1e-12);
        assert!((bilinear(1.0, 2.0, 3.0, 4.0, 0.0, 1.0) - 2.0).abs() < 1e-12);
        assert!((bilinear(1.0, 2.0, 3.0, 4.0, 1.0, 0.0) - 3.0).abs() < 1e-12);
        assert!((bilinear(1.0, 2.0, 3.0, 4.0, 1.0, 1.0) - 4.0).abs() < 1e-12);
    }

    #[test]
    fn bilinear_series_recovers_grid_nodes() {
        let xs = vec![0.0, 1.0];
        let ys = vec![0.0, 1.0];
        // grid[x][y] = series
        let grid = vec![
            vec![vec![1.0, 10.0], vec![2.0, 20.0]],
            vec![vec![3.0, 30.0], vec![4.0, 40.0]],
        ];
        let s = bilinear_series(&grid, &xs, &ys, 0.0, 1.0);
        assert_eq!(s, vec![2.0, 20.0]);
        let mid = bilinear_series(&grid, &xs, &ys, 0.5, 0.5);
        assert!((mid[0] - 2.5).abs() < 1e-12);
        assert!((mid[1] - 25.0).abs() < 1e-12);
    }

    #[test]
    fn cumulative_trapezoid_of_constant() {
        let vals = vec![2.0; 5];
        let cum = cumulative_trapezoid(&vals, 0.5);
        assert!((cum[4] - 4.0).abs() < 1e-12);
        assert!((cum[0]).abs() < 1e-12);
    }

    #[test]
    fn linspace_endpoints_and_count() {
        let v = linspace(0.0, 1.0, 5);
        assert_eq!(v.len(), 5);
        assert!((v[0]).abs() < 1e-12);
        assert!((v[4] - 1.0).abs() < 1e-12);
        assert!((v[1] - 0.25).abs() < 1e-12);
        assert!(linspace(0.0, 1.0, 0).is_empty());
        assert_eq!(linspace(3.0, 9.0, 1), vec![3.0]);
    }

    proptest! {
        #[test]
        fn bracket_invariants(mut axis in prop::collection::vec(-1e6f64..1e6, 2..64), x in -2e6f64..2e6) {
            axis.sort_by(|a, b| a.partial_cmp(b).unwrap());
            axis.dedup();
            prop_assume!(axis.len() >= 2);
            let b = find_bracket(&axis, x);
            prop_assert_eq!(b.i1, b.i0 + 1);
            prop_assert!((0.0..=1.0).contains(&b.t));
            if x >= axis[0] && x <= axis[axis.len() - 1] {
                prop_assert!(axis[b.i0] <= x && x <= axis[b.i1]);
                // reconstructing x from the bracket is exact up to rounding
                let rx = lerp(axis[b.i0], axis[b.i1], b.t);
                prop_assert!((rx - x).abs() <= 1e-6 * (1.0 + x.abs()));
            }
        }
    }
}
