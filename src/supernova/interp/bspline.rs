//! Cubic B-spline basis on one axis with interpolation knots.
//!
//! Purpose
//! -------
//! Build the knot vector and collocation system for exact (zero-smoothing)
//! cubic spline interpolation through the nodes of one grid axis, and
//! evaluate the four non-zero basis functions at an arbitrary point.
//!
//! Key behaviors
//! -------------
//! - Knot placement: for nodes `x_0 < … < x_{m-1}` and an interval
//!   `[lo, hi]` containing them, the knots are `lo` (×4), `x_2 … x_{m-3}`,
//!   `hi` (×4). This is the "not-a-knot"-style placement used by FITPACK's
//!   interpolating splines and yields exactly `m` coefficients.
//! - The `m × m` collocation matrix `B[i, j] = B_j(x_i)` is LU-factorised
//!   once; [`CubicBasis::solve_columns`] applies `B⁻¹` to many right-hand
//!   sides without refactorising.
//! - [`CubicBasis::eval`] returns the knot span and the four basis values
//!   (Cox–de Boor triangle, Piegl & Tiller A2.2). Points outside
//!   `[t_3, t_m]` reuse the first or last polynomial piece, so evaluation
//!   extrapolates with the boundary polynomial instead of failing.
//!
//! Invariants & assumptions
//! ------------------------
//! - `m ≥ 4`; nodes strictly increasing and inside `[lo, hi]`. These are
//!   checked in [`CubicBasis::new`].
//! - The Schoenberg–Whitney condition holds for this knot placement, so the
//!   collocation matrix is non-singular for valid nodes.
use crate::supernova::errors::{SnError, SnResult};
use nalgebra::{DMatrix, Dyn, LU};
use ndarray::ArrayView1;

/// Spline degree.
pub const DEGREE: usize = 3;

/// Minimum number of nodes for a cubic interpolating spline.
pub const MIN_NODES: usize = DEGREE + 1;

/// CubicBasis — knots plus factorised collocation matrix for one axis.
#[derive(Debug, Clone)]
pub struct CubicBasis {
    knots: Vec<f64>,
    collocation: LU<f64, Dyn, Dyn>,
}

impl CubicBasis {
    /// Build the basis for `nodes` on `[lo, hi]`.
    ///
    /// Errors
    /// ------
    /// - `SnError::AxisTooShort` if fewer than [`MIN_NODES`] nodes.
    /// - `SnError::AxisNotIncreasing` at the first non-increasing step
    ///   (also catches NaN).
    /// - `SnError::AxisOutsideBoundingBox` if a node lies outside `[lo, hi]`.
    /// - `SnError::SingularCollocation` if the LU factor is singular.
    pub fn new(axis: &'static str, nodes: ArrayView1<f64>, lo: f64, hi: f64) -> SnResult<Self> {
        let m = nodes.len();
        if m < MIN_NODES {
            return Err(SnError::AxisTooShort { axis, len: m, min: MIN_NODES });
        }
        for i in 1..m {
            if !(nodes[i] > nodes[i - 1]) {
                return Err(SnError::AxisNotIncreasing { axis, index: i });
            }
        }
        let (first, last) = (nodes[0], nodes[m - 1]);
        if !(first >= lo && last <= hi) {
            return Err(SnError::AxisOutsideBoundingBox { axis, first, last, lower: lo, upper: hi });
        }

        let mut knots = Vec::with_capacity(m + DEGREE + 1);
        knots.extend_from_slice(&[lo; DEGREE + 1]);
        knots.extend(nodes.iter().skip(2).take(m - MIN_NODES));
        knots.extend_from_slice(&[hi; DEGREE + 1]);

        let mut matrix = DMatrix::<f64>::zeros(m, m);
        for (i, &x) in nodes.iter().enumerate() {
            let (span, values) = basis_values(&knots, m, x);
            for (a, v) in values.iter().enumerate() {
                matrix[(i, span - DEGREE + a)] = *v;
            }
        }
        let collocation = matrix.lu();
        if !collocation.is_invertible() {
            return Err(SnError::SingularCollocation { axis });
        }
        Ok(CubicBasis { knots, collocation })
    }

    /// Number of basis functions (= number of nodes).
    pub fn len(&self) -> usize {
        self.knots.len() - DEGREE - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn knots(&self) -> &[f64] {
        &self.knots
    }

    /// Span index `k` and the values of `B_{k-3} … B_k` at `x`.
    #[inline]
    pub fn eval(&self, x: f64) -> (usize, [f64; DEGREE + 1]) {
        basis_values(&self.knots, self.len(), x)
    }

    /// Overwrite each column `b` of `rhs` with `B⁻¹ b`.
    ///
    /// Errors
    /// ------
    /// - `SnError::DimensionMismatch` if `rhs` does not have `len()` rows.
    pub fn solve_columns(&self, axis: &'static str, rhs: &mut DMatrix<f64>) -> SnResult<()> {
        if rhs.nrows() != self.len() {
            return Err(SnError::DimensionMismatch {
                what: "collocation right-hand side rows",
                expected: self.len(),
                actual: rhs.nrows(),
            });
        }
        if !self.collocation.solve_mut(rhs) {
            return Err(SnError::SingularCollocation { axis });
        }
        Ok(())
    }
}

/// Largest `k` in `[3, m-1]` with `t_k <= x`; values beyond the ends clamp
/// to the boundary spans.
#[inline]
fn find_span(knots: &[f64], m: usize, x: f64) -> usize {
    let (lo_span, hi_span) = (DEGREE, m - 1);
    if !(x >= knots[lo_span + 1]) {
        return lo_span;
    }
    if x >= knots[hi_span] {
        return hi_span;
    }
    // knots[lo..=hi] is non-decreasing; partition_point gives the first
    // index with t > x.
    let offset = knots[lo_span..=hi_span].partition_point(|&t| t <= x);
    lo_span + offset - 1
}

#[inline]
fn basis_values(knots: &[f64], m: usize, x: f64) -> (usize, [f64; DEGREE + 1]) {
    let span = find_span(knots, m, x);
    let mut n = [0.0; DEGREE + 1];
    let mut left = [0.0; DEGREE + 1];
    let mut right = [0.0; DEGREE + 1];
    n[0] = 1.0;
    for j in 1..=DEGREE {
        left[j] = x - knots[span + 1 - j];
        right[j] = knots[span + j] - x;
        let mut saved = 0.0;
        for r in 0..j {
            let temp = n[r] / (right[r + 1] + left[j - r]);
            n[r] = saved + right[r + 1] * temp;
            saved = left[j - r] * temp;
        }
        n[j] = saved;
    }
    (span, n)
}
