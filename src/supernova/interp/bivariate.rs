//! Bicubic interpolating spline on a rectangular grid.
//!
//! Purpose
//! -------
//! Provide a smooth two-argument function that passes exactly through the
//! values of a rectangular grid, plus the [`SurfaceInterpolant`] trait
//! through which the distance-modulus evaluator consumes it.
//!
//! Key behaviors
//! -------------
//! - [`BoundingBox`] validates the `(x_min, x_max, y_min, y_max)` interval
//!   that carries the boundary knots.
//! - [`BicubicSpline::fit`] computes tensor-product coefficients
//!   `C = Bx⁻¹ Z By⁻ᵀ` using two [`CubicBasis`] objects that may be shared
//!   by many surfaces on the same axes.
//! - [`BicubicSpline::eval`] sums the 4×4 non-zero basis products; outside
//!   the box the boundary polynomial patch is continued.
//!
//! Invariants & assumptions
//! ------------------------
//! - `values` has shape `(x_basis.len(), y_basis.len())`, with
//!   `values[[a, b]]` taken at `(x_a, y_b)`.
//! - A fitted spline is immutable, so `&BicubicSpline` is safe to share
//!   across threads.
use crate::supernova::{
    errors::{SnError, SnResult},
    interp::bspline::{CubicBasis, DEGREE},
};
use nalgebra::DMatrix;
use ndarray::ArrayView2;
use std::sync::Arc;

/// A continuous function of `(Ωm, ΩΛ)`.
pub trait SurfaceInterpolant: Send + Sync {
    fn eval(&self, om: f64, ol: f64) -> f64;
}

/// Rectangle carrying the outer knots of both axes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

impl BoundingBox {
    /// Errors
    /// ------
    /// - `SnError::InvalidBoundingBox` unless both intervals are finite
    ///   with lower < upper.
    pub fn new(x_min: f64, x_max: f64, y_min: f64, y_max: f64) -> SnResult<Self> {
        for (axis, lower, upper) in [("Om", x_min, x_max), ("OL", y_min, y_max)] {
            if !(lower.is_finite() && upper.is_finite() && lower < upper) {
                return Err(SnError::InvalidBoundingBox { axis, lower, upper });
            }
        }
        Ok(BoundingBox { x_min, x_max, y_min, y_max })
    }

    /// From `[x_min, x_max, y_min, y_max]`.
    pub fn from_slice(values: &[f64]) -> SnResult<Self> {
        match *values {
            [x_min, x_max, y_min, y_max] => BoundingBox::new(x_min, x_max, y_min, y_max),
            _ => Err(SnError::DimensionMismatch {
                what: "bounding box",
                expected: 4,
                actual: values.len(),
            }),
        }
    }
}

/// BicubicSpline — tensor-product cubic interpolant.
#[derive(Debug, Clone)]
pub struct BicubicSpline {
    x_basis: Arc<CubicBasis>,
    y_basis: Arc<CubicBasis>,
    coeffs: DMatrix<f64>,
}

impl BicubicSpline {
    /// Fit the interpolant through `values`.
    ///
    /// Errors
    /// ------
    /// - `SnError::DimensionMismatch` if `values` is not
    ///   `(x_basis.len(), y_basis.len())`.
    /// - `SnError::SingularCollocation` from the axis solves.
    pub fn fit(
        x_basis: Arc<CubicBasis>, y_basis: Arc<CubicBasis>, values: ArrayView2<f64>,
    ) -> SnResult<Self> {
        let (nx, ny) = (x_basis.len(), y_basis.len());
        if values.nrows() != nx {
            return Err(SnError::DimensionMismatch {
                what: "grid rows (Om axis)",
                expected: nx,
                actual: values.nrows(),
            });
        }
        if values.ncols() != ny {
            return Err(SnError::DimensionMismatch {
                what: "grid columns (OL axis)",
                expected: ny,
                actual: values.ncols(),
            });
        }

        // W = Bx⁻¹ Z, then C = (By⁻¹ Wᵀ)ᵀ.
        let mut w = DMatrix::from_fn(nx, ny, |a, b| values[[a, b]]);
        x_basis.solve_columns("Om", &mut w)?;
        let mut wt = w.transpose();
        y_basis.solve_columns("OL", &mut wt)?;
        Ok(BicubicSpline { x_basis, y_basis, coeffs: wt.transpose() })
    }

    /// Convenience: build both bases and fit in one call.
    pub fn interpolate(
        x: ndarray::ArrayView1<f64>, y: ndarray::ArrayView1<f64>, values: ArrayView2<f64>,
        bbox: &BoundingBox,
    ) -> SnResult<Self> {
        let x_basis = Arc::new(CubicBasis::new("Om", x, bbox.x_min, bbox.x_max)?);
        let y_basis = Arc::new(CubicBasis::new("OL", y, bbox.y_min, bbox.y_max)?);
        BicubicSpline::fit(x_basis, y_basis, values)
    }

    pub fn coefficients(&self) -> &DMatrix<f64> {
        &self.coeffs
    }

    #[inline]
    pub fn eval(&self, x: f64, y: f64) -> f64 {
        let (sx, bx) = self.x_basis.eval(x);
        let (sy, by) = self.y_basis.eval(y);
        let (x0, y0) = (sx - DEGREE, sy - DEGREE);
        let mut acc = 0.0;
        for (a, wx) in bx.iter().enumerate() {
            let mut row = 0.0;
            for (b, wy) in by.iter().enumerate() {
                row += wy * self.coeffs[(x0 + a, y0 + b)];
            }
            acc += wx * row;
        }
        acc
    }
}

impl SurfaceInterpolant for BicubicSpline {
    #[inline]
    fn eval(&self, om: f64, ol: f64) -> f64 {
        BicubicSpline::eval(self, om, ol)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::{Array1, Array2};

    fn surface(x: f64, y: f64) -> f64 {
        // Bicubic, so it lies in the spline space.
        2.0 + x - 0.5 * y + x * y + 0.3 * x * x * x - 0.2 * x * y * y * y + y * y
    }

    fn grid(nx: usize, ny: usize) -> (Array1<f64>, Array1<f64>, Array2<f64>) {
        let x = Array1::from_shape_fn(nx, |i| 1.2 * (i as f64 / (nx - 1) as f64).powf(1.3));
        let y = Array1::<f64>::linspace(0.0, 1.2, ny);
        let z = Array2::from_shape_fn((nx, ny), |(a, b)| surface(x[a], y[b]));
        (x, y, z)
    }

    #[test]
    // Purpose
    // -------
    // The spline passes through every grid node.
    //
    // Given
    // -----
    // - A non-polynomial surface on a 7×9 grid (different axis lengths).
    //
    // Expect
    // ------
    // - eval(x_a, y_b) == z[a, b] to round-off.
    fn spline_reproduces_grid_nodes() {
        let (x, y, _) = grid(7, 9);
        let z = Array2::from_shape_fn((7, 9), |(a, b)| (x[a] + 0.1).ln() * (1.0 + y[b]).sqrt());
        let bbox = BoundingBox::new(0.0, 1.2, 0.0, 1.2).unwrap();
        let spline = BicubicSpline::interpolate(x.view(), y.view(), z.view(), &bbox).unwrap();
        for a in 0..7 {
            for b in 0..9 {
                assert_relative_eq!(spline.eval(x[a], y[b]), z[[a, b]], epsilon = 1e-11);
            }
        }
    }

    #[test]
    // Purpose
    // -------
    // Bicubic polynomials are reproduced between nodes and outside the box.
    fn bicubic_polynomials_are_reproduced_and_extrapolated() {
        let (x, y, z) = grid(8, 6);
        let bbox = BoundingBox::new(0.0, 1.2, 0.0, 1.2).unwrap();
        let spline = BicubicSpline::interpolate(x.view(), y.view(), z.view(), &bbox).unwrap();
        for &(px, py) in &[(0.33, 0.71), (1.05, 0.02), (-0.1, 0.5), (1.3, 1.35), (0.6, -0.2)] {
            assert_relative_eq!(spline.eval(px, py), surface(px, py), epsilon = 1e-9);
        }
    }

    #[test]
    // Purpose
    // -------
    // Shape and bounding-box errors surface at fit time.
    fn fit_rejects_bad_shapes_and_boxes() {
        let (x, y, z) = grid(6, 5);
        let bbox = BoundingBox::new(0.0, 1.2, 0.0, 1.2).unwrap();
        let transposed = z.t().to_owned();
        assert!(matches!(
            BicubicSpline::interpolate(x.view(), y.view(), transposed.view(), &bbox),
            Err(SnError::DimensionMismatch { expected: 6, actual: 5, .. })
        ));
        assert!(matches!(
            BoundingBox::new(1.0, 0.0, 0.0, 1.2),
            Err(SnError::InvalidBoundingBox { axis: "Om", .. })
        ));
        assert!(matches!(
            BoundingBox::from_slice(&[0.0, 1.2, 0.0]),
            Err(SnError::DimensionMismatch { expected: 4, actual: 3, .. })
        ));
    }
}
