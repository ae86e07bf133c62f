//! Per-supernova distance interpolants and the distance-modulus evaluator.
//!
//! Purpose
//! -------
//! Turn a precomputed luminosity-distance table of shape `(N, n_om, n_ol)`
//! into one bicubic interpolant per supernova, and evaluate the model
//! distance moduli `μ_i = 25 + 5·log10(D_i(Ωm, ΩΛ)·c/H0)` from them.
//!
//! Key behaviors
//! -------------
//! - [`InterpolantSet::build`] checks every dimension against the catalog
//!   redshifts, rescales slice `i` by `(1 + z_hel,i) / (1 + z_cmb,i)`, and
//!   fits a [`BicubicSpline`] per slice. The two axis bases are factorised
//!   once and shared by all slices.
//! - [`distance_moduli`] writes `μ` into a caller-owned buffer;
//!   [`distance_modulus_vector`] allocates.
//!
//! Invariants & assumptions
//! ------------------------
//! - Interpolant `i` belongs to catalog row `i`.
//! - Tabulated distances are c/H0-free; `c_over_h0` restores Mpc.
//! - Evaluation outside the bounding box extrapolates; rejecting
//!   unphysical densities is the prior's job.
//!
//! Performance
//! -----------
//! - Build cost is two `m × m` LU factorisations plus `N` pairs of
//!   triangular solves; evaluation is `O(16 N)`.
use crate::supernova::{
    core::data::time_dilation,
    errors::{SnError, SnResult},
    interp::{
        bivariate::{BicubicSpline, BoundingBox, SurfaceInterpolant},
        bspline::CubicBasis,
    },
};
use ndarray::{Array1, Array2, ArrayView1, ArrayView3, ArrayViewMut1, Axis};
use std::sync::Arc;

/// InterpolantSet — one fitted surface per supernova.
#[derive(Debug, Clone)]
pub struct InterpolantSet {
    splines: Vec<BicubicSpline>,
    bbox: BoundingBox,
}

impl InterpolantSet {
    /// Build all interpolants.
    ///
    /// Parameters
    /// ----------
    /// - `grid`: `(N, n_om, n_ol)` c/H0-free luminosity distances;
    ///   `grid[[i, a, b]]` is taken at `(om_axis[a], ol_axis[b])`.
    /// - `om_axis`, `ol_axis`: strictly increasing axes inside `bbox`.
    /// - `z_cmb`, `z_hel`: length-`N` redshifts for the rescaling.
    /// - `bbox`: outer knot positions.
    ///
    /// Errors
    /// ------
    /// - `SnError::DimensionMismatch` if the redshift lengths differ from
    ///   each other or from `grid`'s leading dimension, or if the axis
    ///   lengths differ from the grid's trailing dimensions.
    /// - Axis errors from [`CubicBasis::new`].
    pub fn build(
        grid: ArrayView3<f64>, om_axis: ArrayView1<f64>, ol_axis: ArrayView1<f64>,
        z_cmb: ArrayView1<f64>, z_hel: ArrayView1<f64>, bbox: &BoundingBox,
    ) -> SnResult<Self> {
        let (n_sn, n_om, n_ol) = grid.dim();
        let checks = [
            ("heliocentric redshift sequence", z_cmb.len(), z_hel.len()),
            ("interpolation table leading dimension", z_cmb.len(), n_sn),
            ("Om axis length", n_om, om_axis.len()),
            ("OL axis length", n_ol, ol_axis.len()),
        ];
        for (what, expected, actual) in checks {
            if expected != actual {
                return Err(SnError::DimensionMismatch { what, expected, actual });
            }
        }

        let x_basis = Arc::new(CubicBasis::new("Om", om_axis, bbox.x_min, bbox.x_max)?);
        let y_basis = Arc::new(CubicBasis::new("OL", ol_axis, bbox.y_min, bbox.y_max)?);
        log::info!("building {n_sn} distance interpolants on a {n_om}x{n_ol} grid");

        let mut scaled = Array2::<f64>::zeros((n_om, n_ol));
        let mut splines = Vec::with_capacity(n_sn);
        for (i, slice) in grid.axis_iter(Axis(0)).enumerate() {
            let factor = time_dilation(z_cmb[i], z_hel[i]);
            scaled.assign(&slice);
            scaled *= factor;
            splines.push(BicubicSpline::fit(x_basis.clone(), y_basis.clone(), scaled.view())?);
        }
        log::debug!("interpolant set ready ({} splines)", splines.len());
        Ok(InterpolantSet { splines, bbox: *bbox })
    }

    pub fn len(&self) -> usize {
        self.splines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.splines.is_empty()
    }

    pub fn bbox(&self) -> &BoundingBox {
        &self.bbox
    }

    pub fn get(&self, i: usize) -> Option<&BicubicSpline> {
        self.splines.get(i)
    }

    pub fn splines(&self) -> &[BicubicSpline] {
        &self.splines
    }

    /// Reorder interpolants: new position `k` holds old interpolant
    /// `order[k]`.
    pub fn permuted(&self, order: &[usize]) -> InterpolantSet {
        InterpolantSet {
            splines: order.iter().map(|&k| self.splines[k].clone()).collect(),
            bbox: self.bbox,
        }
    }
}

/// Distance modulus of one supernova from its c/H0-free distance.
#[inline]
pub fn distance_modulus(distance: f64, c_over_h0: f64) -> f64 {
    25.0 + 5.0 * (distance * c_over_h0).log10()
}

/// Write `μ_i` for every interpolant into `out`.
///
/// Errors
/// ------
/// - `SnError::DimensionMismatch` if `out.len() != interpolants.len()`.
pub fn distance_moduli<S: SurfaceInterpolant>(
    interpolants: &[S], om0: f64, ol0: f64, c_over_h0: f64, mut out: ArrayViewMut1<f64>,
) -> SnResult<()> {
    if out.len() != interpolants.len() {
        return Err(SnError::DimensionMismatch {
            what: "distance modulus buffer",
            expected: interpolants.len(),
            actual: out.len(),
        });
    }
    for (mu, spline) in out.iter_mut().zip(interpolants) {
        *mu = distance_modulus(spline.eval(om0, ol0), c_over_h0);
    }
    Ok(())
}

/// Allocating variant of [`distance_moduli`].
pub fn distance_modulus_vector<S: SurfaceInterpolant>(
    interpolants: &[S], om0: f64, ol0: f64, c_over_h0: f64,
) -> Array1<f64> {
    interpolants
        .iter()
        .map(|spline| distance_modulus(spline.eval(om0, ol0), c_over_h0))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::{Array1, Array3, array};

    // -------------------------------------------------------------------------
    // Fixtures
    // -------------------------------------------------------------------------
    // A smooth positive "distance" surface per supernova on a 6×5 grid with
    // a mild redshift dependence.
    fn table(z: &[f64]) -> (Array3<f64>, Array1<f64>, Array1<f64>) {
        let om = Array1::<f64>::linspace(0.0, 1.2, 6);
        let ol = Array1::<f64>::linspace(0.0, 1.2, 5);
        let grid = Array3::from_shape_fn((z.len(), 6, 5), |(i, a, b)| {
            z[i] * (1.0 + 0.3 * z[i]) * (1.0 - 0.2 * om[a] + 0.15 * ol[b]).exp()
        });
        (grid, om, ol)
    }

    #[test]
    // Purpose
    // -------
    // On grid nodes, μ equals 25 + 5 log10 of the rescaled tabulated value
    // times c/H0.
    //
    // Given
    // -----
    // - Three supernovae with z_hel ≠ z_cmb.
    //
    // Expect
    // ------
    // - μ_i(Om_a, OL_b) == 25 + 5 log10(grid[i,a,b]·(1+z_hel)/(1+z_cmb)·cH0).
    fn grid_nodes_reproduce_rescaled_table() {
        let z_cmb = array![0.05, 0.4, 1.1];
        let z_hel = array![0.051, 0.398, 1.102];
        let (grid, om, ol) = table(z_cmb.as_slice().unwrap());
        let bbox = BoundingBox::new(0.0, 1.2, 0.0, 1.2).unwrap();
        let set = InterpolantSet::build(
            grid.view(),
            om.view(),
            ol.view(),
            z_cmb.view(),
            z_hel.view(),
            &bbox,
        )
        .unwrap();
        let c_over_h0 = 4282.7;
        for a in 0..om.len() {
            for b in 0..ol.len() {
                let mu = distance_modulus_vector(set.splines(), om[a], ol[b], c_over_h0);
                for i in 0..3 {
                    let scaled = grid[[i, a, b]] * (1.0 + z_hel[i]) / (1.0 + z_cmb[i]);
                    let expected = 25.0 + 5.0 * (scaled * c_over_h0).log10();
                    assert_relative_eq!(mu[i], expected, epsilon = 1e-10);
                }
            }
        }
    }

    #[test]
    // Purpose
    // -------
    // Buffer and allocating evaluators agree, and evaluation outside the
    // box returns a finite extrapolated value.
    fn buffer_and_vector_variants_agree() {
        let z = array![0.1, 0.7];
        let (grid, om, ol) = table(z.as_slice().unwrap());
        let bbox = BoundingBox::new(0.0, 1.2, 0.0, 1.2).unwrap();
        let set =
            InterpolantSet::build(grid.view(), om.view(), ol.view(), z.view(), z.view(), &bbox)
                .unwrap();
        let mut out = Array1::zeros(2);
        distance_moduli(set.splines(), 0.3, 0.7, 4000.0, out.view_mut()).unwrap();
        assert_eq!(out, distance_modulus_vector(set.splines(), 0.3, 0.7, 4000.0));

        let outside = distance_modulus_vector(set.splines(), 1.25, -0.05, 4000.0);
        assert!(outside.iter().all(|v| v.is_finite()));

        let mut short = Array1::zeros(1);
        assert!(matches!(
            distance_moduli(set.splines(), 0.3, 0.7, 4000.0, short.view_mut()),
            Err(SnError::DimensionMismatch { expected: 2, actual: 1, .. })
        ));
    }

    #[test]
    // Purpose
    // -------
    // Every disagreeing dimension is reported as a DimensionMismatch.
    fn build_rejects_mismatched_dimensions() {
        let z = array![0.1, 0.7];
        let (grid, om, ol) = table(z.as_slice().unwrap());
        let bbox = BoundingBox::new(0.0, 1.2, 0.0, 1.2).unwrap();
        let build = |z_cmb: ArrayView1<f64>, z_hel: ArrayView1<f64>, om: ArrayView1<f64>,
                     ol: ArrayView1<f64>| {
            InterpolantSet::build(grid.view(), om, ol, z_cmb, z_hel, &bbox)
        };

        let z3 = array![0.1, 0.2, 0.3];
        let short_axis = Array1::<f64>::linspace(0.0, 1.2, 4);
        let cases = [
            build(z.view(), z3.view(), om.view(), ol.view()),
            build(z3.view(), z3.view(), om.view(), ol.view()),
            build(z.view(), z.view(), short_axis.view(), ol.view()),
            build(z.view(), z.view(), om.view(), om.view()),
        ];
        for result in cases {
            assert!(matches!(result, Err(SnError::DimensionMismatch { .. })));
        }
    }
}
