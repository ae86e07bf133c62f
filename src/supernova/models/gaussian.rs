//! Multivariate normal log-density via an in-place Cholesky factor.
//!
//! Evaluates `log N(Δ | 0, Σ) = −½·k·ln(2π) − Σ ln L_ii − ½‖L⁻¹Δ‖²` where
//! `Σ = L Lᵀ`. The covariance buffer is handed to nalgebra by value and
//! recovered from the factor afterwards, so repeated calls reuse the same
//! allocation. `Σ` is never inverted.
use nalgebra::{Cholesky, DMatrix, DVector};
use ndarray::ArrayView1;

/// `ln(2π)`.
pub const LN_2PI: f64 = 1.8378770664093453;

/// Log-density of `residual` under `N(0, cov)`.
///
/// On return `cov` holds the Cholesky factor in its lower triangle (its
/// upper triangle is unspecified) and `whitened` holds `L⁻¹Δ`. Returns
/// `None` when `cov` is not positive-definite; `cov` is then reset to a
/// zeroed buffer of the same size.
///
/// Panics
/// ------
/// - If `residual`, `whitened`, and `cov` disagree in dimension.
pub fn gaussian_log_density(
    cov: &mut DMatrix<f64>, residual: ArrayView1<f64>, whitened: &mut DVector<f64>,
) -> Option<f64> {
    let dim = cov.nrows();
    assert_eq!(residual.len(), dim, "residual length must match covariance");
    assert_eq!(whitened.len(), dim, "whitened length must match covariance");

    let matrix = std::mem::replace(cov, DMatrix::zeros(0, 0));
    let Some(chol) = Cholesky::new(matrix) else {
        *cov = DMatrix::zeros(dim, dim);
        return None;
    };

    for (w, r) in whitened.iter_mut().zip(residual.iter()) {
        *w = *r;
    }
    let l = chol.l_dirty();
    let solved = l.solve_lower_triangular_mut(whitened);
    let log_det_half: f64 = (0..dim).map(|i| l[(i, i)].ln()).sum();
    let quad = whitened.norm_squared();
    *cov = chol.unpack_dirty();

    if !solved {
        return None;
    }
    Some(-0.5 * LN_2PI * dim as f64 - log_det_half - 0.5 * quad)
}
