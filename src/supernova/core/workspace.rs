//! Per-worker scratch buffers for posterior evaluation.
//!
//! Purpose
//! -------
//! Hold every buffer an evaluation writes to, so that the hot path performs
//! no heap allocation and the evaluator itself stays immutable and
//! shareable across threads.
//!
//! Invariants & assumptions
//! ------------------------
//! - A scratch is sized for one catalog (`N` supernovae) and must not be
//!   shared between concurrent evaluations; each worker owns its own.
//! - Contents are overwritten on every evaluation; nothing carries over.
//! - `cov` may be temporarily moved out during a Cholesky factorization and
//!   is restored before the evaluation returns.
use crate::supernova::core::params::SnParams;
use nalgebra::{DMatrix, DVector};
use ndarray::Array1;

/// PosteriorScratch — reusable buffers for one worker.
///
/// Fields
/// ------
/// - `params`: full parameter point assembled from fixed values and `θ`.
/// - `mu`: model distance moduli, length `N`.
/// - `residual`: observed-minus-model vector Δ, length `3N`.
/// - `whitened`: `L⁻¹ Δ`, length `3N`.
/// - `cov`: combined covariance, `3N × 3N`.
#[derive(Debug, Clone)]
pub struct PosteriorScratch {
    pub params: SnParams,
    pub mu: Array1<f64>,
    pub residual: Array1<f64>,
    pub whitened: DVector<f64>,
    pub cov: DMatrix<f64>,
}

impl PosteriorScratch {
    pub fn new(n_sn: usize, fixed: SnParams) -> PosteriorScratch {
        let dim = 3 * n_sn;
        PosteriorScratch {
            params: fixed,
            mu: Array1::zeros(n_sn),
            residual: Array1::zeros(dim),
            whitened: DVector::zeros(dim),
            cov: DMatrix::zeros(dim, dim),
        }
    }

    /// Number of supernovae the buffers are sized for.
    pub fn n_sn(&self) -> usize {
        self.mu.len()
    }
}
