//! Log-density seam and parallel batch evaluation.
//!
//! Purpose
//! -------
//! Describe what an external sampler needs from a target density (its
//! dimension, a per-worker scratch, and a scalar evaluation) so that batch
//! evaluation can be written once against the trait.
//!
//! Key behaviors
//! -------------
//! - [`LogDensity`] is `Send + Sync`: one instance is shared read-only by
//!   every worker thread.
//! - [`evaluate_batch`] maps each row of a `(walkers × dim)` matrix to a
//!   log-density on the rayon pool, creating one scratch per worker split
//!   with `map_init`. Output order matches row order.
use crate::supernova::errors::{ParamError, SnResult};
use ndarray::{Array1, ArrayView1, ArrayView2, Axis};
use rayon::prelude::*;

pub trait LogDensity: Send + Sync {
    type Scratch: Send;

    /// Length of the parameter vector.
    fn dim(&self) -> usize;

    /// Fresh buffers for one worker.
    fn scratch(&self) -> Self::Scratch;

    fn log_density(&self, theta: ArrayView1<f64>, scratch: &mut Self::Scratch) -> SnResult<f64>;
}

/// Evaluate every row of `thetas` in parallel.
///
/// Errors
/// ------
/// - `ParamError::ThetaLengthMismatch` if `thetas.ncols() != target.dim()`.
/// - The first error returned by any row.
pub fn evaluate_batch<T: LogDensity>(target: &T, thetas: ArrayView2<f64>) -> SnResult<Array1<f64>> {
    if thetas.ncols() != target.dim() {
        return Err(
            ParamError::ThetaLengthMismatch { expected: target.dim(), actual: thetas.ncols() }.into()
        );
    }
    let values = thetas
        .axis_iter(Axis(0))
        .into_par_iter()
        .map_init(|| target.scratch(), |scratch, theta| target.log_density(theta, scratch))
        .collect::<SnResult<Vec<f64>>>()?;
    Ok(Array1::from_vec(values))
}
