//! Likelihood models.
//!
//! - `gaussian`: Cholesky-based multivariate normal log-density.
//! - `traits`: the [`traits::LogDensity`] seam and parallel batch evaluation.
//! - `posterior`: the JLA log-posterior, [`posterior::SnPosterior`].
pub mod gaussian;
pub mod posterior;
pub mod traits;
