//! Supernova likelihood — JLA Type Ia log-posterior for cosmological and
//! light-curve standardization parameters.
//!
//! Purpose
//! -------
//! Evaluate the Bayesian log-posterior of Nielsen et al. (2016) style
//! analyses on the JLA sample: a flat-prior, Gaussian likelihood over the
//! interleaved `(m_B, x1, c)` observations with a fixed observational
//! covariance and a parameter-dependent intrinsic-scatter term. The engine
//! is built once and called many times by an external sampler.
//!
//! Key behaviors
//! -------------
//! - [`core`]: catalog container, parameter names and active/fixed split,
//!   flat priors, covariance assembly, options/config, scratch buffers.
//! - [`interp`]: cubic B-spline bases, bicubic surfaces, and the
//!   per-supernova distance interpolants with the distance-modulus
//!   evaluator.
//! - [`models`]: Cholesky Gaussian log-density, the [`LogDensity`] seam,
//!   and [`SnPosterior`].
//! - [`io`]: catalog and covariance file loaders.
//! - [`errors`]: [`SnError`] and [`ParamError`].
//!
//! Invariants & assumptions
//! ------------------------
//! - Index order is shared by the catalog rows, the interpolants and the
//!   3×3 covariance blocks.
//! - Everything built at setup time is immutable; evaluation mutates only a
//!   caller-owned [`PosteriorScratch`], so one [`SnPosterior`] can serve
//!   many threads.
//! - Out-of-support proposals and non-positive-definite covariances are
//!   evaluation outcomes, not errors; both map to the `-1e9` sentinel.
//!
//! Downstream usage
//! ----------------
//! - Typical flow:
//!   1. [`io::read_catalog`] → [`SnCatalog`].
//!   2. [`InterpolantSet::build`] from an in-memory `(N, n_om, n_ol)` table.
//!   3. [`io::read_covariance`] (or [`ObservationalCovariance::compose`]).
//!   4. [`SnPosterior::new`] (or [`SnPosterior::from_config`] with a
//!      [`PosteriorConfig`]).
//!   5. Per worker: `let mut s = post.scratch();` then
//!      `post.log_posterior(theta, &mut s)`; or
//!      [`SnPosterior::log_posterior_batch`] for a walker matrix.
//!
//! Testing notes
//! -------------
//! - Unit tests live next to each module; end-to-end properties (closed-form
//!   normalization, sentinel behavior, permutation symmetry, batch/serial
//!   agreement, file loading) are in `tests/posterior_pipeline.rs`.

pub mod core;
pub mod errors;
pub mod interp;
pub mod io;
pub mod models;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::core::{
    covariance::{CovarianceSet, CovarianceTerm, ObservationalCovariance},
    data::SnCatalog,
    options::{PosteriorConfig, PosteriorOptions},
    params::{ActiveParams, ParamName, SnParams},
    priors::PRIOR_PENALTY,
    workspace::PosteriorScratch,
};

pub use self::errors::{ParamError, ParamResult, SnError, SnResult};

pub use self::interp::{
    bivariate::{BicubicSpline, BoundingBox, SurfaceInterpolant},
    table::{InterpolantSet, distance_moduli, distance_modulus_vector},
};

pub use self::models::{
    posterior::{Evaluation, SnPosterior},
    traits::LogDensity,
};

// ---- Optional convenience prelude for downstream crates -------------------
//
//     use jla_likelihood::supernova::prelude::*;

pub mod prelude {
    pub use super::{
        ActiveParams, BoundingBox, CovarianceSet, CovarianceTerm, Evaluation, InterpolantSet,
        LogDensity, ObservationalCovariance, PRIOR_PENALTY, ParamError, ParamName,
        PosteriorConfig, PosteriorOptions, PosteriorScratch, SnCatalog, SnError, SnParams,
        SnPosterior, SnResult,
    };
    pub use super::io::{CatalogColumns, read_catalog, read_covariance};
}
