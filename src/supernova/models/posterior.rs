//! JLA supernova log-posterior.
//!
//! Purpose
//! -------
//! Combine the catalog, the distance interpolants, the observational
//! covariance and the flat priors into the scalar log-posterior an external
//! sampler calls with a vector of active parameters.
//!
//! Key behaviors
//! -------------
//! - Two stages. The prior stage sums the active parameters' log-priors and
//!   returns [`Evaluation::PriorRejected`] as soon as the total is at or
//!   below [`REJECTION_THRESHOLD`]; it never touches per-supernova data.
//! - The likelihood stage computes μ from the interpolants, the residual
//!   vector Δ, the combined covariance, and the Gaussian log-density via a
//!   Cholesky factor. A non-positive-definite covariance yields
//!   [`Evaluation::NotPositiveDefinite`] and a `warn` log.
//! - A NaN or infinite log-density (e.g. μ extrapolated from a table whose
//!   bounding box is narrower than the prior support, giving a
//!   non-positive distance) yields [`Evaluation::NonFinite`] and a `warn`
//!   log; it is never reported as accepted.
//! - [`Evaluation::log_posterior`] maps every rejection outcome to the
//!   sentinel [`PRIOR_PENALTY`].
//!
//! Model
//! -----
//! For supernova `i` with redshift `z`:
//! - `x1(z) = x10 + eta_x1·z`, `c(z) = c0 + eta_c·z`;
//! - `M(host) = M0 + delM` if the host log-mass exceeds the split, else `M0`;
//! - `Δ[3i]   = m_B − μ − (M(host) − alfa·x1(z) + beta·c(z))`,
//!   `Δ[3i+1] = x1 − x1(z)`, `Δ[3i+2] = c − c(z)`.
//!
//! Invariants & assumptions
//! ------------------------
//! - Row `i` of the catalog, interpolant `i`, and covariance block `i` all
//!   refer to the same supernova.
//! - `SnPosterior` is immutable after construction; all mutable state lives
//!   in a caller-owned [`PosteriorScratch`].
//!
//! Downstream usage
//! ----------------
//! - Build once, call [`SnPosterior::scratch`] per worker, then call
//!   [`SnPosterior::log_posterior`] repeatedly; or hand a walker matrix to
//!   [`SnPosterior::log_posterior_batch`].
use crate::supernova::{
    core::{
        covariance::{ObservationalCovariance, assemble_combined, intrinsic_block},
        data::SnCatalog,
        options::{PosteriorConfig, PosteriorOptions},
        params::{ActiveParams, SnParams},
        priors::{PRIOR_PENALTY, REJECTION_THRESHOLD, log_prior_sum},
        workspace::PosteriorScratch,
    },
    errors::{SnError, SnResult},
    interp::table::{InterpolantSet, distance_moduli},
    models::{
        gaussian::gaussian_log_density,
        traits::{LogDensity, evaluate_batch},
    },
};
use ndarray::{Array1, ArrayView1, ArrayView2};

/// Outcome of one evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Evaluation {
    /// Finite log-posterior (log-likelihood plus log-prior).
    Accepted(f64),
    /// An active parameter lies outside its prior support.
    PriorRejected,
    /// The combined covariance could not be Cholesky-factorised.
    NotPositiveDefinite,
    /// The likelihood came out NaN or infinite.
    NonFinite,
}

impl Evaluation {
    /// Scalar for the sampler; rejections become [`PRIOR_PENALTY`].
    pub fn log_posterior(self) -> f64 {
        match self {
            Evaluation::Accepted(value) => value,
            Evaluation::PriorRejected
            | Evaluation::NotPositiveDefinite
            | Evaluation::NonFinite => PRIOR_PENALTY,
        }
    }

    pub fn is_accepted(self) -> bool {
        matches!(self, Evaluation::Accepted(_))
    }
}

/// SnPosterior — the fixed configuration bundle of one posterior.
#[derive(Debug, Clone)]
pub struct SnPosterior {
    catalog: SnCatalog,
    observations: Array1<f64>,
    interpolants: InterpolantSet,
    covariance: ObservationalCovariance,
    fixed: SnParams,
    active: ActiveParams,
    options: PosteriorOptions,
}

impl SnPosterior {
    /// Assemble a posterior.
    ///
    /// Parameters
    /// ----------
    /// - `fixed`: values of every parameter; active ones are overwritten per
    ///   call.
    ///
    /// Errors
    /// ------
    /// - `SnError::DimensionMismatch` if the interpolant count differs from
    ///   the catalog length or the covariance is not `3N × 3N`.
    pub fn new(
        catalog: SnCatalog, interpolants: InterpolantSet, covariance: ObservationalCovariance,
        fixed: SnParams, active: ActiveParams, options: PosteriorOptions,
    ) -> SnResult<Self> {
        let n = catalog.len();
        if interpolants.len() != n {
            return Err(SnError::DimensionMismatch {
                what: "interpolant count",
                expected: n,
                actual: interpolants.len(),
            });
        }
        if covariance.dim() != 3 * n {
            return Err(SnError::DimensionMismatch {
                what: "observational covariance size",
                expected: 3 * n,
                actual: covariance.dim(),
            });
        }
        log::info!(
            "posterior over {} supernovae with {} active parameters ({} fixed)",
            n,
            active.len(),
            active.fixed().len()
        );
        let observations = catalog.observations();
        Ok(SnPosterior { catalog, observations, interpolants, covariance, fixed, active, options })
    }

    /// Assemble a posterior from a resolved TOML configuration.
    pub fn from_config(
        catalog: SnCatalog, interpolants: InterpolantSet, covariance: ObservationalCovariance,
        config: &PosteriorConfig,
    ) -> SnResult<Self> {
        let (active, fixed, options) = config.resolve()?;
        SnPosterior::new(catalog, interpolants, covariance, fixed, active, options)
    }

    pub fn catalog(&self) -> &SnCatalog {
        &self.catalog
    }

    pub fn active(&self) -> &ActiveParams {
        &self.active
    }

    pub fn fixed(&self) -> &SnParams {
        &self.fixed
    }

    pub fn options(&self) -> &PosteriorOptions {
        &self.options
    }

    /// Buffers for one worker.
    pub fn scratch(&self) -> PosteriorScratch {
        PosteriorScratch::new(self.catalog.len(), self.fixed)
    }

    /// Evaluate the active vector `theta`.
    ///
    /// Errors
    /// ------
    /// - `ParamError::ThetaLengthMismatch` (as `SnError::Param`) if
    ///   `theta.len()` differs from the active count.
    /// - `SnError::DimensionMismatch` if `scratch` was built for another
    ///   catalog size.
    pub fn evaluate(
        &self, theta: ArrayView1<f64>, scratch: &mut PosteriorScratch,
    ) -> SnResult<Evaluation> {
        self.check_scratch(scratch)?;
        scratch.params = self.fixed;
        self.active.apply(&mut scratch.params, theta)?;

        let prior = log_prior_sum(&self.active, &scratch.params);
        if prior <= REJECTION_THRESHOLD {
            log::trace!("prior rejection (log-prior {prior:e}) at {:?}", scratch.params);
            return Ok(Evaluation::PriorRejected);
        }

        let params = scratch.params;
        self.fill_residuals(&params, scratch)?;
        assemble_combined(&self.covariance, &intrinsic_block(&params), &mut scratch.cov);

        match gaussian_log_density(&mut scratch.cov, scratch.residual.view(), &mut scratch.whitened)
        {
            Some(log_like) if log_like.is_finite() => Ok(Evaluation::Accepted(log_like + prior)),
            Some(log_like) => {
                log::warn!("non-finite log-likelihood {log_like} at {params:?}");
                Ok(Evaluation::NonFinite)
            }
            None => {
                log::warn!("combined covariance is not positive-definite at {params:?}");
                Ok(Evaluation::NotPositiveDefinite)
            }
        }
    }

    /// Scalar log-posterior with rejections mapped to the sentinel.
    pub fn log_posterior(
        &self, theta: ArrayView1<f64>, scratch: &mut PosteriorScratch,
    ) -> SnResult<f64> {
        Ok(self.evaluate(theta, scratch)?.log_posterior())
    }

    /// Log-posterior for each row of a `(walkers × active)` matrix,
    /// evaluated in parallel with one scratch per worker.
    pub fn log_posterior_batch(&self, thetas: ArrayView2<f64>) -> SnResult<Array1<f64>> {
        evaluate_batch(self, thetas)
    }

    /// Observed-minus-model vector Δ at a full parameter point.
    pub fn residuals(
        &self, params: &SnParams, scratch: &mut PosteriorScratch,
    ) -> SnResult<Array1<f64>> {
        self.check_scratch(scratch)?;
        self.fill_residuals(params, scratch)?;
        Ok(scratch.residual.clone())
    }

    fn check_scratch(&self, scratch: &PosteriorScratch) -> SnResult<()> {
        if scratch.n_sn() != self.catalog.len() {
            return Err(SnError::DimensionMismatch {
                what: "scratch buffers",
                expected: self.catalog.len(),
                actual: scratch.n_sn(),
            });
        }
        Ok(())
    }

    fn fill_residuals(&self, p: &SnParams, scratch: &mut PosteriorScratch) -> SnResult<()> {
        distance_moduli(
            self.interpolants.splines(),
            p.om0,
            p.ol0,
            self.options.c_over_h0,
            scratch.mu.view_mut(),
        )?;
        let cat = &self.catalog;
        let obs = &self.observations;
        let delta = &mut scratch.residual;
        for i in 0..cat.len() {
            let z = cat.z_cmb[i];
            let x1z = p.x10 + p.eta_x1 * z;
            let cz = p.c0 + p.eta_c * z;
            let m0z = if cat.host_mass[i] > self.options.host_mass_split { p.m0 + p.del_m } else { p.m0 };
            delta[3 * i] = obs[3 * i] - scratch.mu[i] - (m0z - p.alfa * x1z + p.beta * cz);
            delta[3 * i + 1] = obs[3 * i + 1] - x1z;
            delta[3 * i + 2] = obs[3 * i + 2] - cz;
        }
        Ok(())
    }
}

impl LogDensity for SnPosterior {
    type Scratch = PosteriorScratch;

    fn dim(&self) -> usize {
        self.active.len()
    }

    fn scratch(&self) -> PosteriorScratch {
        SnPosterior::scratch(self)
    }

    fn log_density(&self, theta: ArrayView1<f64>, scratch: &mut PosteriorScratch) -> SnResult<f64> {
        self.log_posterior(theta, scratch)
    }
}
