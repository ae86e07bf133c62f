//! jla_likelihood — JLA supernova log-posterior engine with Python bindings.
//!
//! Purpose
//! -------
//! Serve as the crate root for Rust callers and as the PyO3 bridge that
//! exposes the log-posterior to Python samplers (emcee, parallel-tempering
//! drivers) via the `_jla_likelihood` extension module.
//!
//! Key behaviors
//! -------------
//! - Re-export the [`supernova`] namespace as the public crate surface.
//! - Define the `SnLikelihood` `#[pyclass]` (a callable log-probability) and
//!   the `#[pymodule]` initializer when `python-bindings` is enabled.
//!
//! Invariants & assumptions
//! ------------------------
//! - All numerical work lives in [`supernova`]; this file performs only FFI
//!   glue, input conversion, and error mapping.
//! - Setup errors surface as Python `ValueError`; rejected proposals return
//!   the `-1e9` sentinel, never raise.
//!
//! Downstream usage
//! ----------------
//! - Rust callers depend on [`supernova`] (or `supernova::prelude`) and can
//!   ignore the feature-gated items.
//! - Python callers construct `SnLikelihood(...)` once and pass it to the
//!   sampler as the log-probability function.

pub mod supernova;
pub mod utils;

#[cfg(feature = "python-bindings")]
use numpy::{IntoPyArray, PyArray1, PyReadonlyArray2};

#[cfg(feature = "python-bindings")]
use pyo3::{prelude::*, types::PyAny};

#[cfg(feature = "python-bindings")]
use std::collections::HashMap;

#[cfg(feature = "python-bindings")]
use crate::{
    supernova::{core::workspace::PosteriorScratch, models::posterior::SnPosterior},
    utils::{build_posterior, extract_f64_array},
};

/// SnLikelihood — Python-facing JLA log-posterior.
///
/// Constructed from Python via
/// `SnLikelihood(z_cmb, z_hel, m_b, x1, color, host_mass, host_mass_err,
/// dataset, bias_corr, cov_obs, table, om_axis, ol_axis, bbox, active,
/// fixed=None, h0=70.0, host_mass_split=10.0)`:
/// - catalog columns: 1-D array-likes of length `N`;
/// - `cov_obs`: summed `(3N, 3N)` observational covariance;
/// - `table`: `(N, n_om, n_ol)` c/H0-free luminosity distances on
///   `om_axis × ol_axis`; `bbox = [om_min, om_max, ol_min, ol_max]`;
/// - `active`: sampled parameter names in θ order; `fixed`: overrides for
///   the rest (best-fit defaults otherwise).
///
/// Notes
/// -----
/// - The instance owns one scratch buffer for `__call__`;
///   `evaluate_batch` releases the GIL and uses one scratch per rayon
///   worker.
#[cfg(feature = "python-bindings")]
#[pyclass(module = "jla_likelihood")]
pub struct SnLikelihood {
    inner: SnPosterior,
    scratch: PosteriorScratch,
}

#[cfg(feature = "python-bindings")]
#[pymethods]
impl SnLikelihood {
    #[new]
    #[pyo3(signature = (
        z_cmb, z_hel, m_b, x1, color, host_mass, host_mass_err, dataset, bias_corr,
        cov_obs, table, om_axis, ol_axis, bbox, active,
        fixed = None, h0 = 70.0, host_mass_split = 10.0
    ))]
    #[allow(clippy::too_many_arguments)]
    pub fn new<'py>(
        py: Python<'py>, z_cmb: &Bound<'py, PyAny>, z_hel: &Bound<'py, PyAny>,
        m_b: &Bound<'py, PyAny>, x1: &Bound<'py, PyAny>, color: &Bound<'py, PyAny>,
        host_mass: &Bound<'py, PyAny>, host_mass_err: &Bound<'py, PyAny>,
        dataset: &Bound<'py, PyAny>, bias_corr: &Bound<'py, PyAny>, cov_obs: &Bound<'py, PyAny>,
        table: &Bound<'py, PyAny>, om_axis: &Bound<'py, PyAny>, ol_axis: &Bound<'py, PyAny>,
        bbox: Vec<f64>, active: Vec<String>, fixed: Option<HashMap<String, f64>>, h0: f64,
        host_mass_split: f64,
    ) -> PyResult<SnLikelihood> {
        let inner = build_posterior(
            py,
            [z_cmb, z_hel, m_b, x1, color, host_mass, host_mass_err, dataset, bias_corr],
            cov_obs,
            table,
            om_axis,
            ol_axis,
            bbox,
            active,
            fixed,
            h0,
            host_mass_split,
        )?;
        let scratch = inner.scratch();
        Ok(SnLikelihood { inner, scratch })
    }

    /// Log-posterior of one active vector.
    pub fn __call__<'py>(&mut self, py: Python<'py>, theta: &Bound<'py, PyAny>) -> PyResult<f64> {
        let theta = extract_f64_array(py, theta)?;
        Ok(self.inner.log_posterior(theta.as_array(), &mut self.scratch)?)
    }

    /// Log-posterior of each row of a `(walkers, n_active)` array.
    pub fn evaluate_batch<'py>(
        &self, py: Python<'py>, thetas: PyReadonlyArray2<'py, f64>,
    ) -> PyResult<Bound<'py, PyArray1<f64>>> {
        let view = thetas.as_array();
        let inner = &self.inner;
        let values = py.allow_threads(|| inner.log_posterior_batch(view))?;
        Ok(values.into_pyarray(py))
    }

    #[getter]
    pub fn active_names(&self) -> Vec<String> {
        self.inner.active().names().iter().map(|name| name.as_str().to_string()).collect()
    }

    #[getter]
    pub fn n_supernovae(&self) -> usize {
        self.inner.catalog().len()
    }
}

/// `_jla_likelihood` — module initializer for the Python extension.
#[cfg(feature = "python-bindings")]
#[pymodule]
fn _jla_likelihood<'py>(_py: Python<'py>, m: &Bound<'py, PyModule>) -> PyResult<()> {
    m.add_class::<SnLikelihood>()?;
    m.add("PRIOR_PENALTY", supernova::PRIOR_PENALTY)?;
    Ok(())
}
