//! Python → Rust conversion helpers for the PyO3 bridge.
//!
//! Everything here is compiled only with the `python-bindings` feature. The
//! helpers accept numpy arrays directly and fall back to `numpy.asarray(…,
//! dtype=float64)` for lists, pandas objects and other array-likes, so that
//! the likelihood class can be constructed from whatever the Python driver
//! has at hand.
#[cfg(feature = "python-bindings")]
use ndarray::{Array1, Array2, Array3};

#[cfg(feature = "python-bindings")]
use pyo3::{
    exceptions::{PyTypeError, PyValueError},
    prelude::*,
    types::{PyAny, PyDict, IntoPyDict},
};

#[cfg(feature = "python-bindings")]
use numpy::{
    IntoPyArray,    // Vec → PyArray
    PyArrayMethods, // .readonly()
    PyReadonlyArray1, PyReadonlyArray2, PyReadonlyArray3,
};

#[cfg(feature = "python-bindings")]
use std::collections::HashMap;

#[cfg(feature = "python-bindings")]
use crate::supernova::{
    core::{covariance::ObservationalCovariance, data::SnCatalog, options::PosteriorConfig},
    interp::{bivariate::BoundingBox, table::InterpolantSet},
    models::posterior::SnPosterior,
};

/// 1-D float64 view of `raw_data`, copying only when the input is not
/// already a contiguous float64 array.
#[cfg(feature = "python-bindings")]
#[inline]
pub fn extract_f64_array<'py>(
    py: Python<'py>, raw_data: &Bound<'py, PyAny>,
) -> PyResult<PyReadonlyArray1<'py, f64>> {
    if let Ok(arr_ro) = raw_data.extract::<PyReadonlyArray1<f64>>() {
        if arr_ro.as_slice().is_ok() {
            return Ok(arr_ro);
        }
    }

    if let Ok(obj) = raw_data.call_method("to_numpy", (false,), None) {
        if let Ok(series_ro) = obj.extract::<PyReadonlyArray1<f64>>() {
            if series_ro.as_slice().is_ok() {
                return Ok(series_ro);
            }
        }
    }

    let vec: Vec<f64> = raw_data.extract().map_err(|_| {
        PyTypeError::new_err("expected a 1-D numpy.ndarray, pandas.Series, or sequence of float64")
    })?;
    Ok(vec.into_pyarray(py).readonly())
}

#[cfg(feature = "python-bindings")]
fn as_float64<'py>(py: Python<'py>, raw: &Bound<'py, PyAny>) -> PyResult<Bound<'py, PyAny>> {
    let kwargs: Bound<'py, PyDict> = [("dtype", "float64")].into_py_dict(py)?;
    py.import("numpy")?.call_method("asarray", (raw,), Some(&kwargs))
}

/// Owned 1-D copy of `raw`, named in error messages.
#[cfg(feature = "python-bindings")]
pub fn extract_vector<'py>(
    py: Python<'py>, raw: &Bound<'py, PyAny>, name: &str,
) -> PyResult<Array1<f64>> {
    let arr = extract_f64_array(py, raw)
        .map_err(|_| PyTypeError::new_err(format!("{name} must be a 1-D float64 array-like")))?;
    Ok(arr.as_array().to_owned())
}

/// Owned 2-D copy of `raw`.
#[cfg(feature = "python-bindings")]
pub fn extract_matrix<'py>(
    py: Python<'py>, raw: &Bound<'py, PyAny>, name: &str,
) -> PyResult<Array2<f64>> {
    if let Ok(arr) = raw.extract::<PyReadonlyArray2<f64>>() {
        return Ok(arr.as_array().to_owned());
    }
    let converted = as_float64(py, raw)?;
    let arr = converted.extract::<PyReadonlyArray2<f64>>().map_err(|_| {
        PyValueError::new_err(format!("{name} must be a 2-D float64 array-like"))
    })?;
    Ok(arr.as_array().to_owned())
}

/// Owned 3-D copy of `raw`.
#[cfg(feature = "python-bindings")]
pub fn extract_cube<'py>(
    py: Python<'py>, raw: &Bound<'py, PyAny>, name: &str,
) -> PyResult<Array3<f64>> {
    if let Ok(arr) = raw.extract::<PyReadonlyArray3<f64>>() {
        return Ok(arr.as_array().to_owned());
    }
    let converted = as_float64(py, raw)?;
    let arr = converted.extract::<PyReadonlyArray3<f64>>().map_err(|_| {
        PyValueError::new_err(format!("{name} must be a 3-D float64 array-like"))
    })?;
    Ok(arr.as_array().to_owned())
}

/// Assemble an [`SnPosterior`] from Python-side inputs.
///
/// `fixed` overrides best-fit defaults for inactive parameters and goes
/// through [`PosteriorConfig::resolve`], so unknown, overlapping or
/// non-finite entries raise `ValueError`. The covariance set is not
/// consulted here because `cov_obs` is already summed by the caller.
#[cfg(feature = "python-bindings")]
#[allow(clippy::too_many_arguments)]
pub fn build_posterior<'py>(
    py: Python<'py>, columns: [&Bound<'py, PyAny>; 9], cov_obs: &Bound<'py, PyAny>,
    table: &Bound<'py, PyAny>, om_axis: &Bound<'py, PyAny>, ol_axis: &Bound<'py, PyAny>,
    bbox: Vec<f64>, active: Vec<String>, fixed: Option<HashMap<String, f64>>, h0: f64,
    host_mass_split: f64,
) -> PyResult<SnPosterior> {
    const NAMES: [&str; 9] = [
        "z_cmb",
        "z_hel",
        "m_b",
        "x1",
        "color",
        "host_mass",
        "host_mass_err",
        "dataset",
        "bias_corr",
    ];
    let mut arrays = Vec::with_capacity(9);
    for (raw, name) in columns.iter().zip(NAMES) {
        arrays.push(extract_vector(py, raw, name)?);
    }
    let arrays: [Array1<f64>; 9] =
        arrays.try_into().map_err(|_| PyValueError::new_err("expected nine catalog columns"))?;
    let [z_cmb, z_hel, m_b, x1, color, host_mass, host_mass_err, dataset, bias_corr] = arrays;
    let catalog =
        SnCatalog::new(z_cmb, z_hel, m_b, x1, color, host_mass, host_mass_err, dataset, bias_corr)?;

    let bbox = BoundingBox::from_slice(&bbox)?;
    let grid = extract_cube(py, table, "table")?;
    let om = extract_vector(py, om_axis, "om_axis")?;
    let ol = extract_vector(py, ol_axis, "ol_axis")?;
    let interpolants = InterpolantSet::build(
        grid.view(),
        om.view(),
        ol.view(),
        catalog.z_cmb.view(),
        catalog.z_hel.view(),
        &bbox,
    )?;

    let cov = extract_matrix(py, cov_obs, "cov_obs")?;
    let covariance = ObservationalCovariance::from_array("cov_obs", &cov)?;

    let config = PosteriorConfig {
        h0,
        host_mass_split,
        active,
        fixed: fixed.unwrap_or_default().into_iter().collect(),
        covariance: None,
    };
    Ok(SnPosterior::from_config(catalog, interpolants, covariance, &config)?)
}
