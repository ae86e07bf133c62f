//! Errors for the supernova likelihood stack (catalog validation, grid and
//! covariance shape checks, parameter naming, and file loading).
//!
//! This module defines a configuration/data error type, [`SnError`], and a
//! parameter error type, [`ParamError`], used across the Python-facing API and
//! the internal Rust core. Both convert to `PyErr` when the `python-bindings`
//! feature is enabled.
//!
//! ## Conventions
//! - **Indices are 0-based** (match Rust/NumPy).
//! - Every variant here is a *setup-time* failure. Proposals outside the
//!   prior support and non-positive-definite covariances are ordinary
//!   evaluation outcomes (see `models::posterior::Evaluation`), never errors.
//! - Shape mismatches name the quantity that disagreed so a caller can tell a
//!   ragged catalog from a mis-sized interpolation table.
#[cfg(feature = "python-bindings")]
use pyo3::{PyErr, exceptions::PyValueError};

/// Crate-wide result alias for supernova operations that may produce [`SnError`].
pub type SnResult<T> = Result<T, SnError>;

/// Result alias for parameter naming / layout paths that may produce
/// [`ParamError`].
pub type ParamResult<T> = Result<T, ParamError>;

/// Unified configuration error for the likelihood engine.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SnError {
    // ---- Catalog validation ----
    /// Catalog has no rows.
    #[error("Supernova catalog is empty.")]
    EmptyCatalog,

    /// A catalog column disagrees in length with the redshift column.
    #[error("Catalog column '{column}' has length {actual}, expected {expected}.")]
    ColumnLengthMismatch { column: &'static str, expected: usize, actual: usize },

    /// A catalog value is NaN/±inf.
    #[error("Catalog column '{column}' has a non-finite value at index {index}: {value}")]
    NonFiniteData { column: &'static str, index: usize, value: f64 },

    /// Redshifts must satisfy z > -1 so that 1 + z is a valid scale factor ratio.
    #[error("Redshift in column '{column}' at index {index} must be > -1; got {value}")]
    InvalidRedshift { column: &'static str, index: usize, value: f64 },

    // ---- Interpolation grid ----
    /// Axis, grid, redshift, or covariance dimensions disagree.
    #[error("Dimension mismatch for {what}: expected {expected}, got {actual}.")]
    DimensionMismatch { what: &'static str, expected: usize, actual: usize },

    /// Grid axes must be strictly increasing.
    #[error("Axis '{axis}' must be strictly increasing; violated at index {index}.")]
    AxisNotIncreasing { axis: &'static str, index: usize },

    /// A cubic interpolant needs at least four nodes per axis.
    #[error("Axis '{axis}' has {len} nodes; at least {min} are required.")]
    AxisTooShort { axis: &'static str, len: usize, min: usize },

    /// Bounding box must be finite with lower < upper on both axes.
    #[error("Bounding box must be finite with lower < upper; got [{lower}, {upper}] on '{axis}'.")]
    InvalidBoundingBox { axis: &'static str, lower: f64, upper: f64 },

    /// Grid nodes must lie inside the bounding box.
    #[error("Axis '{axis}' spans [{first}, {last}], outside the bounding box [{lower}, {upper}].")]
    AxisOutsideBoundingBox { axis: &'static str, first: f64, last: f64, lower: f64, upper: f64 },

    /// The spline collocation system could not be factorised.
    #[error("Spline collocation system for axis '{axis}' is singular.")]
    SingularCollocation { axis: &'static str },

    // ---- Observational covariance ----
    /// Covariance must be square.
    #[error("Covariance '{name}' must be square; got {rows}x{cols}.")]
    CovarianceNotSquare { name: String, rows: usize, cols: usize },

    /// Covariance entries must be finite.
    #[error("Covariance '{name}' has a non-finite entry at ({row}, {col}): {value}")]
    NonFiniteCovariance { name: String, row: usize, col: usize, value: f64 },

    /// Covariance must be symmetric up to round-off.
    #[error("Covariance '{name}' is not symmetric at ({row}, {col}).")]
    CovarianceNotSymmetric { name: String, row: usize, col: usize },

    /// A term required by the covariance set was not supplied.
    #[error("Covariance term '{term}' is required by the configured set but was not supplied.")]
    MissingCovarianceTerm { term: &'static str },

    // ---- Options ----
    /// H0 must be finite and > 0.
    #[error("Hubble constant must be finite and > 0; got: {value}")]
    InvalidHubbleConstant { value: f64 },

    /// Host-mass split must be finite.
    #[error("Host-mass split must be finite; got: {value}")]
    InvalidHostMassSplit { value: f64 },

    /// Configuration file could not be parsed.
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    // ---- File loading ----
    /// Underlying I/O failure.
    #[error("I/O error on '{path}': {message}")]
    Io { path: String, message: String },

    /// Catalog row could not be parsed.
    #[error("Catalog parse error at line {line}: {message}")]
    ParseCatalog { line: usize, message: String },

    /// Matrix file could not be parsed.
    #[error("Matrix parse error in '{path}': {message}")]
    ParseMatrix { path: String, message: String },

    // ---- Parameters ----
    /// Wrapper for [`ParamError`].
    #[error(transparent)]
    Param(#[from] ParamError),
}

/// Errors specific to parameter naming and active-vector layout.
///
/// Unknown names are a programming error in the caller's configuration and
/// must surface when the layout is built, not silently at evaluation time.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParamError {
    /// Name is not one of the 13 model parameters.
    #[error(
        "Unknown parameter '{name}'; expected one of M0, sM0, delM, alfa, beta, x10, eta_x1, sx1, c0, eta_c, sc, Om0, OL0."
    )]
    UnknownParameter { name: String },

    /// A parameter was listed twice in the active set.
    #[error("Parameter '{name}' appears more than once in the active set.")]
    DuplicateParameter { name: &'static str },

    /// Active vector length disagrees with the active set.
    #[error("Active parameter vector length mismatch: expected {expected}, got {actual}")]
    ThetaLengthMismatch { expected: usize, actual: usize },
}

/// Convert an [`SnError`] into a Python `ValueError` with the error message.
///
/// This is used at the Rust↔Python boundary to surface setup errors cleanly.
#[cfg(feature = "python-bindings")]
impl From<SnError> for PyErr {
    fn from(err: SnError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}

/// Convert a [`ParamError`] into a Python `ValueError` with the error message.
#[cfg(feature = "python-bindings")]
impl From<ParamError> for PyErr {
    fn from(err: ParamError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}

impl From<toml::de::Error> for SnError {
    fn from(err: toml::de::Error) -> SnError {
        SnError::InvalidConfig { message: err.to_string() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    // Purpose
    // -------
    // `ParamError` lifts into `SnError` without losing the variant.
    fn param_error_converts_into_sn_error() {
        let err: SnError = ParamError::UnknownParameter { name: "Omega".into() }.into();
        assert_eq!(err, SnError::Param(ParamError::UnknownParameter { name: "Omega".into() }));
        assert!(err.to_string().contains("Omega"));
    }

    #[test]
    // Purpose
    // -------
    // Dimension mismatches name the offending quantity in their message.
    fn dimension_mismatch_message_names_quantity() {
        let err = SnError::DimensionMismatch { what: "redshift sequence", expected: 3, actual: 2 };
        assert_eq!(
            err.to_string(),
            "Dimension mismatch for redshift sequence: expected 3, got 2."
        );
    }
}
