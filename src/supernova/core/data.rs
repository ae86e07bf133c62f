//! Supernova catalog container.
//!
//! Purpose
//! -------
//! Provide a small, validated container for the light-curve catalog used by
//! the likelihood. This module centralizes input validation for raw catalog
//! columns so downstream code can assume aligned, finite arrays.
//!
//! Key behaviors
//! -------------
//! - [`SnCatalog`] enforces basic data invariants (non-empty, equal column
//!   lengths, finite values, redshifts above -1).
//! - [`SnCatalog::observations`] interleaves `(m_B, x1, c)` per supernova
//!   into the length-`3N` observation vector that indexes the covariance.
//! - [`time_dilation`] is the `(1 + z_hel) / (1 + z_cmb)` factor used to
//!   rescale tabulated distances; [`SnCatalog::time_dilation`] applies it
//!   to one row.
//!
//! Invariants & assumptions
//! ------------------------
//! - Row order is significant: row `i` owns covariance rows `3i..3i + 3`
//!   and interpolant `i`.
//! - The catalog is immutable after construction.
//!
//! Conventions
//! -----------
//! - `dataset` and `bias_corr` are carried for completeness; the likelihood
//!   does not use them yet.
use crate::supernova::errors::{SnError, SnResult};
use ndarray::Array1;

/// `SnCatalog` — validated per-supernova columns.
///
/// Fields
/// ------
/// - `z_cmb`: CMB-frame redshift.
/// - `z_hel`: heliocentric redshift.
/// - `m_b`: observed peak apparent magnitude.
/// - `x1`: observed SALT2 stretch.
/// - `color`: observed SALT2 color.
/// - `host_mass`: log10 host stellar mass (M_sun).
/// - `host_mass_err`: uncertainty of `host_mass`.
/// - `dataset`: survey code.
/// - `bias_corr`: bias-correction scalar.
///
/// Invariants
/// ----------
/// - All columns have length `N > 0`.
/// - Every entry is finite; `z_cmb, z_hel > -1`.
#[derive(Debug, Clone, PartialEq)]
pub struct SnCatalog {
    pub z_cmb: Array1<f64>,
    pub z_hel: Array1<f64>,
    pub m_b: Array1<f64>,
    pub x1: Array1<f64>,
    pub color: Array1<f64>,
    pub host_mass: Array1<f64>,
    pub host_mass_err: Array1<f64>,
    pub dataset: Array1<f64>,
    pub bias_corr: Array1<f64>,
}

/// `(1 + z_hel) / (1 + z_cmb)`.
#[inline]
pub fn time_dilation(z_cmb: f64, z_hel: f64) -> f64 {
    (1.0 + z_hel) / (1.0 + z_cmb)
}

impl SnCatalog {
    /// Construct a validated catalog from raw columns.
    ///
    /// Errors
    /// ------
    /// - `SnError::EmptyCatalog` when `z_cmb` is empty.
    /// - `SnError::ColumnLengthMismatch` when any column differs in length
    ///   from `z_cmb`.
    /// - `SnError::NonFiniteData` for the first NaN/±∞ entry.
    /// - `SnError::InvalidRedshift` when a redshift is ≤ -1.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        z_cmb: Array1<f64>, z_hel: Array1<f64>, m_b: Array1<f64>, x1: Array1<f64>,
        color: Array1<f64>, host_mass: Array1<f64>, host_mass_err: Array1<f64>,
        dataset: Array1<f64>, bias_corr: Array1<f64>,
    ) -> SnResult<Self> {
        let catalog =
            SnCatalog { z_cmb, z_hel, m_b, x1, color, host_mass, host_mass_err, dataset, bias_corr };
        catalog.validate()?;
        Ok(catalog)
    }

    /// Number of supernovae `N`.
    pub fn len(&self) -> usize {
        self.z_cmb.len()
    }

    pub fn is_empty(&self) -> bool {
        self.z_cmb.is_empty()
    }

    /// Interleaved observation vector `[m_B_0, x1_0, c_0, m_B_1, …]` of
    /// length `3N`.
    pub fn observations(&self) -> Array1<f64> {
        let mut obs = Array1::zeros(3 * self.len());
        for i in 0..self.len() {
            obs[3 * i] = self.m_b[i];
            obs[3 * i + 1] = self.x1[i];
            obs[3 * i + 2] = self.color[i];
        }
        obs
    }

    /// Time-dilation factor `(1 + z_hel) / (1 + z_cmb)` for row `i`
    /// (Davis et al. 2011).
    pub fn time_dilation(&self, i: usize) -> f64 {
        time_dilation(self.z_cmb[i], self.z_hel[i])
    }

    fn columns(&self) -> [(&'static str, &Array1<f64>); 9] {
        [
            ("z_cmb", &self.z_cmb),
            ("z_hel", &self.z_hel),
            ("m_b", &self.m_b),
            ("x1", &self.x1),
            ("color", &self.color),
            ("host_mass", &self.host_mass),
            ("host_mass_err", &self.host_mass_err),
            ("dataset", &self.dataset),
            ("bias_corr", &self.bias_corr),
        ]
    }

    fn validate(&self) -> SnResult<()> {
        let n = self.z_cmb.len();
        if n == 0 {
            return Err(SnError::EmptyCatalog);
        }
        for (column, values) in self.columns() {
            if values.len() != n {
                return Err(SnError::ColumnLengthMismatch {
                    column,
                    expected: n,
                    actual: values.len(),
                });
            }
            if let Some((index, &value)) = values.iter().enumerate().find(|(_, v)| !v.is_finite())
            {
                return Err(SnError::NonFiniteData { column, index, value });
            }
        }
        for (column, values) in [("z_cmb", &self.z_cmb), ("z_hel", &self.z_hel)] {
            if let Some((index, &value)) = values.iter().enumerate().find(|(_, z)| **z <= -1.0) {
                return Err(SnError::InvalidRedshift { column, index, value });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    // Purpose
    // -------
    // Two-row catalog with distinct values in every column.
    fn make_catalog() -> SnResult<SnCatalog> {
        SnCatalog::new(
            array![0.1, 0.5],
            array![0.11, 0.49],
            array![19.0, 22.5],
            array![0.3, -0.7],
            array![-0.02, 0.05],
            array![9.5, 10.8],
            array![0.1, 0.2],
            array![1.0, 3.0],
            array![0.0, 0.01],
        )
    }

    #[test]
    // Purpose
    // -------
    // A well-formed catalog is accepted and interleaves its observations as
    // (m_B, x1, c) triples.
    fn catalog_interleaves_observations() {
        let catalog = make_catalog().unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.observations(), array![19.0, 0.3, -0.02, 22.5, -0.7, 0.05]);
        assert!((catalog.time_dilation(0) - 1.11 / 1.1).abs() < 1e-15);
    }

    #[test]
    // Purpose
    // -------
    // Empty and ragged catalogs are rejected.
    fn empty_and_ragged_catalogs_are_rejected() {
        let e = array![];
        let err = SnCatalog::new(
            e.clone(),
            e.clone(),
            e.clone(),
            e.clone(),
            e.clone(),
            e.clone(),
            e.clone(),
            e.clone(),
            e,
        )
        .unwrap_err();
        assert_eq!(err, SnError::EmptyCatalog);

        let mut catalog = make_catalog().unwrap();
        catalog.color = array![0.0];
        assert_eq!(
            catalog.validate().unwrap_err(),
            SnError::ColumnLengthMismatch { column: "color", expected: 2, actual: 1 }
        );
    }

    #[test]
    // Purpose
    // -------
    // Non-finite values and redshifts at or below -1 are reported with the
    // column name and first offending index.
    fn non_finite_and_invalid_redshift_are_reported() {
        let mut catalog = make_catalog().unwrap();
        catalog.host_mass[1] = f64::NAN;
        match catalog.validate().unwrap_err() {
            SnError::NonFiniteData { column, index, .. } => {
                assert_eq!((column, index), ("host_mass", 1));
            }
            other => panic!("unexpected error: {other:?}"),
        }

        let mut catalog = make_catalog().unwrap();
        catalog.z_hel[0] = -1.0;
        assert_eq!(
            catalog.validate().unwrap_err(),
            SnError::InvalidRedshift { column: "z_hel", index: 0, value: -1.0 }
        );
    }
}
