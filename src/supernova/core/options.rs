//! Posterior options — constants and run configuration for the evaluator.
//!
//! Purpose
//! -------
//! Collect the non-sampled knobs of the likelihood (Hubble constant, host-mass
//! split, covariance composition) in one validated place, and provide a
//! TOML-backed [`PosteriorConfig`] that resolves a run description into the
//! typed pieces the evaluator needs.
//!
//! Key behaviors
//! -------------
//! - [`PosteriorOptions::new`] validates H0 and the host-mass split and
//!   precomputes `c / H0` in Mpc.
//! - [`PosteriorConfig::from_toml_str`] / [`PosteriorConfig::from_path`]
//!   parse a run description; [`PosteriorConfig::resolve`] turns it into
//!   `(ActiveParams, SnParams, PosteriorOptions)`, rejecting unknown names
//!   and names that are both active and fixed.
//!
//! Invariants & assumptions
//! ------------------------
//! - `c_over_h0` is finite and strictly positive.
//! - Fixed parameters absent from the config keep their best-fit defaults.
//! - When no covariance override is given, the set follows
//!   [`CovarianceSet::for_active`].
//!
//! Conventions
//! -----------
//! - H0 is in km/s/Mpc; the speed of light is [`SPEED_OF_LIGHT_KM_S`].
//!
//! Testing notes
//! -------------
//! - Unit tests cover option validation, default resolution, and the
//!   rejection paths of the TOML config.
use crate::supernova::{
    core::{
        covariance::CovarianceSet,
        params::{ActiveParams, ParamName, SnParams},
    },
    errors::{SnError, SnResult},
};
use serde::Deserialize;
use std::{collections::BTreeMap, path::Path};

/// Speed of light in km/s, as used by the JLA release.
pub const SPEED_OF_LIGHT_KM_S: f64 = 2.99792e5;

/// Default Hubble constant (km/s/Mpc).
pub const DEFAULT_H0: f64 = 70.0;

/// Default host log-stellar-mass split for the `delM` step.
pub const DEFAULT_HOST_MASS_SPLIT: f64 = 10.0;

/// PosteriorOptions — fixed constants of one posterior.
///
/// Fields
/// ------
/// - `c_over_h0`: `c / H0` in Mpc, multiplies the c/H0-free tabulated
///   luminosity distance.
/// - `host_mass_split`: hosts with log-mass strictly above this value get
///   `M0 + delM`.
/// - `covariance`: which observational terms the loader sums.
#[derive(Debug, Clone, PartialEq)]
pub struct PosteriorOptions {
    pub c_over_h0: f64,
    pub host_mass_split: f64,
    pub covariance: CovarianceSet,
}

impl PosteriorOptions {
    /// Errors
    /// ------
    /// - `SnError::InvalidHubbleConstant` when `h0` is not finite and > 0.
    /// - `SnError::InvalidHostMassSplit` when the split is not finite.
    pub fn new(h0: f64, host_mass_split: f64, covariance: CovarianceSet) -> SnResult<Self> {
        if !h0.is_finite() || h0 <= 0.0 {
            return Err(SnError::InvalidHubbleConstant { value: h0 });
        }
        if !host_mass_split.is_finite() {
            return Err(SnError::InvalidHostMassSplit { value: host_mass_split });
        }
        Ok(PosteriorOptions { c_over_h0: SPEED_OF_LIGHT_KM_S / h0, host_mass_split, covariance })
    }
}

impl Default for PosteriorOptions {
    fn default() -> Self {
        PosteriorOptions {
            c_over_h0: SPEED_OF_LIGHT_KM_S / DEFAULT_H0,
            host_mass_split: DEFAULT_HOST_MASS_SPLIT,
            covariance: CovarianceSet::Standard,
        }
    }
}

fn default_h0() -> f64 {
    DEFAULT_H0
}

fn default_split() -> f64 {
    DEFAULT_HOST_MASS_SPLIT
}

/// PosteriorConfig — TOML run description.
///
/// ```toml
/// h0 = 70.0
/// host_mass_split = 10.0
/// active = ["M0", "alfa", "beta", "Om0", "OL0"]
/// covariance = "standard"          # optional
///
/// [fixed]
/// sM0 = 0.1
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PosteriorConfig {
    #[serde(default = "default_h0")]
    pub h0: f64,
    #[serde(default = "default_split")]
    pub host_mass_split: f64,
    pub active: Vec<String>,
    #[serde(default)]
    pub fixed: BTreeMap<String, f64>,
    #[serde(default)]
    pub covariance: Option<CovarianceSet>,
}

impl PosteriorConfig {
    pub fn from_toml_str(text: &str) -> SnResult<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> SnResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|err| SnError::Io {
            path: path.display().to_string(),
            message: err.to_string(),
        })?;
        Self::from_toml_str(&text)
    }

    /// Resolve names and values into typed evaluator inputs.
    ///
    /// Errors
    /// ------
    /// - `SnError::Param` for unknown or duplicate active names, or unknown
    ///   fixed names.
    /// - `SnError::InvalidConfig` when a name is both active and fixed, or a
    ///   fixed value is not finite.
    /// - Option validation errors from [`PosteriorOptions::new`].
    pub fn resolve(&self) -> SnResult<(ActiveParams, SnParams, PosteriorOptions)> {
        let active = ActiveParams::from_names(self.active.as_slice())?;
        let mut fixed = SnParams::default();
        for (name, &value) in &self.fixed {
            let name: ParamName = name.parse()?;
            if active.is_active(name) {
                return Err(SnError::InvalidConfig {
                    message: format!("parameter '{name}' is both active and fixed"),
                });
            }
            if !value.is_finite() {
                return Err(SnError::InvalidConfig {
                    message: format!("fixed value for '{name}' must be finite; got {value}"),
                });
            }
            fixed.set(name, value);
        }
        let covariance =
            self.covariance.clone().unwrap_or_else(|| CovarianceSet::for_active(&active));
        let options = PosteriorOptions::new(self.h0, self.host_mass_split, covariance)?;
        log::debug!(
            "resolved config: {} active, covariance {:?}, c/H0 = {}",
            active.len(),
            options.covariance,
            options.c_over_h0
        );
        Ok((active, fixed, options))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::supernova::{core::covariance::CovarianceTerm, errors::ParamError};

    #[test]
    // Purpose
    // -------
    // `new` precomputes c/H0 and rejects non-physical inputs.
    fn options_validate_inputs() {
        let opts = PosteriorOptions::new(70.0, 10.0, CovarianceSet::Standard).unwrap();
        assert_eq!(opts, PosteriorOptions::default());
        assert!((opts.c_over_h0 - 4282.742857142857).abs() < 1e-9);

        for h0 in [0.0, -70.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                PosteriorOptions::new(h0, 10.0, CovarianceSet::Standard),
                Err(SnError::InvalidHubbleConstant { .. })
            ));
        }
        assert!(matches!(
            PosteriorOptions::new(70.0, f64::NAN, CovarianceSet::Standard),
            Err(SnError::InvalidHostMassSplit { .. })
        ));
    }

    #[test]
    // Purpose
    // -------
    // A minimal config resolves to defaults and picks the host covariance
    // when `delM` is sampled.
    //
    // Given
    // -----
    // - Only `active` specified, including `delM`.
    //
    // Expect
    // ------
    // - H0 = 70, split = 10, fixed = best-fit point, covariance = WithHost.
    fn minimal_config_resolves_defaults() {
        let cfg = PosteriorConfig::from_toml_str(r#"active = ["M0", "delM", "Om0"]"#).unwrap();
        let (active, fixed, options) = cfg.resolve().unwrap();
        assert_eq!(active.names(), &[ParamName::M0, ParamName::DelM, ParamName::Om0]);
        assert_eq!(fixed, SnParams::default());
        assert_eq!(options.covariance, CovarianceSet::WithHost);
        assert_eq!(options.host_mass_split, 10.0);
    }

    #[test]
    // Purpose
    // -------
    // Fixed values and covariance overrides are honored.
    fn fixed_values_and_custom_covariance_are_applied() {
        let text = r#"
            h0 = 68.0
            active = ["alfa", "beta"]
            covariance = { custom = ["stat", "cal"] }

            [fixed]
            sM0 = 0.2
            Om0 = 0.3
        "#;
        let (_, fixed, options) = PosteriorConfig::from_toml_str(text).unwrap().resolve().unwrap();
        assert_eq!(fixed.s_m0, 0.2);
        assert_eq!(fixed.om0, 0.3);
        assert_eq!(fixed.m0, SnParams::default().m0);
        assert_eq!(
            options.covariance,
            CovarianceSet::Custom(vec![CovarianceTerm::Stat, CovarianceTerm::Cal])
        );
        assert!((options.c_over_h0 - SPEED_OF_LIGHT_KM_S / 68.0).abs() < 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // Unknown names, overlapping active/fixed names, non-finite fixed values
    // (also when the config is built in code, as the Python constructor
    // does) and malformed TOML are configuration errors.
    fn bad_configs_are_rejected() {
        let unknown = PosteriorConfig::from_toml_str(r#"active = ["Omega"]"#).unwrap();
        assert_eq!(
            unknown.resolve().unwrap_err(),
            SnError::Param(ParamError::UnknownParameter { name: "Omega".into() })
        );

        let overlap = PosteriorConfig::from_toml_str(
            "active = [\"M0\"]\n[fixed]\nM0 = -19.0\n",
        )
        .unwrap();
        assert!(matches!(overlap.resolve(), Err(SnError::InvalidConfig { .. })));

        let nan_fixed = PosteriorConfig {
            h0: DEFAULT_H0,
            host_mass_split: DEFAULT_HOST_MASS_SPLIT,
            active: vec!["M0".into()],
            fixed: BTreeMap::from([("sM0".to_string(), f64::NAN)]),
            covariance: None,
        };
        assert!(matches!(nan_fixed.resolve(), Err(SnError::InvalidConfig { .. })));

        assert!(matches!(
            PosteriorConfig::from_toml_str("active = 3"),
            Err(SnError::InvalidConfig { .. })
        ));
        assert!(matches!(
            PosteriorConfig::from_toml_str("active = []\nbogus = 1"),
            Err(SnError::InvalidConfig { .. })
        ));
    }
}
