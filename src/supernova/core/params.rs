//! Model parameters — the 13 named scalars and the active/fixed split.
//!
//! Purpose
//! -------
//! Replace a stringly-typed "name → value" dictionary with an explicit
//! parameter struct ([`SnParams`]) and an explicit description of which
//! parameters the sampler supplies on each call ([`ActiveParams`]).
//!
//! Key behaviors
//! -------------
//! - [`ParamName`] enumerates the 13 parameters and parses their canonical
//!   names (`"M0"`, `"sM0"`, …, `"OL0"`). Unknown names fail with
//!   [`ParamError::UnknownParameter`].
//! - [`SnParams`] stores every parameter as a plain `f64` field; its
//!   `Default` is the best-fit point of Nielsen et al. (2016).
//! - [`ActiveParams`] keeps the sampler's ordering of active names plus a
//!   13-slot mask, and writes an active vector `θ` into an [`SnParams`]
//!   without allocation via [`ActiveParams::apply`].
//!
//! Invariants & assumptions
//! ------------------------
//! - Active and fixed names are disjoint and their union is exactly the
//!   13-name set; duplicates are rejected at construction.
//! - `θ[k]` corresponds to `ActiveParams::names()[k]`.
//!
//! Conventions
//! -----------
//! - Parameter names follow the published JLA likelihood code (`alfa` rather than
//!   `alpha`, `OL0` for the vacuum density).
//! - Indexing of [`ParamName::ALL`] is the canonical order used for masks.
use crate::supernova::errors::{ParamError, ParamResult};
use ndarray::ArrayView1;
use std::{fmt, str::FromStr};

/// Number of model parameters.
pub const N_PARAMS: usize = 13;

/// Name of one of the 13 model parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ParamName {
    /// Mean absolute magnitude of SNe Ia.
    M0,
    /// Gaussian rms of `M0`.
    SM0,
    /// Magnitude offset for hosts above the mass split.
    DelM,
    /// Stretch coefficient.
    Alfa,
    /// Color coefficient.
    Beta,
    /// Mean stretch at z = 0.
    X10,
    /// Linear redshift evolution of the mean stretch.
    EtaX1,
    /// Gaussian rms of stretch.
    Sx1,
    /// Mean color at z = 0.
    C0,
    /// Linear redshift evolution of the mean color.
    EtaC,
    /// Gaussian rms of color.
    Sc,
    /// Matter density.
    Om0,
    /// Vacuum energy density.
    OL0,
}

impl ParamName {
    /// All parameters in canonical order.
    pub const ALL: [ParamName; N_PARAMS] = [
        ParamName::M0,
        ParamName::SM0,
        ParamName::DelM,
        ParamName::Alfa,
        ParamName::Beta,
        ParamName::X10,
        ParamName::EtaX1,
        ParamName::Sx1,
        ParamName::C0,
        ParamName::EtaC,
        ParamName::Sc,
        ParamName::Om0,
        ParamName::OL0,
    ];

    /// Canonical string name.
    pub fn as_str(self) -> &'static str {
        match self {
            ParamName::M0 => "M0",
            ParamName::SM0 => "sM0",
            ParamName::DelM => "delM",
            ParamName::Alfa => "alfa",
            ParamName::Beta => "beta",
            ParamName::X10 => "x10",
            ParamName::EtaX1 => "eta_x1",
            ParamName::Sx1 => "sx1",
            ParamName::C0 => "c0",
            ParamName::EtaC => "eta_c",
            ParamName::Sc => "sc",
            ParamName::Om0 => "Om0",
            ParamName::OL0 => "OL0",
        }
    }

    /// Position in [`ParamName::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for ParamName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ParamName {
    type Err = ParamError;

    /// Parse a canonical parameter name. Matching is exact (case-sensitive)
    /// because `M0` and `sM0` differ only by a prefix and `OL0` vs `Om0` by
    /// case-significant letters.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ParamName::ALL
            .iter()
            .copied()
            .find(|name| name.as_str() == s)
            .ok_or_else(|| ParamError::UnknownParameter { name: s.to_string() })
    }
}

/// SnParams — full 13-parameter point in model space.
///
/// Fields
/// ------
/// One `f64` per [`ParamName`]; see the variant docs for meanings.
///
/// Notes
/// -----
/// - No validation happens here. Support checks live in the prior
///   evaluator so that out-of-support proposals can be rejected cheaply
///   rather than raising errors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnParams {
    pub m0: f64,
    pub s_m0: f64,
    pub del_m: f64,
    pub alfa: f64,
    pub beta: f64,
    pub x10: f64,
    pub eta_x1: f64,
    pub sx1: f64,
    pub c0: f64,
    pub eta_c: f64,
    pub sc: f64,
    pub om0: f64,
    pub ol0: f64,
}

impl Default for SnParams {
    /// Best-fit values of Nielsen et al. (2016) with no host-mass step.
    fn default() -> Self {
        SnParams {
            m0: -19.052,
            s_m0: 0.108,
            del_m: 0.0,
            alfa: 0.134,
            beta: 3.059,
            x10: 0.038,
            eta_x1: 0.0,
            sx1: 0.932,
            c0: -0.016,
            eta_c: 0.0,
            sc: 0.071,
            om0: 0.341,
            ol0: 0.569,
        }
    }
}

impl SnParams {
    /// Read a parameter by name.
    pub fn get(&self, name: ParamName) -> f64 {
        match name {
            ParamName::M0 => self.m0,
            ParamName::SM0 => self.s_m0,
            ParamName::DelM => self.del_m,
            ParamName::Alfa => self.alfa,
            ParamName::Beta => self.beta,
            ParamName::X10 => self.x10,
            ParamName::EtaX1 => self.eta_x1,
            ParamName::Sx1 => self.sx1,
            ParamName::C0 => self.c0,
            ParamName::EtaC => self.eta_c,
            ParamName::Sc => self.sc,
            ParamName::Om0 => self.om0,
            ParamName::OL0 => self.ol0,
        }
    }

    /// Overwrite a parameter by name.
    pub fn set(&mut self, name: ParamName, value: f64) {
        let slot = match name {
            ParamName::M0 => &mut self.m0,
            ParamName::SM0 => &mut self.s_m0,
            ParamName::DelM => &mut self.del_m,
            ParamName::Alfa => &mut self.alfa,
            ParamName::Beta => &mut self.beta,
            ParamName::X10 => &mut self.x10,
            ParamName::EtaX1 => &mut self.eta_x1,
            ParamName::Sx1 => &mut self.sx1,
            ParamName::C0 => &mut self.c0,
            ParamName::EtaC => &mut self.eta_c,
            ParamName::Sc => &mut self.sc,
            ParamName::Om0 => &mut self.om0,
            ParamName::OL0 => &mut self.ol0,
        };
        *slot = value;
    }
}

/// ActiveParams — ordered set of sampled parameters.
///
/// Purpose
/// -------
/// Describe which of the 13 parameters the external sampler supplies on
/// each evaluation, and in which order they appear in `θ`. All other
/// parameters are held at the fixed values stored alongside the evaluator.
///
/// Fields
/// ------
/// - `names`: `Vec<ParamName>`
///   Active names in sampler order.
/// - `mask`: `[bool; N_PARAMS]`
///   `mask[name.index()]` is `true` iff `name` is active.
///
/// Invariants
/// ----------
/// - No name appears twice in `names`.
/// - `mask` agrees with `names`; the fixed set is exactly the complement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveParams {
    names: Vec<ParamName>,
    mask: [bool; N_PARAMS],
}

impl ActiveParams {
    /// Build an active set from typed names.
    ///
    /// Errors
    /// ------
    /// - `ParamError::DuplicateParameter` if a name is repeated.
    pub fn new(names: Vec<ParamName>) -> ParamResult<Self> {
        let mut mask = [false; N_PARAMS];
        for name in &names {
            if mask[name.index()] {
                return Err(ParamError::DuplicateParameter { name: name.as_str() });
            }
            mask[name.index()] = true;
        }
        Ok(ActiveParams { names, mask })
    }

    /// Build an active set from canonical string names.
    ///
    /// Errors
    /// ------
    /// - `ParamError::UnknownParameter` for a name outside the 13-name set.
    /// - `ParamError::DuplicateParameter` if a name is repeated.
    pub fn from_names<S: AsRef<str>>(names: &[S]) -> ParamResult<Self> {
        let parsed =
            names.iter().map(|s| s.as_ref().parse::<ParamName>()).collect::<ParamResult<Vec<_>>>()?;
        ActiveParams::new(parsed)
    }

    /// Active names in sampler order.
    pub fn names(&self) -> &[ParamName] {
        &self.names
    }

    /// Number of active parameters (the sampler's dimension).
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn is_active(&self, name: ParamName) -> bool {
        self.mask[name.index()]
    }

    /// Fixed names (complement of the active set) in canonical order.
    pub fn fixed(&self) -> Vec<ParamName> {
        ParamName::ALL.iter().copied().filter(|name| !self.is_active(*name)).collect()
    }

    /// Write the active vector `θ` into `params`, leaving fixed parameters
    /// untouched.
    ///
    /// Errors
    /// ------
    /// - `ParamError::ThetaLengthMismatch` if `theta.len() != self.len()`.
    pub fn apply(&self, params: &mut SnParams, theta: ArrayView1<f64>) -> ParamResult<()> {
        if theta.len() != self.names.len() {
            return Err(ParamError::ThetaLengthMismatch {
                expected: self.names.len(),
                actual: theta.len(),
            });
        }
        for (name, &value) in self.names.iter().zip(theta.iter()) {
            params.set(*name, value);
        }
        Ok(())
    }

    /// Extract the active coordinates of `params` in sampler order.
    pub fn extract(&self, params: &SnParams) -> Vec<f64> {
        self.names.iter().map(|name| params.get(*name)).collect()
    }
}
