//! Flat priors with hard edges for the 13 model parameters.
//!
//! Purpose
//! -------
//! Map each parameter value to a log-prior contribution: `0.0` inside the
//! parameter's support and [`PRIOR_PENALTY`] outside. Out-of-support values
//! are *not* errors; the posterior evaluator sums the contributions and
//! short-circuits once the total falls to [`REJECTION_THRESHOLD`].
//!
//! Key behaviors
//! -------------
//! - [`PriorInterval`] encodes each support with explicit open/closed
//!   lower edges; every upper edge is closed.
//! - [`prior_interval`] returns the interval for a [`ParamName`]; `delM`
//!   has an unbounded support.
//! - [`log_prior`] evaluates one parameter; [`log_prior_sum`] accumulates
//!   over the active set in O(active count).
//!
//! Invariants & assumptions
//! ------------------------
//! - NaN and ±∞ are outside every support, including `delM`'s.
//! - The penalty is finite so that several violations still sum to a
//!   finite value below the threshold.
use crate::supernova::core::params::{ActiveParams, ParamName, SnParams};

/// Log-prior contribution of an out-of-support value, and the log-posterior
/// sentinel returned for any rejected proposal.
pub const PRIOR_PENALTY: f64 = -1.0e9;

/// Accumulated log-prior at or below which a proposal is rejected.
pub const REJECTION_THRESHOLD: f64 = -1.0e8;

/// Lower edge of a support interval.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LowerEdge {
    /// `value >= bound`.
    Closed(f64),
    /// `value > bound`.
    Open(f64),
}

/// Support of a flat prior: `lower` edge and a closed `upper` edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PriorInterval {
    Bounded { lower: LowerEdge, upper: f64 },
    Unbounded,
}

impl PriorInterval {
    /// Whether `value` lies inside the support.
    #[inline]
    pub fn contains(&self, value: f64) -> bool {
        match *self {
            PriorInterval::Unbounded => value.is_finite(),
            PriorInterval::Bounded { lower, upper } => {
                let above = match lower {
                    LowerEdge::Closed(b) => value >= b,
                    LowerEdge::Open(b) => value > b,
                };
                above && value <= upper
            }
        }
    }
}

/// Support of each parameter.
///
/// | name   | support        |
/// |--------|----------------|
/// | M0     | [-21, -17]     |
/// | sM0    | (0, 1]         |
/// | delM   | unbounded      |
/// | alfa   | (0, 1]         |
/// | beta   | (0, 5]         |
/// | x10    | (-5, 5]        |
/// | eta_x1 | [-5, 5]        |
/// | sx1    | (0, 2]         |
/// | c0     | (-1, 1]        |
/// | eta_c  | [-1, 1]        |
/// | sc     | (0, 1]         |
/// | Om0    | [0, 1.2]       |
/// | OL0    | [0, 1.2]       |
pub fn prior_interval(name: ParamName) -> PriorInterval {
    use LowerEdge::{Closed, Open};
    let (lower, upper) = match name {
        ParamName::M0 => (Closed(-21.0), -17.0),
        ParamName::SM0 => (Open(0.0), 1.0),
        ParamName::DelM => return PriorInterval::Unbounded,
        ParamName::Alfa => (Open(0.0), 1.0),
        ParamName::Beta => (Open(0.0), 5.0),
        ParamName::X10 => (Open(-5.0), 5.0),
        ParamName::EtaX1 => (Closed(-5.0), 5.0),
        ParamName::Sx1 => (Open(0.0), 2.0),
        ParamName::C0 => (Open(-1.0), 1.0),
        ParamName::EtaC => (Closed(-1.0), 1.0),
        ParamName::Sc => (Open(0.0), 1.0),
        ParamName::Om0 => (Closed(0.0), 1.2),
        ParamName::OL0 => (Closed(0.0), 1.2),
    };
    PriorInterval::Bounded { lower, upper }
}

/// Log-prior contribution of one parameter value.
#[inline]
pub fn log_prior(name: ParamName, value: f64) -> f64 {
    if prior_interval(name).contains(value) { 0.0 } else { PRIOR_PENALTY }
}

/// Sum of log-prior contributions over the active parameters of `params`.
pub fn log_prior_sum(active: &ActiveParams, params: &SnParams) -> f64 {
    active.names().iter().map(|&name| log_prior(name, params.get(name))).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Interior points of every support.
    // - Exact edge behavior (open vs closed).
    // - Non-finite inputs.
    // - Accumulation over an active set.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Interior values contribute exactly zero.
    //
    // Given
    // -----
    // - The best-fit point (every coordinate strictly inside its support).
    //
    // Expect
    // ------
    // - `log_prior == 0.0` for all 13 names.
    fn interior_values_have_zero_log_prior() {
        let params = SnParams::default();
        for name in ParamName::ALL {
            assert_eq!(log_prior(name, params.get(name)), 0.0, "{name}");
        }
    }

    #[test]
    // Purpose
    // -------
    // Edge inclusion matches the documented open/closed policy.
    //
    // Given
    // -----
    // - Each bounded parameter evaluated exactly at its lower and upper edge
    //   and just beyond each edge.
    //
    // Expect
    // ------
    // - Closed edges return 0, open edges and exterior points return the
    //   penalty.
    fn edges_follow_open_closed_policy() {
        let cases: &[(ParamName, f64, bool, f64)] = &[
            (ParamName::M0, -21.0, true, -17.0),
            (ParamName::SM0, 0.0, false, 1.0),
            (ParamName::Alfa, 0.0, false, 1.0),
            (ParamName::Beta, 0.0, false, 5.0),
            (ParamName::X10, -5.0, false, 5.0),
            (ParamName::EtaX1, -5.0, true, 5.0),
            (ParamName::Sx1, 0.0, false, 2.0),
            (ParamName::C0, -1.0, false, 1.0),
            (ParamName::EtaC, -1.0, true, 1.0),
            (ParamName::Sc, 0.0, false, 1.0),
            (ParamName::Om0, 0.0, true, 1.2),
            (ParamName::OL0, 0.0, true, 1.2),
        ];
        for &(name, lo, lo_closed, hi) in cases {
            let at_lo = if lo_closed { 0.0 } else { PRIOR_PENALTY };
            assert_eq!(log_prior(name, lo), at_lo, "{name} at lower edge");
            assert_eq!(log_prior(name, hi), 0.0, "{name} at upper edge");
            assert_eq!(log_prior(name, lo - 1e-9), PRIOR_PENALTY, "{name} below");
            assert_eq!(log_prior(name, hi + 1e-9), PRIOR_PENALTY, "{name} above");
        }
    }

    #[test]
    // Purpose
    // -------
    // `delM` accepts any finite value; non-finite values are rejected for
    // every parameter.
    fn del_m_is_unbounded_and_non_finite_is_rejected() {
        assert_eq!(log_prior(ParamName::DelM, -1e6), 0.0);
        assert_eq!(log_prior(ParamName::DelM, 1e6), 0.0);
        for name in ParamName::ALL {
            assert_eq!(log_prior(name, f64::NAN), PRIOR_PENALTY);
            assert_eq!(log_prior(name, f64::INFINITY), PRIOR_PENALTY);
        }
    }

    #[test]
    // Purpose
    // -------
    // Only active parameters are charged; fixed parameters are never
    // re-checked even if set outside their support.
    fn log_prior_sum_charges_active_parameters_only() {
        let active = ActiveParams::from_names(&["M0", "Om0"]).unwrap();
        let mut params = SnParams::default();
        params.beta = 100.0;
        assert_eq!(log_prior_sum(&active, &params), 0.0);

        params.m0 = -10.0;
        params.om0 = -0.1;
        let total = log_prior_sum(&active, &params);
        assert_eq!(total, 2.0 * PRIOR_PENALTY);
        assert!(total <= REJECTION_THRESHOLD);
    }
}
