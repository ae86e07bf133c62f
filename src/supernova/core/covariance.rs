//! Covariance assembly — fixed observational part plus per-evaluation
//! intrinsic scatter.
//!
//! Purpose
//! -------
//! Hold the fixed `3N × 3N` observational covariance, describe which named
//! systematic terms it is composed from, and add the parameter-dependent
//! block-diagonal intrinsic-scatter term into a preallocated buffer on every
//! evaluation.
//!
//! Key behaviors
//! -------------
//! - [`CovarianceTerm`] names the JLA covariance contributions and
//!   [`CovarianceSet`] selects which of them are summed (the host-mass term
//!   is only included when `delM` is sampled).
//! - [`ObservationalCovariance::compose`] sums validated terms once at
//!   setup time.
//! - [`intrinsic_block`] builds the 3×3 scatter block from
//!   `(sM0, sx1, sc, alfa, beta)`.
//! - [`tile_block_diagonal`] writes `N` copies of a block into a zeroed
//!   buffer; [`assemble_combined`] copies the observational matrix into a
//!   buffer and adds the block on the diagonal in place.
//!
//! Invariants & assumptions
//! ------------------------
//! - The observational matrix is square, finite, and symmetric up to
//!   [`SYMMETRY_TOL`] (relative); it is symmetrized exactly at composition.
//! - The intrinsic block is symmetric by construction, so the combined
//!   covariance is exactly symmetric for any parameter values.
//! - Rows/cols are ordered `(m_B, x1, c)` per supernova.
//!
//! Performance
//! -----------
//! - `assemble_combined` performs one `3N × 3N` copy and `9N` additions; no
//!   allocation once the buffer exists.
use crate::supernova::{
    core::params::{ActiveParams, ParamName, SnParams},
    errors::{SnError, SnResult},
};
use nalgebra::{DMatrix, Matrix3};
use ndarray::Array2;
use serde::Deserialize;

/// Relative tolerance for the symmetry check on input covariance terms.
pub const SYMMETRY_TOL: f64 = 1e-8;

/// Named contribution to the JLA observational covariance (Betoule et al.
/// 2014, Eq. 11–13).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CovarianceTerm {
    Stat,
    PecVel,
    NonIa,
    Model,
    Dust,
    Cal,
    Host,
    Bias,
}

impl CovarianceTerm {
    /// Short name used in file stems (`C_<name>`).
    pub fn name(self) -> &'static str {
        match self {
            CovarianceTerm::Stat => "stat",
            CovarianceTerm::PecVel => "pecvel",
            CovarianceTerm::NonIa => "nonia",
            CovarianceTerm::Model => "model",
            CovarianceTerm::Dust => "dust",
            CovarianceTerm::Cal => "cal",
            CovarianceTerm::Host => "host",
            CovarianceTerm::Bias => "bias",
        }
    }

    pub fn file_stem(self) -> String {
        format!("C_{}", self.name())
    }
}

/// Which covariance terms are summed into the observational covariance.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CovarianceSet {
    /// stat, pecvel, nonia, model, dust, cal, bias.
    Standard,
    /// `Standard` plus the host-mass term.
    WithHost,
    /// Explicit list.
    Custom(Vec<CovarianceTerm>),
}

impl CovarianceSet {
    /// `WithHost` iff `delM` is sampled, otherwise `Standard`.
    pub fn for_active(active: &ActiveParams) -> CovarianceSet {
        if active.is_active(ParamName::DelM) {
            CovarianceSet::WithHost
        } else {
            CovarianceSet::Standard
        }
    }

    /// Terms in summation order.
    pub fn terms(&self) -> Vec<CovarianceTerm> {
        use CovarianceTerm::*;
        match self {
            CovarianceSet::Standard => vec![Stat, PecVel, NonIa, Model, Dust, Cal, Bias],
            CovarianceSet::WithHost => vec![Stat, PecVel, NonIa, Model, Dust, Cal, Host, Bias],
            CovarianceSet::Custom(terms) => terms.clone(),
        }
    }
}

/// ObservationalCovariance — fixed `3N × 3N` measurement + systematic
/// covariance, built once.
#[derive(Debug, Clone, PartialEq)]
pub struct ObservationalCovariance {
    matrix: DMatrix<f64>,
}

impl ObservationalCovariance {
    /// Wrap a single validated matrix.
    ///
    /// Errors
    /// ------
    /// - `SnError::CovarianceNotSquare`, `SnError::NonFiniteCovariance`,
    ///   `SnError::CovarianceNotSymmetric` as for [`validate_term`].
    pub fn from_array(name: &str, matrix: &Array2<f64>) -> SnResult<Self> {
        validate_term(name, matrix)?;
        let mut out = DMatrix::<f64>::zeros(matrix.nrows(), matrix.ncols());
        fill_dmatrix(matrix, &mut out);
        symmetrize(&mut out);
        Ok(ObservationalCovariance { matrix: out })
    }

    /// Sum the terms required by `set`, looking each one up in `terms`.
    ///
    /// Errors
    /// ------
    /// - `SnError::MissingCovarianceTerm` if `set` names a term absent from
    ///   `terms`.
    /// - `SnError::DimensionMismatch` if the terms disagree in size.
    /// - Validation errors from [`validate_term`].
    pub fn compose(
        set: &CovarianceSet, terms: &[(CovarianceTerm, Array2<f64>)],
    ) -> SnResult<Self> {
        let mut total: Option<DMatrix<f64>> = None;
        for term in set.terms() {
            let (_, matrix) = terms
                .iter()
                .find(|(t, _)| *t == term)
                .ok_or(SnError::MissingCovarianceTerm { term: term.name() })?;
            validate_term(term.name(), matrix)?;
            let acc = total.get_or_insert_with(|| DMatrix::zeros(matrix.nrows(), matrix.ncols()));
            if acc.nrows() != matrix.nrows() {
                return Err(SnError::DimensionMismatch {
                    what: "covariance term size",
                    expected: acc.nrows(),
                    actual: matrix.nrows(),
                });
            }
            for ((i, j), v) in matrix.indexed_iter() {
                acc[(i, j)] += *v;
            }
            log::debug!("added covariance term {} ({}x{})", term.name(), matrix.nrows(), matrix.ncols());
        }
        let mut matrix = total.ok_or(SnError::InvalidConfig {
            message: "covariance set contains no terms".to_string(),
        })?;
        symmetrize(&mut matrix);
        Ok(ObservationalCovariance { matrix })
    }

    /// Dimension `3N`.
    pub fn dim(&self) -> usize {
        self.matrix.nrows()
    }

    pub fn matrix(&self) -> &DMatrix<f64> {
        &self.matrix
    }

    /// Reorder supernova blocks: new block `k` is old block `order[k]`.
    pub fn permuted(&self, order: &[usize]) -> ObservationalCovariance {
        let n = self.dim();
        let map = |idx: usize| 3 * order[idx / 3] + idx % 3;
        ObservationalCovariance { matrix: DMatrix::from_fn(n, n, |i, j| self.matrix[(map(i), map(j))]) }
    }
}

/// Check that `matrix` is square, finite, and symmetric within
/// [`SYMMETRY_TOL`].
pub fn validate_term(name: &str, matrix: &Array2<f64>) -> SnResult<()> {
    let (rows, cols) = matrix.dim();
    if rows != cols {
        return Err(SnError::CovarianceNotSquare { name: name.to_string(), rows, cols });
    }
    for ((row, col), &value) in matrix.indexed_iter() {
        if !value.is_finite() {
            return Err(SnError::NonFiniteCovariance { name: name.to_string(), row, col, value });
        }
    }
    for i in 0..rows {
        for j in (i + 1)..cols {
            let (a, b) = (matrix[[i, j]], matrix[[j, i]]);
            let scale = a.abs().max(b.abs()).max(1.0);
            if (a - b).abs() > SYMMETRY_TOL * scale {
                return Err(SnError::CovarianceNotSymmetric { name: name.to_string(), row: i, col: j });
            }
        }
    }
    Ok(())
}

/// Intrinsic-scatter block for one supernova, rows/cols `(m_B, x1, c)`:
///
/// ```text
/// [ sM0² + sx1²·alfa² + sc²·beta²,  -sx1²·alfa,  sc²·beta ]
/// [ -sx1²·alfa,                      sx1²,        0        ]
/// [ sc²·beta,                        0,           sc²      ]
/// ```
pub fn intrinsic_block(params: &SnParams) -> Matrix3<f64> {
    let v_m0 = params.s_m0 * params.s_m0;
    let v_x1 = params.sx1 * params.sx1;
    let v_c = params.sc * params.sc;
    let (alfa, beta) = (params.alfa, params.beta);
    let mx = -v_x1 * alfa;
    let mc = v_c * beta;
    Matrix3::new(
        v_m0 + v_x1 * alfa * alfa + v_c * beta * beta, mx, mc,
        mx, v_x1, 0.0,
        mc, 0.0, v_c,
    )
}

/// Write the block-diagonal matrix of `out.nrows() / 3` copies of `block`
/// into `out`, zeroing everything off the diagonal blocks.
///
/// Panics
/// ------
/// - If `out` is not square with a dimension divisible by 3.
pub fn tile_block_diagonal(block: &Matrix3<f64>, out: &mut DMatrix<f64>) {
    assert!(out.is_square() && out.nrows() % 3 == 0, "buffer must be 3N x 3N");
    out.fill(0.0);
    add_block_diagonal(block, out);
}

/// Combined covariance: copy the observational matrix into `out` and add
/// `block` on every 3×3 diagonal block.
///
/// Panics
/// ------
/// - If `out` and `obs` differ in shape.
pub fn assemble_combined(
    obs: &ObservationalCovariance, block: &Matrix3<f64>, out: &mut DMatrix<f64>,
) {
    out.copy_from(&obs.matrix);
    add_block_diagonal(block, out);
}

fn add_block_diagonal(block: &Matrix3<f64>, out: &mut DMatrix<f64>) {
    for k in 0..out.nrows() / 3 {
        let mut view = out.fixed_view_mut::<3, 3>(3 * k, 3 * k);
        view += block;
    }
}

/// Copy an `ndarray` matrix into a same-shaped `DMatrix`.
fn fill_dmatrix(src: &Array2<f64>, dst: &mut DMatrix<f64>) {
    for j in 0..src.ncols() {
        for i in 0..src.nrows() {
            dst[(i, j)] = src[[i, j]];
        }
    }
}

fn symmetrize(matrix: &mut DMatrix<f64>) {
    let n = matrix.nrows();
    for j in 0..n {
        for i in (j + 1)..n {
            let avg = 0.5 * (matrix[(i, j)] + matrix[(j, i)]);
            matrix[(i, j)] = avg;
            matrix[(j, i)] = avg;
        }
    }
}
