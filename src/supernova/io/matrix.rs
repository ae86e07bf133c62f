//! Text matrix reader and covariance directory loader.
//!
//! Purpose
//! -------
//! Read the JLA covariance terms (`C_stat.dat`, `C_cal.dat`, …) and sum the
//! configured subset into an [`ObservationalCovariance`].
//!
//! Key behaviors
//! -------------
//! - [`read_matrix`] accepts the CosmoMC layout (first token is the
//!   dimension `n`, followed by `n²` row-major values) and, as a fallback, a
//!   plain square table of `n²` values.
//! - [`read_covariance`] reads `C_<term>.dat` for every term of a
//!   [`CovarianceSet`], checks each is `3N × 3N`, and composes them.
//!
//! Conventions
//! -----------
//! - `#` starts a comment that runs to end of line.
//! - The JLA release ships the covariance terms as `C_<term>.fits`; they
//!   must be exported to text `C_<term>.dat` first (e.g. with astropy,
//!   `np.savetxt` after writing the dimension line). FITS is not read here.
use crate::supernova::{
    core::covariance::{CovarianceSet, ObservationalCovariance},
    errors::{SnError, SnResult},
};
use ndarray::Array2;
use std::path::Path;

/// Read a square matrix from a text file.
///
/// Errors
/// ------
/// - `SnError::Io` if the file cannot be read.
/// - `SnError::ParseMatrix` for non-numeric tokens or a token count that
///   matches neither layout.
pub fn read_matrix<P: AsRef<Path>>(path: P) -> SnResult<Array2<f64>> {
    let path = path.as_ref();
    let source = path.display().to_string();
    let text = std::fs::read_to_string(path)
        .map_err(|err| SnError::Io { path: source.clone(), message: err.to_string() })?;
    parse_matrix(&text, &source)
}

fn parse_matrix(text: &str, source: &str) -> SnResult<Array2<f64>> {
    let parse_err = |message: String| SnError::ParseMatrix { path: source.to_string(), message };
    let mut tokens = Vec::new();
    for line in text.lines() {
        let body = line.split('#').next().unwrap_or("");
        for token in body.split_whitespace() {
            let value = token
                .parse::<f64>()
                .map_err(|err| parse_err(format!("invalid number '{token}': {err}")))?;
            tokens.push(value);
        }
    }
    if tokens.is_empty() {
        return Err(parse_err("file contains no values".to_string()));
    }

    let head = tokens[0];
    let sized = head >= 1.0 && head.fract() == 0.0 && {
        let n = head as usize;
        n.checked_mul(n).is_some_and(|nn| nn + 1 == tokens.len())
    };
    let (n, values) = if sized {
        (head as usize, &tokens[1..])
    } else {
        let n = (tokens.len() as f64).sqrt().round() as usize;
        if n * n != tokens.len() {
            return Err(parse_err(format!(
                "{} values is neither n followed by n² entries nor a square table",
                tokens.len()
            )));
        }
        (n, &tokens[..])
    };
    Array2::from_shape_vec((n, n), values.to_vec()).map_err(|err| parse_err(err.to_string()))
}

/// Read and sum the covariance terms of `set` from `dir`.
///
/// Errors
/// ------
/// - Read/parse errors from [`read_matrix`].
/// - `SnError::DimensionMismatch` if a term is not `3·n_sn` square.
/// - Validation errors from [`ObservationalCovariance::compose`].
pub fn read_covariance<P: AsRef<Path>>(
    dir: P, set: &CovarianceSet, n_sn: usize,
) -> SnResult<ObservationalCovariance> {
    let dir = dir.as_ref();
    let mut terms = Vec::new();
    for term in set.terms() {
        let path = dir.join(format!("{}.dat", term.file_stem()));
        let matrix = read_matrix(&path)?;
        if matrix.nrows() != 3 * n_sn {
            return Err(SnError::DimensionMismatch {
                what: "covariance term size",
                expected: 3 * n_sn,
                actual: matrix.nrows(),
            });
        }
        log::debug!("loaded {}", path.display());
        terms.push((term, matrix));
    }
    ObservationalCovariance::compose(set, &terms)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::supernova::core::covariance::CovarianceTerm;
    use ndarray::array;

    #[test]
    // Purpose
    // -------
    // Both the sized and the plain square layouts parse to the same matrix.
    fn parses_sized_and_plain_layouts() {
        let expected = array![[1.0, 0.5], [0.5, 2.0]];
        assert_eq!(parse_matrix("2\n1.0 0.5\n0.5 2.0\n", "m").unwrap(), expected);
        assert_eq!(parse_matrix("1.0 0.5 # row 0\n0.5 2.0\n", "m").unwrap(), expected);
        // n² + 1 is never a perfect square for n ≥ 1, so the layouts cannot
        // be confused.
        assert_eq!(parse_matrix("1 4", "m").unwrap(), array![[4.0]]);
    }

    #[test]
    // Purpose
    // -------
    // Bad token counts and non-numeric tokens are parse errors.
    fn rejects_malformed_matrices() {
        assert!(matches!(parse_matrix("1 2 3", "m"), Err(SnError::ParseMatrix { .. })));
        assert!(matches!(parse_matrix("2\n1 x 0 1", "m"), Err(SnError::ParseMatrix { .. })));
        assert!(matches!(parse_matrix("", "m"), Err(SnError::ParseMatrix { .. })));
    }

    #[test]
    // Purpose
    // -------
    // A covariance directory is composed from `C_<term>.dat` files and
    // missing files are I/O errors.
    //
    // Given
    // -----
    // - One supernova (3×3 terms), `Custom([stat, cal])`, each term k·I.
    //
    // Expect
    // ------
    // - The diagonal is the sum of the two terms.
    fn reads_covariance_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("C_stat.dat"), "3\n1 0 0\n0 1 0\n0 0 1\n").unwrap();
        std::fs::write(dir.path().join("C_cal.dat"), "3\n2 0 0\n0 2 0\n0 0 2\n").unwrap();

        let set = CovarianceSet::Custom(vec![CovarianceTerm::Stat, CovarianceTerm::Cal]);
        let cov = read_covariance(dir.path(), &set, 1).unwrap();
        assert_eq!(cov.matrix()[(1, 1)], 3.0);
        assert_eq!(cov.matrix()[(0, 1)], 0.0);

        assert!(matches!(
            read_covariance(dir.path(), &set, 2),
            Err(SnError::DimensionMismatch { expected: 6, actual: 3, .. })
        ));
        assert!(matches!(
            read_covariance(dir.path(), &CovarianceSet::Standard, 1),
            Err(SnError::Io { .. })
        ));
    }
}
