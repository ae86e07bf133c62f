//! Whitespace-delimited light-curve catalog reader.
//!
//! The JLA release ships `jla_lcparams.txt`: one supernova per line, a
//! leading name column, and a `#`-prefixed header. [`CatalogColumns`] maps
//! each catalog field to a 0-based column position; the default matches
//! that file.
use crate::supernova::{
    core::data::SnCatalog,
    errors::{SnError, SnResult},
};
use ndarray::Array1;
use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

/// 0-based positions of the catalog fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogColumns {
    pub z_cmb: usize,
    pub z_hel: usize,
    pub m_b: usize,
    pub x1: usize,
    pub color: usize,
    pub host_mass: usize,
    pub host_mass_err: usize,
    pub dataset: usize,
    pub bias_corr: usize,
}

impl CatalogColumns {
    fn positions(&self) -> [usize; 9] {
        [
            self.z_cmb,
            self.z_hel,
            self.m_b,
            self.x1,
            self.color,
            self.host_mass,
            self.host_mass_err,
            self.dataset,
            self.bias_corr,
        ]
    }
}

impl Default for CatalogColumns {
    /// `jla_lcparams.txt` layout.
    fn default() -> Self {
        CatalogColumns {
            z_cmb: 1,
            z_hel: 2,
            m_b: 4,
            x1: 6,
            color: 8,
            host_mass: 10,
            host_mass_err: 11,
            dataset: 17,
            bias_corr: 20,
        }
    }
}

/// Read a catalog file.
///
/// Errors
/// ------
/// - `SnError::Io` if the file cannot be opened or read.
/// - `SnError::ParseCatalog` (1-based line number) for short rows or
///   non-numeric fields.
/// - Validation errors from [`SnCatalog::new`].
pub fn read_catalog<P: AsRef<Path>>(path: P, columns: &CatalogColumns) -> SnResult<SnCatalog> {
    let path = path.as_ref();
    let source = path.display().to_string();
    let file = File::open(path)
        .map_err(|err| SnError::Io { path: source.clone(), message: err.to_string() })?;
    parse_catalog(BufReader::new(file), columns, &source)
}

fn parse_catalog<R: BufRead>(
    reader: R, columns: &CatalogColumns, source: &str,
) -> SnResult<SnCatalog> {
    let positions = columns.positions();
    let needed = positions.iter().max().copied().unwrap_or(0) + 1;
    let mut values: [Vec<f64>; 9] = Default::default();

    for (idx, line) in reader.lines().enumerate() {
        let line =
            line.map_err(|err| SnError::Io { path: source.to_string(), message: err.to_string() })?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let fields: Vec<&str> = trimmed.split_whitespace().collect();
        if fields.len() < needed {
            return Err(SnError::ParseCatalog {
                line: idx + 1,
                message: format!("expected at least {needed} columns, found {}", fields.len()),
            });
        }
        for (column, &pos) in values.iter_mut().zip(positions.iter()) {
            let value = fields[pos].parse::<f64>().map_err(|err| SnError::ParseCatalog {
                line: idx + 1,
                message: format!("column {pos} ('{}'): {err}", fields[pos]),
            })?;
            column.push(value);
        }
    }

    let [z_cmb, z_hel, m_b, x1, color, host_mass, host_mass_err, dataset, bias_corr] =
        values.map(Array1::from_vec);
    log::debug!("read {} catalog rows from {source}", z_cmb.len());
    SnCatalog::new(z_cmb, z_hel, m_b, x1, color, host_mass, host_mass_err, dataset, bias_corr)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = "\
#name zcmb zhel dz mb dmb x1 dx1 color dcolor 3rdvar d3rdvar tmax dtmax cov_m_s cov_m_c cov_s_c set ra dec biascor
03D1au 0.50309 0.50309 0 23.00 0.09 1.27 0.15 -0.01 0.02 9.52 0.12 52900 0.2 0 0 0 1 36.04 -4.03 0.0
03D1aw 0.58073 0.58073 0 23.57 0.09 0.97 0.18 -0.03 0.03 9.27 0.19 52910 0.3 0 0 0 1 36.05 -4.01 0.0

sn1990af 0.0350 0.0345 0 17.72 0.13 -2.1 0.09 -0.10 0.02 10.56 0.50 48196 0.1 0 0 0 3 -30.2 -62.1 0.01
";

    #[test]
    // Purpose
    // -------
    // Comments and blank lines are skipped; fields land in the right
    // columns under the default layout.
    fn parses_rows_and_skips_comments() {
        let catalog = parse_catalog(SAMPLE.as_bytes(), &CatalogColumns::default(), "mem").unwrap();
        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.z_cmb[1], 0.58073);
        assert_eq!(catalog.z_hel[2], 0.0345);
        assert_eq!(catalog.m_b[2], 17.72);
        assert_eq!(catalog.x1[2], -2.1);
        assert_eq!(catalog.color[0], -0.01);
        assert_eq!(catalog.host_mass[2], 10.56);
        assert_eq!(catalog.host_mass_err[1], 0.19);
        assert_eq!(catalog.dataset[2], 3.0);
        assert_eq!(catalog.bias_corr[2], 0.01);
    }

    #[test]
    // Purpose
    // -------
    // Short rows and bad numbers report the 1-based line number.
    fn reports_line_numbers() {
        let cols = CatalogColumns::default();
        let err = parse_catalog("# header\nsn 0.1 0.1 0.1\n".as_bytes(), &cols, "mem");
        assert!(matches!(err, Err(SnError::ParseCatalog { line: 2, .. })));

        let bad = SAMPLE.replace("23.57", "23.5x");
        let err = parse_catalog(bad.as_bytes(), &cols, "mem");
        assert!(matches!(err, Err(SnError::ParseCatalog { line: 3, .. })));
    }

    #[test]
    // Purpose
    // -------
    // Files are read through the same parser; a missing file is an I/O
    // error.
    fn reads_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();
        let catalog = read_catalog(file.path(), &CatalogColumns::default()).unwrap();
        assert_eq!(catalog.len(), 3);

        let missing = read_catalog("/nonexistent/jla_lcparams.txt", &CatalogColumns::default());
        assert!(matches!(missing, Err(SnError::Io { .. })));
    }
}
