//! File loaders for the JLA catalog and covariance matrices.
pub mod catalog;
pub mod matrix;

pub use catalog::{CatalogColumns, read_catalog};
pub use matrix::{read_covariance, read_matrix};
