//! Distance interpolation: cubic B-spline bases, the bicubic surface, and
//! the per-supernova interpolant table.
pub mod bivariate;
pub mod bspline;
pub mod table;
