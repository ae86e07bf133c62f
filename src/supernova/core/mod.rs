//! Core building blocks for the supernova likelihood.
//!
//! - `data`: validated catalog container.
//! - `params`: parameter names, full parameter point, active/fixed split.
//! - `priors`: flat hard-edged priors and the rejection sentinel.
//! - `covariance`: observational covariance composition and the intrinsic
//!   scatter block.
//! - `options`: evaluator constants and TOML run configuration.
//! - `workspace`: per-worker scratch buffers.
pub mod covariance;
pub mod data;
pub mod options;
pub mod params;
pub mod priors;
pub mod workspace;
