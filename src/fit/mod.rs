//! Regression fitting orchestration.
//!
//! Responsibilities:
//!
//! - fit each configured `ModelSpec` by closed-form OLS
//! - compute each fitted model's residual dispersion
//! - record (not propagate) per-model failures

pub mod fitter;

pub use fitter::*;
