//! Mathematical utilities: closed-form least squares and residual dispersion.

pub mod ols;

pub use ols::*;
