//! Forward projection of fitted models beyond the observed range.

pub mod extrapolate;

pub use extrapolate::*;
