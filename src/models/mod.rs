//! Regression line model and named presets.
//!
//! Models are small immutable values so that fitting, projection and reporting
//! code can stay generic over which transforms are in play.

pub mod model;

pub use model::*;
