//! Derived per-point fields.
//!
//! - `expand`: day index, sqrt of elapsed days, forward minimum, log10 transforms
//! - `annotate`: attach each fitted model's prediction to every observed point

pub mod expand;

pub use expand::*;
