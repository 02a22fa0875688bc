//! Input/output helpers.
//!
//! - raw series loading + parsing (`ingest`)
//! - projected series / dataset exports (CSV/JSON) (`export`)

pub mod export;
pub mod ingest;

pub use export::*;
pub use ingest::*;
