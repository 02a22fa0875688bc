//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - raw and parsed records (`RawPoint`, `PricePoint`)
//! - expanded and projected series points (`Point`, `ProjectedPoint`)
//! - declarative model descriptions (`ModelSpec` and its axes/filters)
//! - pipeline configuration (`PipelineConfig`, `InputOrder`, `DuplicatePolicy`)

pub mod types;

pub use types::*;
