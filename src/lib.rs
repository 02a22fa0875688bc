//! `nlb-curves` library crate.
//!
//! Turns a daily price history into regression projections:
//! raw series -> expanded series -> fitted models -> extrapolated series -> dispersion bands.
//!
//! The binary (`nlb`) is a thin wrapper around this library so that the pipeline
//! is testable without spawning processes and reusable by other front-ends.

pub mod app;
pub mod cli;
pub mod dataset;
pub mod domain;
pub mod error;
pub mod fit;
pub mod io;
pub mod math;
pub mod models;
pub mod project;
pub mod report;
pub mod series;

pub use app::pipeline::build_dataset;
pub use dataset::ChartDataset;
pub use domain::{PipelineConfig, RawPoint};
pub use error::PipelineError;
