//! The pipeline's output aggregate and its read-only queries.

pub mod chart;
pub mod query;

pub use chart::*;
pub use query::*;
