//! Error types.
//!
//! - `PipelineError` is what the library returns while building a dataset.
//! - `AppError` is what the binary reports (message + process exit code).

use thiserror::Error;

/// Failure while turning a raw series into a `ChartDataset`.
///
/// `Parse`, `Ordering`, `EmptySeries`, `Domain` and `InvalidConfig` abort dataset
/// construction.
/// `DegenerateFit` is only fatal for the single model being fitted; the fitter
/// records it and carries on with the remaining models.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PipelineError {
    #[error("Record {record}: {message}")]
    Parse { record: usize, message: String },

    #[error("Cannot determine series ordering: {0}")]
    Ordering(String),

    #[error("Series is empty")]
    EmptySeries,

    #[error("Point {index}: {message}")]
    Domain { index: usize, message: String },

    #[error("Degenerate fit: {0}")]
    DegenerateFit(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl PipelineError {
    pub fn parse(record: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            record,
            message: message.into(),
        }
    }

    pub fn domain(index: usize, message: impl Into<String>) -> Self {
        Self::Domain {
            index,
            message: message.into(),
        }
    }

    pub fn degenerate(message: impl Into<String>) -> Self {
        Self::DegenerateFit(message.into())
    }
}

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl From<PipelineError> for AppError {
    fn from(err: PipelineError) -> Self {
        let exit_code = match err {
            PipelineError::Parse { .. }
            | PipelineError::Ordering(_)
            | PipelineError::InvalidConfig(_) => 2,
            PipelineError::EmptySeries => 3,
            PipelineError::Domain { .. } | PipelineError::DegenerateFit(_) => 4,
        };
        AppError::new(exit_code, err.to_string())
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}
