use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by the swing analytics core.
///
/// Missing reference data is deliberately not represented here: the scorers
/// fall back to neutral values and log a warning instead.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("invalid input for {field}: {reason}")]
    InvalidInput { field: &'static str, reason: String },

    #[error("missing required measurement: {field}")]
    MissingField { field: &'static str },

    #[error("degenerate result: {reason}")]
    DegenerateResult { reason: String },

    #[error("failed to read reference data from {}: {source}", path.display())]
    ReferenceIo {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse reference data: {0}")]
    ReferenceParse(#[from] serde_json::Error),

    #[error("invalid reference data: {0}")]
    InvalidReference(String),
}

impl AnalysisError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidInput { field, reason: reason.into() }
    }

    pub(crate) fn degenerate(reason: impl Into<String>) -> Self {
        Self::DegenerateResult { reason: reason.into() }
    }
}

pub type Result<T> = std::result::Result<T, AnalysisError>;
