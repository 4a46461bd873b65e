//! Error types for the pingouin crate

use thiserror::Error;

/// Main error type for the pingouin crate
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("grid size {size} is too small (need at least 2 so start and goal differ)")]
    GridTooSmall { size: usize },

    #[error("invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    #[error("hazard at ({column}, {row}) is {reason}")]
    InvalidHazard {
        column: usize,
        row: usize,
        reason: String,
    },

    #[error("state ({column}, {row}) is outside the {size}x{size} grid")]
    StateOutOfBounds {
        column: usize,
        row: usize,
        size: usize,
    },

    #[error("no candidate actions available at ({column}, {row})")]
    NoCandidateActions { column: usize, row: usize },

    #[error("unrecognised action '{input}' (expected up, down, left or right)")]
    ParseAction { input: String },

    #[error("unknown reward shaping '{input}'. Expected one of: {expected}")]
    ParseRewardShaping { input: String, expected: String },

    #[error("failed to {operation}: {source}")]
    Io {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("progress bar template error: {message}")]
    ProgressBarTemplate { message: String },
}

/// Convenience type alias for Results using the crate's Error type
pub type Result<T> = std::result::Result<T, Error>;

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Error::Io {
            operation: "IO operation".to_string(),
            source,
        }
    }
}

impl Error {
    /// Shorthand for a configuration failure.
    pub(crate) fn config(message: impl Into<String>) -> Self {
        Error::InvalidConfiguration {
            message: message.into(),
        }
    }
}
