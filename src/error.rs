//! Error type shared by every stage of a validation call
//!
//! None of these errors are recovered locally. A validation call either
//! produces a score or returns one of these to the caller.

use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, ValidatorError>;

/// Everything that can abort a load, rebuild, or evaluation.
#[derive(Debug, Error)]
pub enum ValidatorError {
    /// The dataset parsed cleanly but contained no data rows.
    #[error("empty dataset: {path} contains no rows")]
    EmptyDataset { path: String },

    /// A buffer did not have the number of elements its shape requires.
    #[error("shape mismatch in {context}: expected {expected} values, got {actual}")]
    ShapeMismatch {
        context: String,
        expected: usize,
        actual: usize,
    },

    /// The flat weight vector does not fit the architecture.
    #[error("weight vector length mismatch: architecture expects {expected} values, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    /// The weights were flattened from a different architecture.
    #[error("architecture mismatch: expected fingerprint {expected}, got {actual}")]
    ArchitectureMismatch { expected: String, actual: String },

    #[error("invalid architecture: {0}")]
    InvalidArchitecture(String),

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// A label addresses a class the model has no output for.
    #[error("label {label} in row {row} is out of range for a model with {classes} outputs")]
    LabelOutOfRange {
        row: usize,
        label: u32,
        classes: usize,
    },

    /// A field could not be read as a number.
    #[error("cannot parse {value:?} at row {row}, column {column}")]
    Parse {
        row: usize,
        column: usize,
        value: String,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl ValidatorError {
    pub(crate) fn shape(context: impl Into<String>, expected: usize, actual: usize) -> Self {
        ValidatorError::ShapeMismatch {
            context: context.into(),
            expected,
            actual,
        }
    }
}
