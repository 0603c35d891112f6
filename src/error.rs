//! Error types for Cograph
//!
//! Only input and configuration problems surface here. Numerical failures
//! inside the metrics engine are absorbed by its fallback chains.

use thiserror::Error;

/// Errors returned to callers of the builder, the metrics engine and the
/// loaders
#[derive(Error, Debug)]
pub enum CographError {
    #[error("no fields selected: choose at least one column to build nodes from")]
    EmptyFieldSelection,

    #[error("fields not present in the dataset: {}", .fields.join(", "))]
    UnknownFields { fields: Vec<String> },

    #[error("min_weight must be at least 1, got {0}")]
    InvalidMinWeight(u64),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("invalid dataset: {0}")]
    InvalidDataset(String),

    #[error("row {row} has {found} values, expected {expected}")]
    RowArity {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl CographError {
    /// True for errors caused by the request itself (fields, parameters)
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            CographError::EmptyFieldSelection
                | CographError::UnknownFields { .. }
                | CographError::InvalidMinWeight(_)
                | CographError::InvalidConfig(_)
                | CographError::InvalidDataset(_)
        )
    }
}

pub type CographResult<T> = Result<T, CographError>;
