//! Crate error types
//!
//! Validation issues are values, not errors: `validate_dataset` returns
//! them in its `Err` variant directly. `DatasetError` exists for callers
//! loading datasets from raw text, where JSON decoding can also fail.

use thiserror::Error;

use crate::schema::ValidationIssue;

/// Error loading a dataset from JSON text.
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("failed to parse dataset JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("dataset failed validation with {} issue(s)", .0.len())]
    Invalid(Vec<ValidationIssue>),
}

impl DatasetError {
    /// The validation issues, when this error carries them.
    pub fn issues(&self) -> Option<&[ValidationIssue]> {
        match self {
            DatasetError::Invalid(issues) => Some(issues),
            DatasetError::Json(_) => None,
        }
    }
}
