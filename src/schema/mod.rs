//! Dataset schema: typed model and staged validation
//!
//! Raw JSON goes in, either a `FamilyDataset` or an ordered list of
//! `ValidationIssue`s comes out. Everything downstream (graph, layout,
//! viewport) assumes a dataset that passed through here.

pub mod types;
pub mod validate;

pub use types::*;
pub use validate::{validate_dataset, IssueCode, ValidationIssue};

use crate::error::DatasetError;

/// Parse and validate a dataset from JSON text.
pub fn load_dataset(text: &str) -> Result<FamilyDataset, DatasetError> {
    let value: serde_json::Value = serde_json::from_str(text)?;
    validate_dataset(&value).map_err(DatasetError::Invalid)
}
