//! Validation report types

use crate::models::CellValue;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One failed check on one cell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CellError {
    /// Position of the row in the snapshot
    pub row_index: usize,
    pub column_key: String,
    pub message: String,
    /// The offending value (the rejected raw text when decoding dropped it)
    pub value: CellValue,
}

impl fmt::Display for CellError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "row {}, column '{}': {} (value: {:?})",
            self.row_index,
            self.column_key,
            self.message,
            self.value.to_text()
        )
    }
}

/// Result of validating a snapshot
///
/// Observational only: nothing in the crate refuses data because a report is
/// not valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub valid: bool,
    pub errors: Vec<CellError>,
}

impl Default for ValidationReport {
    fn default() -> Self {
        Self::from_errors(Vec::new())
    }
}

impl ValidationReport {
    pub fn from_errors(errors: Vec<CellError>) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
        }
    }

    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    /// Errors reported for one column key
    pub fn errors_for<'a>(&'a self, column_key: &'a str) -> impl Iterator<Item = &'a CellError> {
        self.errors.iter().filter(move |e| e.column_key == column_key)
    }
}
