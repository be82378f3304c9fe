//! Spreadsheet grid and clipboard payload

use super::value::CellValue;
use serde::{Deserialize, Serialize};

/// One sheet of cells
///
/// Rows are not required to have equal length; readers pad short rows with
/// null.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Grid {
    pub name: String,
    pub cells: Vec<Vec<CellValue>>,
    /// Index of the header row; `None` lets the reader use its default
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header_row_offset: Option<usize>,
}

impl Grid {
    pub fn new(name: impl Into<String>, cells: Vec<Vec<CellValue>>) -> Self {
        Self {
            name: name.into(),
            cells,
            header_row_offset: None,
        }
    }

    pub fn with_header_row(mut self, offset: usize) -> Self {
        self.header_row_offset = Some(offset);
        self
    }

    /// Cell at (row, col); outside a short row reads as `Null`
    pub fn cell(&self, row: usize, col: usize) -> &CellValue {
        static NULL: CellValue = CellValue::Null;
        self.cells
            .get(row)
            .and_then(|r| r.get(col))
            .unwrap_or(&NULL)
    }
}

/// Data read from or written to a clipboard
///
/// `structured`, when present, is authoritative over re-parsing `text`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ClipboardPayload {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub structured: Option<Vec<Vec<CellValue>>>,
}

impl ClipboardPayload {
    /// Plain-text payload
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            html: None,
            structured: None,
        }
    }

    pub fn with_structured(mut self, cells: Vec<Vec<CellValue>>) -> Self {
        self.structured = Some(cells);
        self
    }
}
