//! Column model for table snapshots

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Declared scalar type of a column
///
/// A column without a declared type is decoded with bare-token inference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    String,
    Number,
    Boolean,
    Date,
}

impl DataType {
    /// Lowercase name as used in configuration and column specs
    pub fn as_str(&self) -> &'static str {
        match self {
            DataType::String => "string",
            DataType::Number => "number",
            DataType::Boolean => "boolean",
            DataType::Date => "date",
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DataType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "string" | "text" => Ok(DataType::String),
            "number" | "numeric" => Ok(DataType::Number),
            "boolean" | "bool" => Ok(DataType::Boolean),
            "date" => Ok(DataType::Date),
            other => Err(format!("Unknown data type: {}", other)),
        }
    }
}

/// Column model describing one field of a table snapshot
///
/// Columns are declared once per table session and are not modified during a
/// conversion. The `key` binds row values to the column; the `title` is only
/// used for header lines.
///
/// # Example
///
/// ```rust
/// use table_interchange::models::{Column, DataType};
///
/// let age = Column::new("age", "Age").with_type(DataType::Number);
/// assert_eq!(age.data_type, Some(DataType::Number));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    /// Unique key within the snapshot
    pub key: String,
    /// Header title
    pub title: String,
    /// Declared type; `None` means bare-token inference
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_type: Option<DataType>,
    /// Display width in pixels
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    /// Whether the UI allows editing
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub editable: Option<bool>,
}

impl Column {
    /// Create an untyped column
    pub fn new(key: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            title: title.into(),
            data_type: None,
            width: None,
            editable: None,
        }
    }

    /// Set the declared type
    pub fn with_type(mut self, data_type: DataType) -> Self {
        self.data_type = Some(data_type);
        self
    }

    /// Set the display width
    pub fn with_width(mut self, width: u32) -> Self {
        self.width = Some(width);
        self
    }

    /// Mark the column as editable or read-only
    pub fn editable(mut self, editable: bool) -> Self {
        self.editable = Some(editable);
        self
    }
}
