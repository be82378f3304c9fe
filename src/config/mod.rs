//! Transfer configuration
//!
//! `TransferOptions` controls the text wire format (header line, delimiters,
//! quoting), the grid sheet name, the default export filename and the
//! per-column value transforms. Options can be built in code or loaded from a
//! TOML file:
//!
//! ```toml
//! includeHeader = true
//! colDelimiter = ","
//! rowDelimiter = "\r\n"
//! quoting = "minimal"
//! ```

mod transforms;

pub use transforms::{ExportFn, ImportFn, ValueTransforms};

use serde::{Deserialize, Serialize};

/// How cells containing delimiter characters are written and read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Quoting {
    /// No escaping; a delimiter inside a cell splits it on read
    #[default]
    None,
    /// CSV-style double quotes around cells that need them
    Minimal,
}

/// Options for the delimited-text and grid codecs
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TransferOptions {
    /// First line/row holds column titles
    pub include_header: bool,
    /// Separator between cells
    pub col_delimiter: String,
    /// Separator between lines
    pub row_delimiter: String,
    /// Escaping of embedded delimiters
    pub quoting: Quoting,
    /// Sheet name for exported grids
    pub sheet_name: String,
    /// Filename used when an export does not name one
    pub default_filename: String,
    /// Import/export overrides (code only)
    #[serde(skip)]
    pub transform: ValueTransforms,
}

impl Default for TransferOptions {
    fn default() -> Self {
        Self {
            include_header: true,
            col_delimiter: "\t".to_string(),
            row_delimiter: "\n".to_string(),
            quoting: Quoting::None,
            sheet_name: "Sheet1".to_string(),
            default_filename: "export.xlsx".to_string(),
            transform: ValueTransforms::default(),
        }
    }
}

impl TransferOptions {
    /// Create options with defaults (header on, tab/newline, no quoting)
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder for custom options
    pub fn builder() -> TransferOptionsBuilder {
        TransferOptionsBuilder::default()
    }

    /// Comma-separated, CRLF, minimally quoted
    pub fn csv() -> Self {
        Self {
            col_delimiter: ",".to_string(),
            row_delimiter: "\r\n".to_string(),
            quoting: Quoting::Minimal,
            ..Self::default()
        }
    }

    /// Parse options from TOML text
    #[cfg(feature = "config-file")]
    pub fn from_toml_str(text: &str) -> Result<Self, crate::error::TransferError> {
        let options: Self = toml::from_str(text)
            .map_err(|e| crate::error::TransferError::Config(e.to_string()))?;
        options.checked()
    }

    /// Load options from a TOML file
    #[cfg(feature = "config-file")]
    pub fn load(path: impl AsRef<std::path::Path>) -> Result<Self, crate::error::TransferError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            crate::error::TransferError::Config(format!(
                "Failed to read {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::from_toml_str(&text)
    }

    /// Reject delimiter settings the codecs cannot split on
    pub fn checked(self) -> Result<Self, crate::error::TransferError> {
        use crate::error::TransferError;

        if self.col_delimiter.is_empty() {
            return Err(TransferError::Config("colDelimiter cannot be empty".to_string()));
        }
        if self.row_delimiter.is_empty() {
            return Err(TransferError::Config("rowDelimiter cannot be empty".to_string()));
        }
        if self.col_delimiter == self.row_delimiter {
            return Err(TransferError::Config(
                "colDelimiter and rowDelimiter must differ".to_string(),
            ));
        }
        Ok(self)
    }
}

/// Builder for TransferOptions
#[derive(Debug, Default)]
pub struct TransferOptionsBuilder {
    options: TransferOptions,
}

impl TransferOptionsBuilder {
    pub fn include_header(mut self, include: bool) -> Self {
        self.options.include_header = include;
        self
    }

    pub fn col_delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.options.col_delimiter = delimiter.into();
        self
    }

    pub fn row_delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.options.row_delimiter = delimiter.into();
        self
    }

    pub fn quoting(mut self, quoting: Quoting) -> Self {
        self.options.quoting = quoting;
        self
    }

    pub fn sheet_name(mut self, name: impl Into<String>) -> Self {
        self.options.sheet_name = name.into();
        self
    }

    pub fn default_filename(mut self, name: impl Into<String>) -> Self {
        self.options.default_filename = name.into();
        self
    }

    pub fn transform(mut self, transform: ValueTransforms) -> Self {
        self.options.transform = transform;
        self
    }

    /// Build the options
    pub fn build(self) -> TransferOptions {
        self.options
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let options = TransferOptions::default();
        assert!(options.include_header);
        assert_eq!(options.col_delimiter, "\t");
        assert_eq!(options.row_delimiter, "\n");
        assert_eq!(options.quoting, Quoting::None);
    }

    #[test]
    fn test_builder() {
        let options = TransferOptions::builder()
            .include_header(false)
            .col_delimiter(";")
            .quoting(Quoting::Minimal)
            .build();

        assert!(!options.include_header);
        assert_eq!(options.col_delimiter, ";");
        assert_eq!(options.row_delimiter, "\n");
        assert_eq!(options.quoting, Quoting::Minimal);
    }

    #[test]
    fn test_checked_rejects_bad_delimiters() {
        let options = TransferOptions::builder().col_delimiter("").build();
        assert!(options.checked().is_err());

        let options = TransferOptions::builder()
            .col_delimiter("\n")
            .row_delimiter("\n")
            .build();
        assert!(options.checked().is_err());
    }

    #[cfg(feature = "config-file")]
    #[test]
    fn test_from_toml_partial() {
        let options = TransferOptions::from_toml_str(
            r#"
            colDelimiter = ","
            quoting = "minimal"
            "#,
        )
        .unwrap();

        assert!(options.include_header);
        assert_eq!(options.col_delimiter, ",");
        assert_eq!(options.quoting, Quoting::Minimal);
        assert_eq!(options.sheet_name, "Sheet1");
    }

    #[cfg(feature = "config-file")]
    #[test]
    fn test_load_from_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("transfer.toml");
        std::fs::write(&path, "includeHeader = false\nrowDelimiter = \"\\r\\n\"\n").unwrap();

        let options = TransferOptions::load(&path).unwrap();
        assert!(!options.include_header);
        assert_eq!(options.row_delimiter, "\r\n");

        assert!(TransferOptions::load(dir.path().join("missing.toml")).is_err());
    }
}
