//! CLI module for the tabx binary

pub mod commands;
pub mod error;
pub mod output;

pub use error::CliError;

use crate::config::{Quoting, TransferOptions};
use crate::models::{Column, DataType};

/// Text layout of command input and output
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum TextFormat {
    /// Tab-separated clipboard text
    Tsv,
    /// Comma-separated, quoted where needed
    Csv,
    /// JSON array of row objects (output only)
    Json,
}

impl TextFormat {
    /// Apply this format's delimiters and quoting to `base`
    pub fn options(self, base: &TransferOptions) -> Result<TransferOptions, CliError> {
        match self {
            TextFormat::Tsv => Ok(base.clone()),
            TextFormat::Csv => Ok(TransferOptions {
                col_delimiter: ",".to_string(),
                row_delimiter: "\n".to_string(),
                quoting: Quoting::Minimal,
                ..base.clone()
            }),
            TextFormat::Json => Err(CliError::InvalidArgument(
                "json is only supported as an output format".to_string(),
            )),
        }
    }
}

/// Parse a column list such as `name=Name,age:number=Age,active:boolean`
///
/// Each entry is `key[:type][=Title]`; the title defaults to the key.
pub fn parse_columns(spec: &str) -> Result<Vec<Column>, CliError> {
    spec.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(parse_column)
        .collect()
}

fn parse_column(entry: &str) -> Result<Column, CliError> {
    let (head, title) = match entry.split_once('=') {
        Some((head, title)) => (head, Some(title.trim())),
        None => (entry, None),
    };
    let (key, data_type) = match head.split_once(':') {
        Some((key, ty)) => (key.trim(), Some(ty.trim())),
        None => (head.trim(), None),
    };

    if key.is_empty() {
        return Err(CliError::InvalidArgument(format!(
            "Column entry '{}' has no key",
            entry
        )));
    }

    let mut column = Column::new(key, title.unwrap_or(key));
    if let Some(ty) = data_type {
        let ty: DataType = ty
            .parse()
            .map_err(|e| CliError::InvalidArgument(format!("Column '{}': {}", key, e)))?;
        column = column.with_type(ty);
    }
    Ok(column)
}
