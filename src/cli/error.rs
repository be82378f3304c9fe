//! CLI error type

use crate::error::TransferError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Failed to read {0}: {1}")]
    FileReadError(PathBuf, String),

    #[error("Failed to write output: {0}")]
    OutputError(String),

    #[error(transparent)]
    Transfer(#[from] TransferError),
}
