//! CLI command implementations

pub mod convert;
pub mod validate;

pub use convert::handle_convert;
pub use validate::handle_validate;

use super::CliError;
use crate::config::TransferOptions;
use crate::models::Column;
use crate::ports::{MemoryClipboard, MemoryFilePort, StdioClipboard};
use crate::transfer::{Pasted, TransferOrchestrator};
use crate::validation::DataValidator;
use std::path::PathBuf;

/// Decode command input as if it had been pasted
///
/// `-` reads standard input through the manual-entry clipboard; anything
/// else is read as a file.
pub(crate) async fn paste_input(
    input: &str,
    columns: &[Column],
    options: &TransferOptions,
    validator: DataValidator,
) -> Result<Pasted, CliError> {
    if input == "-" {
        let orchestrator = TransferOrchestrator::new(StdioClipboard, MemoryFilePort::new())
            .with_options(options.clone())?
            .with_validator(validator);
        return Ok(orchestrator.paste_from_clipboard(columns).await?);
    }

    let path = PathBuf::from(input);
    let text =
        std::fs::read_to_string(&path).map_err(|e| CliError::FileReadError(path, e.to_string()))?;
    let orchestrator =
        TransferOrchestrator::new(MemoryClipboard::with_text(text), MemoryFilePort::new())
            .with_options(options.clone())?
            .with_validator(validator);
    Ok(orchestrator.paste_from_clipboard(columns).await?)
}
