//! Convert command implementation

use super::paste_input;
use crate::cli::output::format_json_rows;
use crate::cli::{CliError, TextFormat, parse_columns};
use crate::codec::delimited;
use crate::config::TransferOptions;
use crate::validation::DataValidator;

/// Handle the convert command
///
/// Decodes `input` in the `from` layout against `columns` and returns the
/// text in the `to` layout.
pub async fn handle_convert(
    input: &str,
    columns: &str,
    from: TextFormat,
    to: TextFormat,
    options: &TransferOptions,
) -> Result<String, CliError> {
    let columns = parse_columns(columns)?;
    let input_options = from.options(options)?;

    let pasted = paste_input(input, &columns, &input_options, DataValidator::new()).await?;

    match to {
        TextFormat::Json => format_json_rows(&pasted.snapshot),
        layout => {
            let output_options = layout.options(options)?;
            Ok(delimited::serialize(&pasted.snapshot, &output_options))
        }
    }
}
