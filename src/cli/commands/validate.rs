//! Validate command implementation

use super::paste_input;
use crate::cli::{CliError, TextFormat, parse_columns};
use crate::config::TransferOptions;
use crate::transfer::Pasted;
use crate::validation::{DataValidator, rules};

/// Handle the validate command
///
/// Declared column types are always checked; every key in `required` also
/// gets a required rule.
pub async fn handle_validate(
    input: &str,
    columns: &str,
    required: &[String],
    from: TextFormat,
    options: &TransferOptions,
) -> Result<Pasted, CliError> {
    let columns = parse_columns(columns)?;
    let input_options = from.options(options)?;

    let mut validator = DataValidator::new();
    for key in required {
        if !columns.iter().any(|c| &c.key == key) {
            return Err(CliError::InvalidArgument(format!(
                "Required column '{}' is not declared",
                key
            )));
        }
        validator.add_rule(key.as_str(), rules::required());
    }

    paste_input(input, &columns, &input_options, validator).await
}
