//! Output formatting for CLI

use super::CliError;
use crate::models::TableSnapshot;
use crate::validation::ValidationReport;

/// Rows as a pretty JSON array of objects
pub fn format_json_rows(snapshot: &TableSnapshot) -> Result<String, CliError> {
    serde_json::to_string_pretty(&snapshot.to_json_rows())
        .map_err(|e| CliError::OutputError(e.to_string()))
}

/// Report as pretty JSON
pub fn format_report(report: &ValidationReport) -> Result<String, CliError> {
    serde_json::to_string_pretty(report).map_err(|e| CliError::OutputError(e.to_string()))
}

/// One-line human summary of a report
pub fn format_summary(report: &ValidationReport, rows: usize) -> String {
    if report.valid {
        format!("✅ {} row(s) passed validation", rows)
    } else {
        let mut output = format!(
            "⚠️  {} validation error(s) in {} row(s):\n",
            report.error_count(),
            rows
        );
        for error in &report.errors {
            output.push_str(&format!("  - {}\n", error));
        }
        output
    }
}
