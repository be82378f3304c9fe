//! Snapshot validator with a per-column rule registry

use super::report::{CellError, ValidationReport};
use super::rules::ValidationRule;
use crate::codec::scalar::{parse_date, parse_number};
use crate::models::{CellValue, Column, DataType, TableSnapshot};
use std::collections::HashMap;
use tracing::debug;

/// Checks snapshots against declared column types and registered rules
///
/// Validation never fails and never stops early: every row and every column
/// is checked and all problems are collected into one report.
#[derive(Debug, Clone, Default)]
pub struct DataValidator {
    rules: HashMap<String, Vec<ValidationRule>>,
}

impl DataValidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a rule for a column key
    pub fn add_rule(&mut self, column_key: impl Into<String>, rule: ValidationRule) {
        self.rules.entry(column_key.into()).or_default().push(rule);
    }

    /// Builder form of [`add_rule`](Self::add_rule)
    pub fn with_rule(mut self, column_key: impl Into<String>, rule: ValidationRule) -> Self {
        self.add_rule(column_key, rule);
        self
    }

    /// Remove rules for a column key
    ///
    /// `None` clears every rule for the key. `Some(rule)` removes the first
    /// rule equal to it and leaves the rest in place.
    pub fn remove_rule(&mut self, column_key: &str, rule: Option<&ValidationRule>) {
        let Some(rule) = rule else {
            self.rules.remove(column_key);
            return;
        };
        if let Some(rules) = self.rules.get_mut(column_key)
            && let Some(pos) = rules.iter().position(|r| r == rule)
        {
            rules.remove(pos);
        }
    }

    pub fn clear_rules(&mut self) {
        self.rules.clear();
    }

    /// Rules registered for a column key, in registration order
    pub fn rules(&self, column_key: &str) -> &[ValidationRule] {
        self.rules.get(column_key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Validate every cell of a snapshot
    pub fn validate(&self, snapshot: &TableSnapshot) -> ValidationReport {
        let mut errors = Vec::new();

        for (row_index, row) in snapshot.rows.iter().enumerate() {
            for column in &snapshot.columns {
                self.check_cell(
                    row.get(&column.key),
                    row.rejected_token(&column.key),
                    column,
                    row_index,
                    &mut errors,
                );
            }
        }

        debug!(
            rows = snapshot.rows.len(),
            columns = snapshot.columns.len(),
            errors = errors.len(),
            "Validated snapshot"
        );
        ValidationReport::from_errors(errors)
    }

    /// Validate one value outside a snapshot
    pub fn validate_cell(
        &self,
        value: &CellValue,
        column: &Column,
        row_index: usize,
    ) -> Vec<CellError> {
        let mut errors = Vec::new();
        self.check_cell(value, None, column, row_index, &mut errors);
        errors
    }

    fn check_cell(
        &self,
        value: &CellValue,
        rejected: Option<&str>,
        column: &Column,
        row_index: usize,
        errors: &mut Vec<CellError>,
    ) {
        let mut push = |message: String, value: CellValue| {
            errors.push(CellError {
                row_index,
                column_key: column.key.clone(),
                message,
                value,
            })
        };

        if let Some(data_type) = column.data_type {
            match (value, rejected) {
                (CellValue::Null, Some(raw)) => {
                    let raw = CellValue::String(raw.to_string());
                    if let Some(message) = type_error(&raw, data_type) {
                        push(message.to_string(), raw);
                    }
                }
                (CellValue::Null, None) => {}
                (value, _) => {
                    if let Some(message) = type_error(value, data_type) {
                        push(message.to_string(), value.clone());
                    }
                }
            }
        }

        for rule in self.rules(&column.key) {
            if let Some(message) = rule.check(value, column) {
                push(message, value.clone());
            }
        }
    }
}

/// Type-conformance message for a non-null value, if it does not conform
fn type_error(value: &CellValue, data_type: DataType) -> Option<&'static str> {
    match data_type {
        DataType::String => None,
        DataType::Number => {
            let ok = match value {
                CellValue::Number(n) => n.is_finite(),
                CellValue::String(s) => s.trim().is_empty() || parse_number(s).is_some(),
                _ => false,
            };
            (!ok).then_some("Must be a valid number")
        }
        DataType::Boolean => {
            let ok = match value {
                CellValue::Boolean(_) => true,
                CellValue::Number(n) => *n == 0.0 || *n == 1.0,
                CellValue::String(s) => matches!(
                    s.trim().to_ascii_lowercase().as_str(),
                    "true" | "false" | "1" | "0"
                ),
                _ => false,
            };
            (!ok).then_some("Must be a boolean value")
        }
        DataType::Date => {
            let ok = match value {
                CellValue::Date(_) => true,
                CellValue::String(s) => parse_date(s).is_some(),
                _ => false,
            };
            (!ok).then_some("Must be a valid date")
        }
    }
}
