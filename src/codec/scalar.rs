//! Scalar codec: one cell between its text form and a typed value

use crate::config::ValueTransforms;
use crate::models::{CellValue, Column, DataType};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;

static NUMERIC_TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^-?\d+(\.\d+)?$").unwrap());

/// Result of decoding one cell with column context
#[derive(Debug, Clone, PartialEq)]
pub struct Decoded {
    pub value: CellValue,
    /// Raw text when a typed decode discarded it as `Null`
    pub rejected: Option<String>,
}

/// Guess a value from a bare token
///
/// Numbers must look like `-?\d+(\.\d+)?`; `true`/`false` match in any case;
/// empty text is null. Dates are never inferred.
pub fn infer_token(raw: &str) -> CellValue {
    let token = raw.trim();
    if token.is_empty() {
        return CellValue::Null;
    }
    if NUMERIC_TOKEN.is_match(token)
        && let Ok(n) = token.parse::<f64>()
    {
        return CellValue::Number(n);
    }
    if token.eq_ignore_ascii_case("true") {
        return CellValue::Boolean(true);
    }
    if token.eq_ignore_ascii_case("false") {
        return CellValue::Boolean(false);
    }
    CellValue::String(token.to_string())
}

/// Decode a token for a declared type (or infer it when untyped)
pub fn decode(raw: &str, declared: Option<DataType>) -> CellValue {
    let token = raw.trim();
    if token.is_empty() {
        return CellValue::Null;
    }
    match declared {
        None => infer_token(token),
        Some(DataType::String) => CellValue::String(token.to_string()),
        Some(DataType::Number) => parse_number(token)
            .map(CellValue::Number)
            .unwrap_or(CellValue::Null),
        Some(DataType::Boolean) => CellValue::Boolean(token.eq_ignore_ascii_case("true")),
        Some(DataType::Date) => match parse_date(token) {
            Some(date) => CellValue::Date(date),
            None => CellValue::InvalidDate(token.to_string()),
        },
    }
}

/// Decode one cell for a column, honouring import transforms
pub fn decode_cell(raw: &str, column: &Column, transforms: &ValueTransforms) -> Decoded {
    let token = raw.trim();
    if token.is_empty() {
        return Decoded {
            value: CellValue::Null,
            rejected: None,
        };
    }
    if let Some(import) = transforms.import_for(column) {
        return Decoded {
            value: import(token, column),
            rejected: None,
        };
    }

    let value = decode(token, column.data_type);
    let rejected = (value.is_null() && column.data_type.is_some()).then(|| token.to_string());
    Decoded { value, rejected }
}

/// Bring an already-typed cell in line with the column's declared type
///
/// Used for grid cells and structured clipboard data. Text goes through
/// `decode_cell`; a value already of the declared type is kept; anything else
/// is re-decoded from its native text.
pub fn coerce(value: CellValue, column: &Column, transforms: &ValueTransforms) -> Decoded {
    let keep = |value| Decoded {
        value,
        rejected: None,
    };
    match (value, column.data_type) {
        (CellValue::Null, _) => keep(CellValue::Null),
        (CellValue::String(text), _) => decode_cell(&text, column, transforms),
        (other, _) if transforms.import_for(column).is_some() => {
            decode_cell(&other.to_text(), column, transforms)
        }
        (other, None) => keep(other),
        (v @ CellValue::Number(_), Some(DataType::Number))
        | (v @ CellValue::Boolean(_), Some(DataType::Boolean))
        | (v @ CellValue::Date(_), Some(DataType::Date))
        | (v @ CellValue::InvalidDate(_), Some(DataType::Date)) => keep(v),
        (other, Some(_)) => decode_cell(&other.to_text(), column, transforms),
    }
}

/// Text form of a value; null is always the empty string
pub fn encode(value: &CellValue, _declared: Option<DataType>) -> String {
    value.to_text()
}

/// Text form of one cell for a column, honouring export transforms
pub fn encode_cell(value: &CellValue, column: &Column, transforms: &ValueTransforms) -> String {
    if value.is_null() {
        return String::new();
    }
    match transforms.export_for(column) {
        Some(export) => export(value, column),
        None => encode(value, column.data_type),
    }
}

/// Parse a plain decimal; non-finite results are rejected
pub fn parse_number(token: &str) -> Option<f64> {
    let token = token.trim();
    // f64::from_str also accepts "inf"/"nan" spellings
    if token.is_empty() || token.chars().any(|c| c.is_ascii_alphabetic() && c != 'e' && c != 'E') {
        return None;
    }
    token.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Parse an ISO-8601 calendar date, truncating date-times to the day
pub fn parse_date(token: &str) -> Option<NaiveDate> {
    let token = token.trim();
    if let Ok(date) = NaiveDate::parse_from_str(token, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(token) {
        return Some(dt.date_naive());
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(token, fmt).ok())
        .map(|dt| dt.date())
}
