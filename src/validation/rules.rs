//! Built-in validation rules
//!
//! Each factory returns a [`ValidationRule`] carrying its default message;
//! use [`ValidationRule::with_message`] to replace it.
//!
//! ```
//! use table_interchange::validation::rules;
//!
//! let rule = rules::min_length(3).with_message("Too short");
//! assert_eq!(rule.message(), "Too short");
//! ```

use crate::codec::scalar::parse_number;
use crate::models::{CellValue, Column};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use std::sync::Arc;

static EMAIL: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());
static PHONE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^1[3-9]\d{9}$").unwrap());

/// Result of a custom predicate
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleOutcome {
    Pass,
    /// Fail with the rule's own message
    Fail,
    /// Fail with this message instead of the rule's
    FailWith(String),
}

impl From<bool> for RuleOutcome {
    fn from(ok: bool) -> Self {
        if ok { RuleOutcome::Pass } else { RuleOutcome::Fail }
    }
}

impl From<Result<(), String>> for RuleOutcome {
    fn from(result: Result<(), String>) -> Self {
        match result {
            Ok(()) => RuleOutcome::Pass,
            Err(message) => RuleOutcome::FailWith(message),
        }
    }
}

pub type Predicate = Arc<dyn Fn(&CellValue, &Column) -> RuleOutcome + Send + Sync>;

/// What a rule checks
#[derive(Clone)]
pub enum RuleKind {
    Required,
    MinLength(usize),
    MaxLength(usize),
    Range { min: f64, max: f64 },
    Pattern(Regex),
    Email,
    Phone,
    Custom(Predicate),
}

impl fmt::Debug for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleKind::Required => f.write_str("Required"),
            RuleKind::MinLength(n) => write!(f, "MinLength({})", n),
            RuleKind::MaxLength(n) => write!(f, "MaxLength({})", n),
            RuleKind::Range { min, max } => write!(f, "Range({}..={})", min, max),
            RuleKind::Pattern(re) => write!(f, "Pattern({:?})", re.as_str()),
            RuleKind::Email => f.write_str("Email"),
            RuleKind::Phone => f.write_str("Phone"),
            RuleKind::Custom(_) => f.write_str("Custom"),
        }
    }
}

impl PartialEq for RuleKind {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (RuleKind::Required, RuleKind::Required)
            | (RuleKind::Email, RuleKind::Email)
            | (RuleKind::Phone, RuleKind::Phone) => true,
            (RuleKind::MinLength(a), RuleKind::MinLength(b))
            | (RuleKind::MaxLength(a), RuleKind::MaxLength(b)) => a == b,
            (
                RuleKind::Range { min: a, max: b },
                RuleKind::Range { min: c, max: d },
            ) => a == c && b == d,
            (RuleKind::Pattern(a), RuleKind::Pattern(b)) => a.as_str() == b.as_str(),
            (RuleKind::Custom(a), RuleKind::Custom(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

/// A check applied to every cell of one column
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationRule {
    kind: RuleKind,
    message: String,
}

impl ValidationRule {
    pub fn new(kind: RuleKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Replace the failure message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn kind(&self) -> &RuleKind {
        &self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Check one value; `Some(message)` on failure
    pub fn check(&self, value: &CellValue, column: &Column) -> Option<String> {
        let outcome: RuleOutcome = match &self.kind {
            RuleKind::Required => (!value.to_text().trim().is_empty()).into(),
            RuleKind::MinLength(min) => (char_len(value) >= *min).into(),
            RuleKind::MaxLength(max) => (char_len(value) <= *max).into(),
            RuleKind::Range { min, max } => numeric(value)
                .is_some_and(|n| n >= *min && n <= *max)
                .into(),
            RuleKind::Pattern(re) => re.is_match(&value.to_text()).into(),
            RuleKind::Email => EMAIL.is_match(&value.to_text()).into(),
            RuleKind::Phone => PHONE.is_match(&value.to_text()).into(),
            RuleKind::Custom(predicate) => predicate(value, column),
        };

        match outcome {
            RuleOutcome::Pass => None,
            RuleOutcome::Fail => Some(self.message.clone()),
            RuleOutcome::FailWith(message) => Some(message),
        }
    }
}

fn char_len(value: &CellValue) -> usize {
    value.to_text().chars().count()
}

fn numeric(value: &CellValue) -> Option<f64> {
    match value {
        CellValue::Number(n) => Some(*n),
        CellValue::String(s) => parse_number(s),
        _ => None,
    }
}

/// Value must be present and not blank
pub fn required() -> ValidationRule {
    ValidationRule::new(RuleKind::Required, "This field is required")
}

/// Text form must have at least `min` characters
pub fn min_length(min: usize) -> ValidationRule {
    ValidationRule::new(
        RuleKind::MinLength(min),
        format!("Must be at least {} characters", min),
    )
}

/// Text form must have at most `max` characters
pub fn max_length(max: usize) -> ValidationRule {
    ValidationRule::new(
        RuleKind::MaxLength(max),
        format!("Must be at most {} characters", max),
    )
}

/// Numeric value within `min..=max`; null and non-numeric values fail
pub fn range(min: f64, max: f64) -> ValidationRule {
    ValidationRule::new(
        RuleKind::Range { min, max },
        format!("Must be between {} and {}", min, max),
    )
}

pub fn pattern(regex: Regex) -> ValidationRule {
    ValidationRule::new(RuleKind::Pattern(regex), "Invalid format")
}

pub fn email() -> ValidationRule {
    ValidationRule::new(RuleKind::Email, "Must be a valid email address")
}

/// Eleven-digit mobile number starting with 1
pub fn phone() -> ValidationRule {
    ValidationRule::new(RuleKind::Phone, "Must be a valid phone number")
}

/// Arbitrary predicate returning a bool, a `Result<(), String>` or a [`RuleOutcome`]
pub fn custom<F, R>(predicate: F) -> ValidationRule
where
    F: Fn(&CellValue, &Column) -> R + Send + Sync + 'static,
    R: Into<RuleOutcome>,
{
    ValidationRule::new(
        RuleKind::Custom(Arc::new(
            move |value: &CellValue, column: &Column| -> RuleOutcome {
                predicate(value, column).into()
            },
        )),
        "Validation failed",
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn col() -> Column {
        Column::new("field", "Field")
    }

    #[test]
    fn test_required() {
        let rule = required();
        assert_eq!(
            rule.check(&CellValue::Null, &col()).as_deref(),
            Some("This field is required")
        );
        assert!(rule.check(&CellValue::from("  "), &col()).is_some());
        assert!(rule.check(&CellValue::Number(0.0), &col()).is_none());
        assert!(rule.check(&CellValue::Boolean(false), &col()).is_none());
    }

    #[test]
    fn test_lengths_count_chars() {
        assert!(min_length(3).check(&CellValue::from("äöü"), &col()).is_none());
        assert!(min_length(3).check(&CellValue::Null, &col()).is_some());
        assert!(max_length(2).check(&CellValue::from("abc"), &col()).is_some());
        assert_eq!(
            max_length(2).check(&CellValue::from("abc"), &col()).as_deref(),
            Some("Must be at most 2 characters")
        );
    }

    #[test]
    fn test_range() {
        let rule = range(0.0, 150.0);
        assert!(rule.check(&CellValue::Number(30.0), &col()).is_none());
        assert!(rule.check(&CellValue::from("42"), &col()).is_none());
        assert!(rule.check(&CellValue::Number(151.0), &col()).is_some());
        assert!(rule.check(&CellValue::Null, &col()).is_some());
        assert_eq!(rule.message(), "Must be between 0 and 150");
    }

    #[test]
    fn test_email_and_phone() {
        assert!(email().check(&CellValue::from("a@b.co"), &col()).is_none());
        assert!(email().check(&CellValue::from("a@b"), &col()).is_some());
        assert!(phone().check(&CellValue::from("13812345678"), &col()).is_none());
        assert!(phone().check(&CellValue::from("12812345678"), &col()).is_some());
        assert!(phone().check(&CellValue::from("1381234567"), &col()).is_some());
    }

    #[test]
    fn test_pattern_and_custom_message() {
        let rule = pattern(Regex::new(r"^[A-Z]{3}$").unwrap()).with_message("Use a code");
        assert_eq!(
            rule.check(&CellValue::from("abc"), &col()).as_deref(),
            Some("Use a code")
        );

        let rule = custom(|v, _| {
            if v.to_text() == "bad" {
                Err("No bad values".to_string())
            } else {
                Ok(())
            }
        });
        assert_eq!(
            rule.check(&CellValue::from("bad"), &col()).as_deref(),
            Some("No bad values")
        );
        assert!(rule.check(&CellValue::from("good"), &col()).is_none());

        let rule = custom(|v, _| !v.is_null());
        assert_eq!(
            rule.check(&CellValue::Null, &col()).as_deref(),
            Some("Validation failed")
        );
    }

    #[test]
    fn test_structural_equality() {
        assert_eq!(min_length(2), min_length(2));
        assert_ne!(min_length(2), min_length(3));
        assert_ne!(required(), required().with_message("Needed"));
        assert_eq!(
            pattern(Regex::new("^x$").unwrap()),
            pattern(Regex::new("^x$").unwrap())
        );

        let a = custom(|_, _| true);
        let b = custom(|_, _| true);
        assert_eq!(a, a.clone());
        assert_ne!(a, b);
    }
}
