//! Data validation
//!
//! Provides:
//! - Type conformance checks against declared column types
//! - A per-column rule registry ([`DataValidator`])
//! - Built-in rule factories ([`rules`])

pub mod report;
pub mod rules;
pub mod validator;

pub use report::{CellError, ValidationReport};
pub use rules::{RuleKind, RuleOutcome, ValidationRule};
pub use validator::DataValidator;
