//! Validation tests

use regex::Regex;
use table_interchange::models::{CellValue, Column, DataType, Row, TableSnapshot};
use table_interchange::validation::{DataValidator, RuleOutcome, rules};

fn snapshot() -> TableSnapshot {
    TableSnapshot::new(
        vec![
            Column::new("name", "Name").with_type(DataType::String),
            Column::new("email", "Email"),
            Column::new("age", "Age").with_type(DataType::Number),
        ],
        vec![
            Row::at(0)
                .with("name", "Alice")
                .with("email", "alice@example.com")
                .with("age", 30.0),
            Row::at(1).with("email", "not-an-email").with("age", "x"),
        ],
    )
}

mod report_tests {
    use super::*;

    #[test]
    fn test_clean_snapshot_is_valid() {
        let report = DataValidator::new()
            .with_rule("email", rules::email())
            .validate(&TableSnapshot::new(
                snapshot().columns,
                vec![snapshot().rows[0].clone()],
            ));
        assert!(report.valid);
        assert!(report.errors.is_empty());
    }

    #[test]
    fn test_two_violations_give_two_errors() {
        let validator = DataValidator::new()
            .with_rule("name", rules::required())
            .with_rule("email", rules::email());

        let report = validator.validate(&snapshot());

        assert!(!report.valid);
        // required name, email shape, age type
        assert_eq!(report.error_count(), 3);
        assert_eq!(report.errors_for("name").count(), 1);
        assert_eq!(report.errors_for("email").count(), 1);
        assert!(report.errors.iter().all(|e| e.row_index == 1));
    }

    #[test]
    fn test_same_cell_accumulates_every_failure() {
        let column = Column::new("code", "Code").with_type(DataType::Number);
        let validator = DataValidator::new()
            .with_rule("code", rules::min_length(3))
            .with_rule("code", rules::pattern(Regex::new(r"^\d+$").unwrap()));

        let errors = validator.validate_cell(&CellValue::from("ab"), &column, 5);
        let messages: Vec<&str> = errors.iter().map(|e| e.message.as_str()).collect();
        assert_eq!(
            messages,
            vec![
                "Must be a valid number",
                "Must be at least 3 characters",
                "Invalid format"
            ]
        );
        assert!(errors.iter().all(|e| e.row_index == 5));
    }

    #[test]
    fn test_validate_is_idempotent() {
        let validator = DataValidator::new()
            .with_rule("name", rules::required())
            .with_rule("age", rules::range(0.0, 120.0));
        let data = snapshot();

        let first = validator.validate(&data);
        let second = validator.validate(&data);
        assert_eq!(first, second);
        assert_eq!(data, snapshot());
    }
}

mod rule_tests {
    use super::*;

    #[test]
    fn test_custom_rule_messages() {
        let column = Column::new("age", "Age");
        let validator = DataValidator::new()
            .with_rule(
                "age",
                rules::custom(|v, _| match v {
                    CellValue::Number(n) if *n >= 18.0 => RuleOutcome::Pass,
                    CellValue::Number(_) => RuleOutcome::FailWith("Must be an adult".into()),
                    _ => RuleOutcome::Fail,
                })
                .with_message("Age missing"),
            );

        let messages = |v: CellValue| -> Vec<String> {
            validator
                .validate_cell(&v, &column, 0)
                .into_iter()
                .map(|e| e.message)
                .collect()
        };

        assert!(messages(CellValue::Number(30.0)).is_empty());
        assert_eq!(messages(CellValue::Number(12.0)), vec!["Must be an adult"]);
        assert_eq!(messages(CellValue::Null), vec!["Age missing"]);
    }

    #[test]
    fn test_remove_rule_then_clear() {
        let email = rules::email();
        let mut validator = DataValidator::new();
        validator.add_rule("email", rules::required());
        validator.add_rule("email", email.clone());

        validator.remove_rule("email", Some(&email));
        assert_eq!(validator.rules("email"), &[rules::required()]);

        validator.remove_rule("email", None);
        assert!(validator.rules("email").is_empty());
        assert!(validator.validate(&snapshot()).errors_for("email").next().is_none());
    }

    #[test]
    fn test_phone_rule() {
        let column = Column::new("phone", "Phone");
        let validator = DataValidator::new().with_rule("phone", rules::phone());

        assert!(
            validator
                .validate_cell(&CellValue::from("13912345678"), &column, 0)
                .is_empty()
        );
        assert_eq!(
            validator.validate_cell(&CellValue::from("555-1234"), &column, 0)[0].message,
            "Must be a valid phone number"
        );
    }
}
