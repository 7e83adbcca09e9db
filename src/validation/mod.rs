//! Client-side validation of submitted values against field definitions.
//!
//! Failures are returned as data. Per field the order is: required, then the
//! type's own format, then authored rules in the order they were declared.

mod intrinsic;
mod rules;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::{FieldId, FieldSchema};

pub use intrinsic::{is_date, is_email, is_phone, is_url, parse_number};

/// Submitted values keyed by field id.
pub type FormValues = IndexMap<FieldId, Value>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    pub field: FieldId,
    pub message: String,
}

impl ValidationError {
    fn new(field: &FieldSchema, message: impl Into<String>) -> Self {
        Self {
            field: field.id.clone(),
            message: message.into(),
        }
    }
}

/// Whether a value counts as "not provided": absent, null, blank text or an
/// empty selection list.
pub fn is_empty_value(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(raw)) => raw.trim().is_empty(),
        Some(Value::Array(items)) => items.is_empty(),
        Some(_) => false,
    }
}

pub fn validate_field(field: &FieldSchema, value: Option<&Value>) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    if is_empty_value(value) {
        if field.required {
            errors.push(ValidationError::new(
                field,
                format!("{} is required", field.label),
            ));
        }
        return errors;
    }
    let Some(value) = value else {
        return errors;
    };

    if let Some(message) = intrinsic::type_error(field.kind, value) {
        errors.push(ValidationError::new(field, message));
    }

    errors.extend(
        field
            .validation
            .iter()
            .filter_map(|rule| rules::rule_error(field, value, rule))
            .map(|message| ValidationError::new(field, message)),
    );
    errors
}

/// Validate every field in order. The result preserves field order.
pub fn validate_form(fields: &[FieldSchema], values: &FormValues) -> Vec<ValidationError> {
    fields
        .iter()
        .flat_map(|field| validate_field(field, values.get(&field.id)))
        .collect()
}

pub fn has_validation_errors(errors: &[ValidationError]) -> bool {
    !errors.is_empty()
}

/// First message reported for `field`, if any.
pub fn field_error<'a>(errors: &'a [ValidationError], field: &FieldId) -> Option<&'a str> {
    errors
        .iter()
        .find(|error| &error.field == field)
        .map(|error| error.message.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FieldType, ValidationRule, create_field};
    use serde_json::json;

    fn field(kind: FieldType, required: bool, rules: Vec<ValidationRule>) -> FieldSchema {
        let mut field = create_field(kind);
        field.label = "Answer".into();
        field.required = required;
        field.validation = rules;
        field
    }

    fn messages(errors: &[ValidationError]) -> Vec<&str> {
        errors.iter().map(|error| error.message.as_str()).collect()
    }

    #[test]
    fn required_empty_short_circuits() {
        let f = field(
            FieldType::Text,
            true,
            vec![
                ValidationRule::min_length(5),
                ValidationRule::pattern(r"^\d+$"),
            ],
        );
        for value in [None, Some(json!("")), Some(json!("   ")), Some(json!(null))] {
            let errors = validate_field(&f, value.as_ref());
            assert_eq!(messages(&errors), ["Answer is required"]);
            assert_eq!(errors[0].field, f.id);
        }
    }

    #[test]
    fn optional_empty_is_silent() {
        let f = field(FieldType::Email, false, vec![ValidationRule::min_length(5)]);
        assert!(validate_field(&f, Some(&json!(""))).is_empty());
        assert!(validate_field(&f, None).is_empty());
    }

    #[test]
    fn rules_report_in_declaration_order() {
        let f = field(
            FieldType::Text,
            false,
            vec![
                ValidationRule::min_length(5),
                ValidationRule::pattern(r"^\d+$"),
            ],
        );
        let errors = validate_field(&f, Some(&json!("ab")));
        assert_eq!(
            messages(&errors),
            ["Minimum length is 5 characters", "Invalid format"]
        );
    }

    #[test]
    fn type_failure_does_not_stop_rules() {
        let f = field(
            FieldType::Email,
            false,
            vec![ValidationRule::max_length(3).with_message("Too long")],
        );
        let errors = validate_field(&f, Some(&json!("nope-nope")));
        assert_eq!(
            messages(&errors),
            ["Please enter a valid email address", "Too long"]
        );
    }

    #[test]
    fn range_rules_only_apply_to_parsed_numbers() {
        let f = field(
            FieldType::Number,
            false,
            vec![ValidationRule::min(18.0), ValidationRule::max(65.0)],
        );
        assert_eq!(
            messages(&validate_field(&f, Some(&json!("12")))),
            ["Minimum value is 18"]
        );
        assert_eq!(
            messages(&validate_field(&f, Some(&json!(70)))),
            ["Maximum value is 65"]
        );
        assert_eq!(
            messages(&validate_field(&f, Some(&json!("old")))),
            ["Please enter a valid number"]
        );
        assert!(validate_field(&f, Some(&json!("30"))).is_empty());
    }

    #[test]
    fn range_rules_ignored_on_text_fields() {
        let f = field(FieldType::Text, false, vec![ValidationRule::min(100.0)]);
        assert!(validate_field(&f, Some(&json!("5"))).is_empty());
    }

    #[test]
    fn length_counts_characters_not_bytes() {
        let f = field(FieldType::Text, false, vec![ValidationRule::max_length(3)]);
        assert!(validate_field(&f, Some(&json!("äöü"))).is_empty());
    }

    #[test]
    fn malformed_pattern_is_skipped_at_evaluation() {
        let f = field(FieldType::Text, false, vec![ValidationRule::pattern("(oops")]);
        assert!(validate_field(&f, Some(&json!("anything"))).is_empty());
    }

    #[test]
    fn pattern_is_a_search_not_a_full_match() {
        let f = field(FieldType::Text, false, vec![ValidationRule::pattern("[0-9]")]);
        assert!(validate_field(&f, Some(&json!("abc1"))).is_empty());
        assert_eq!(
            messages(&validate_field(&f, Some(&json!("abc")))),
            ["Invalid format"]
        );
    }

    #[test]
    fn empty_checkbox_selection_counts_as_missing() {
        let f = field(FieldType::Checkbox, true, Vec::new());
        assert_eq!(
            messages(&validate_field(&f, Some(&json!([])))),
            ["Answer is required"]
        );
        assert!(validate_field(&f, Some(&json!(["Option 1"]))).is_empty());
    }

    #[test]
    fn zero_is_a_present_number() {
        let f = field(FieldType::Number, true, Vec::new());
        assert!(validate_field(&f, Some(&json!(0))).is_empty());
    }

    #[test]
    fn form_validation_follows_field_order() {
        let mut first = field(FieldType::Text, true, Vec::new());
        first.label = "Name".into();
        let mut second = field(FieldType::Email, false, Vec::new());
        second.label = "Email".into();
        let mut values = FormValues::new();
        values.insert(second.id.clone(), json!("bad"));
        let errors = validate_form(&[first.clone(), second.clone()], &values);
        assert_eq!(
            messages(&errors),
            ["Name is required", "Please enter a valid email address"]
        );
        assert!(has_validation_errors(&errors));
        assert_eq!(field_error(&errors, &second.id), Some("Please enter a valid email address"));
        assert_eq!(field_error(&errors, &FieldId::from("other")), None);
    }
}
