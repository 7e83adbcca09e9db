use regex::Regex;
use serde_json::Value;
use tracing::warn;

use crate::domain::{FieldSchema, FieldType, RuleKind, ValidationRule};

use super::intrinsic::parse_number;

/// Evaluate one authored rule against a present value.
pub(super) fn rule_error(
    field: &FieldSchema,
    value: &Value,
    rule: &ValidationRule,
) -> Option<String> {
    let failed = match rule.kind {
        RuleKind::Required => false,
        RuleKind::MinLength => (char_len(value)? as f64) < limit(field, rule)?,
        RuleKind::MaxLength => (char_len(value)? as f64) > limit(field, rule)?,
        RuleKind::Min => numeric(field, value)? < limit(field, rule)?,
        RuleKind::Max => numeric(field, value)? > limit(field, rule)?,
        RuleKind::Pattern => {
            let raw = value.as_str()?;
            !pattern(field, rule)?.is_match(raw)
        }
    };
    failed.then(|| message(rule))
}

fn message(rule: &ValidationRule) -> String {
    if let Some(custom) = rule.custom_message() {
        return custom.to_string();
    }
    let bound = rule
        .value
        .as_ref()
        .map(ToString::to_string)
        .unwrap_or_default();
    match rule.kind {
        RuleKind::MinLength => format!("Minimum length is {bound} characters"),
        RuleKind::MaxLength => format!("Maximum length is {bound} characters"),
        RuleKind::Min => format!("Minimum value is {bound}"),
        RuleKind::Max => format!("Maximum value is {bound}"),
        RuleKind::Pattern | RuleKind::Required => "Invalid format".to_string(),
    }
}

fn char_len(value: &Value) -> Option<usize> {
    value.as_str().map(|raw| raw.chars().count())
}

/// `min`/`max` only apply to number fields holding a parseable value; an
/// unparseable one is already reported by the type check.
fn numeric(field: &FieldSchema, value: &Value) -> Option<f64> {
    if field.kind != FieldType::Number {
        return None;
    }
    parse_number(value)
}

fn limit(field: &FieldSchema, rule: &ValidationRule) -> Option<f64> {
    let limit = rule.number();
    if limit.is_none() {
        warn!(field = %field.id, rule = %rule.kind, "skipping rule without a numeric value");
    }
    limit
}

fn pattern(field: &FieldSchema, rule: &ValidationRule) -> Option<Regex> {
    match rule.compile_pattern(&field.id) {
        Ok(regex) => regex,
        Err(err) => {
            warn!(error = %err, "skipping malformed pattern rule");
            None
        }
    }
}
