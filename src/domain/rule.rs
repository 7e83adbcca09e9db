use std::fmt;
use std::str::FromStr;

use regex::Regex;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::error::RuleError;
use super::field::FieldId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum RuleKind {
    Required,
    MinLength,
    MaxLength,
    Min,
    Max,
    Pattern,
}

impl RuleKind {
    pub const ALL: [RuleKind; 6] = [
        RuleKind::Required,
        RuleKind::MinLength,
        RuleKind::MaxLength,
        RuleKind::Min,
        RuleKind::Max,
        RuleKind::Pattern,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            RuleKind::Required => "required",
            RuleKind::MinLength => "minLength",
            RuleKind::MaxLength => "maxLength",
            RuleKind::Min => "min",
            RuleKind::Max => "max",
            RuleKind::Pattern => "pattern",
        }
    }

    fn expects_number(self) -> bool {
        matches!(
            self,
            RuleKind::MinLength | RuleKind::MaxLength | RuleKind::Min | RuleKind::Max
        )
    }
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RuleKind {
    type Err = UnknownRuleKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        RuleKind::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(needle))
            .ok_or_else(|| UnknownRuleKind(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown rule type '{0}'")]
pub struct UnknownRuleKind(pub String);

/// Rule argument: a bound for length/range rules, a regular expression for `pattern`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum RuleValue {
    Number(f64),
    Text(String),
}

impl RuleValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            RuleValue::Number(n) => Some(*n),
            RuleValue::Text(raw) => raw.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
        }
    }

    pub fn as_text(&self) -> String {
        match self {
            RuleValue::Number(_) => self.to_string(),
            RuleValue::Text(raw) => raw.clone(),
        }
    }
}

impl fmt::Display for RuleValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleValue::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => {
                write!(f, "{}", *n as i64)
            }
            RuleValue::Number(n) => write!(f, "{n}"),
            RuleValue::Text(raw) => f.write_str(raw),
        }
    }
}

/// A constraint attached to a field on top of its required/type checks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ValidationRule {
    #[serde(rename = "type")]
    pub kind: RuleKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<RuleValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ValidationRule {
    pub fn new(kind: RuleKind, value: Option<RuleValue>) -> Self {
        Self {
            kind,
            value,
            message: None,
        }
    }

    pub fn required() -> Self {
        Self::new(RuleKind::Required, None)
    }

    pub fn min_length(len: usize) -> Self {
        Self::new(RuleKind::MinLength, Some(RuleValue::Number(len as f64)))
    }

    pub fn max_length(len: usize) -> Self {
        Self::new(RuleKind::MaxLength, Some(RuleValue::Number(len as f64)))
    }

    pub fn min(bound: f64) -> Self {
        Self::new(RuleKind::Min, Some(RuleValue::Number(bound)))
    }

    pub fn max(bound: f64) -> Self {
        Self::new(RuleKind::Max, Some(RuleValue::Number(bound)))
    }

    pub fn pattern(pattern: impl Into<String>) -> Self {
        Self::new(RuleKind::Pattern, Some(RuleValue::Text(pattern.into())))
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// The author-supplied message, if any. Blank messages count as absent.
    pub fn custom_message(&self) -> Option<&str> {
        self.message
            .as_deref()
            .filter(|message| !message.trim().is_empty())
    }

    pub fn number(&self) -> Option<f64> {
        self.value.as_ref().and_then(RuleValue::as_number)
    }

    /// Compile the regular expression of a `pattern` rule.
    pub fn compile_pattern(&self, field: &FieldId) -> Result<Option<Regex>, RuleError> {
        if self.kind != RuleKind::Pattern {
            return Ok(None);
        }
        let Some(value) = &self.value else {
            return Err(RuleError::MissingValue {
                field: field.clone(),
                kind: self.kind,
            });
        };
        let pattern = value.as_text();
        Regex::new(&pattern)
            .map(Some)
            .map_err(|source| RuleError::InvalidPattern {
                field: field.clone(),
                pattern,
                source,
            })
    }

    /// Check the rule definition itself, independent of any user input.
    pub fn check(&self, field: &FieldId) -> Result<(), RuleError> {
        if self.kind.expects_number() {
            let Some(value) = &self.value else {
                return Err(RuleError::MissingValue {
                    field: field.clone(),
                    kind: self.kind,
                });
            };
            if value.as_number().is_none() {
                return Err(RuleError::NonNumericValue {
                    field: field.clone(),
                    kind: self.kind,
                    value: value.to_string(),
                });
            }
        }
        self.compile_pattern(field).map(|_| ())
    }
}

/// Check every rule of a field, stopping at the first malformed one.
pub fn check_rules(field: &FieldId, rules: &[ValidationRule]) -> Result<(), RuleError> {
    rules.iter().try_for_each(|rule| rule.check(field))
}
