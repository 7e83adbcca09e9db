use super::field::FieldId;
use super::rule::RuleKind;

/// A rule definition that can never be evaluated meaningfully.
#[derive(Debug, thiserror::Error)]
pub enum RuleError {
    #[error("field {field}: pattern `{pattern}` is not a valid regular expression")]
    InvalidPattern {
        field: FieldId,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("field {field}: `{kind}` rule requires a value")]
    MissingValue { field: FieldId, kind: RuleKind },

    #[error("field {field}: `{kind}` rule expects a number, found `{value}`")]
    NonNumericValue {
        field: FieldId,
        kind: RuleKind,
        value: String,
    },
}

/// A form document that violates a structural invariant.
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("field id `{0}` appears more than once")]
    DuplicateFieldId(FieldId),

    #[error(transparent)]
    Rule(#[from] RuleError),
}
