mod document;
mod error;
mod field;
mod rule;
mod theme;

pub use document::{DEFAULT_TITLE, FormDocument, FormSettings};
pub use error::{DocumentError, RuleError};
pub use field::{
    FieldId, FieldProperties, FieldSchema, FieldSize, FieldStyle, FieldType, FieldWidth,
    UnknownFieldType, create_field,
};
pub use rule::{RuleKind, RuleValue, UnknownRuleKind, ValidationRule, check_rules};
pub use theme::{DEFAULT_THEME_ID, FormTheme};
