use std::borrow::Borrow;
use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::rule::ValidationRule;

const DEFAULT_OPTIONS: [&str; 3] = ["Option 1", "Option 2", "Option 3"];

/// Opaque, never reused identifier of a field inside a form document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct FieldId(String);

impl FieldId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FieldId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for FieldId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl AsRef<str> for FieldId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for FieldId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// The closed set of field types a form can contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Text,
    Email,
    Number,
    Phone,
    Url,
    Textarea,
    Select,
    Radio,
    Checkbox,
    Date,
    File,
}

impl FieldType {
    pub const ALL: [FieldType; 11] = [
        FieldType::Text,
        FieldType::Email,
        FieldType::Number,
        FieldType::Phone,
        FieldType::Url,
        FieldType::Textarea,
        FieldType::Select,
        FieldType::Radio,
        FieldType::Checkbox,
        FieldType::Date,
        FieldType::File,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            FieldType::Text => "text",
            FieldType::Email => "email",
            FieldType::Number => "number",
            FieldType::Phone => "phone",
            FieldType::Url => "url",
            FieldType::Textarea => "textarea",
            FieldType::Select => "select",
            FieldType::Radio => "radio",
            FieldType::Checkbox => "checkbox",
            FieldType::Date => "date",
            FieldType::File => "file",
        }
    }

    /// Only choice fields carry a meaningful `options` list.
    pub fn has_options(self) -> bool {
        matches!(
            self,
            FieldType::Select | FieldType::Radio | FieldType::Checkbox
        )
    }

    pub fn default_label(self) -> String {
        let mut name = self.as_str().to_string();
        name[..1].make_ascii_uppercase();
        format!("{name} Field")
    }

    pub fn default_placeholder(self) -> String {
        format!("Enter {}", self.as_str())
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownFieldType(pub String);

impl fmt::Display for UnknownFieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let known = FieldType::ALL
            .iter()
            .map(|kind| kind.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        write!(f, "unknown field type '{}' (expected one of: {known})", self.0)
    }
}

impl std::error::Error for UnknownFieldType {}

impl FromStr for FieldType {
    type Err = UnknownFieldType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        FieldType::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(needle))
            .ok_or_else(|| UnknownFieldType(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum FieldWidth {
    #[default]
    Full,
    Half,
    Third,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum FieldSize {
    Small,
    #[default]
    Medium,
    Large,
}

/// Per-field style overrides. Every key is always present; empty means "use the theme".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct FieldStyle {
    pub background_color: String,
    pub text_color: String,
    pub border_color: String,
    pub border_radius: String,
    pub font_size: String,
    pub font_weight: String,
    pub padding: String,
}

/// Layout and style bag consumed by renderers only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct FieldProperties {
    pub width: FieldWidth,
    pub size: FieldSize,
    pub style: FieldStyle,
}

/// One input element of a form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct FieldSchema {
    pub id: FieldId,
    #[serde(rename = "type")]
    pub kind: FieldType,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub validation: Vec<ValidationRule>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
    #[serde(default)]
    pub properties: FieldProperties,
}

impl FieldSchema {
    /// Options as seen by renderers and validators; always empty for non-choice types.
    pub fn choices(&self) -> &[String] {
        if self.kind.has_options() {
            &self.options
        } else {
            &[]
        }
    }

    /// A copy of this field with a fresh id and a `(Copy)` label suffix.
    pub fn duplicate(&self) -> Self {
        Self {
            id: FieldId::generate(),
            label: format!("{} (Copy)", self.label),
            ..self.clone()
        }
    }
}

/// Build a field of `kind` with every property populated.
///
/// This is the only way fields enter a document, so renderers can rely on
/// `properties.style` carrying every key.
pub fn create_field(kind: FieldType) -> FieldSchema {
    let options = if kind.has_options() {
        DEFAULT_OPTIONS.iter().map(|opt| opt.to_string()).collect()
    } else {
        Vec::new()
    };

    FieldSchema {
        id: FieldId::generate(),
        kind,
        label: kind.default_label(),
        placeholder: Some(kind.default_placeholder()),
        required: false,
        validation: Vec::new(),
        options,
        properties: FieldProperties::default(),
    }
}
