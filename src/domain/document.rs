use std::collections::HashSet;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::DocumentError;
use super::field::{FieldId, FieldSchema};
use super::rule::check_rules;
use super::theme::FormTheme;

pub const DEFAULT_TITLE: &str = "Untitled Form";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct FormSettings {
    pub submit_button_text: String,
    pub success_message: String,
    pub allow_multiple_submissions: bool,
    pub show_progress_bar: bool,
    pub enable_auto_save: bool,
}

impl Default for FormSettings {
    fn default() -> Self {
        Self {
            submit_button_text: "Submit".to_string(),
            success_message: "Thank you for your submission!".to_string(),
            allow_multiple_submissions: false,
            show_progress_bar: true,
            enable_auto_save: true,
        }
    }
}

/// The complete, serializable description of a form.
///
/// `fields` order is the render and tab order; there is no separate position
/// attribute on fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct FormDocument {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default)]
    pub fields: Vec<FieldSchema>,
    #[serde(default)]
    pub theme: FormTheme,
    #[serde(default)]
    pub settings: FormSettings,
}

impl Default for FormDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl FormDocument {
    /// An empty document with a fresh id, default theme and default settings.
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title: DEFAULT_TITLE.to_string(),
            description: String::new(),
            fields: Vec::new(),
            theme: FormTheme::default(),
            settings: FormSettings::default(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn field(&self, id: &FieldId) -> Option<&FieldSchema> {
        self.fields.iter().find(|field| &field.id == id)
    }

    pub fn position(&self, id: &FieldId) -> Option<usize> {
        self.fields.iter().position(|field| &field.id == id)
    }

    /// Verify id uniqueness and that every rule definition is usable.
    pub fn check(&self) -> Result<(), DocumentError> {
        let mut seen = HashSet::with_capacity(self.fields.len());
        for field in &self.fields {
            if !seen.insert(&field.id) {
                return Err(DocumentError::DuplicateFieldId(field.id.clone()));
            }
            check_rules(&field.id, &field.validation)?;
        }
        Ok(())
    }
}
