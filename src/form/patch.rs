use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::{
    FieldProperties, FieldSchema, FieldSize, FieldStyle, FieldWidth, ValidationRule,
};

/// Partial update of a field. Supplied keys overwrite, absent keys are kept.
///
/// `id` and `type` are not patchable. `properties` and its `style` are merged
/// one level at a time rather than replaced.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FieldPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// An empty string clears the placeholder.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validation: Option<Vec<ValidationRule>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<PropertiesPatch>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PropertiesPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<FieldWidth>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<FieldSize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<StylePatch>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StylePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_radius: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_weight: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub padding: Option<String>,
}

impl FieldPatch {
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    pub fn with_required(mut self, required: bool) -> Self {
        self.required = Some(required);
        self
    }

    pub fn with_validation(mut self, rules: Vec<ValidationRule>) -> Self {
        self.validation = Some(rules);
        self
    }

    pub fn with_options(mut self, options: Vec<String>) -> Self {
        self.options = Some(options);
        self
    }

    pub fn with_properties(mut self, properties: PropertiesPatch) -> Self {
        self.properties = Some(properties);
        self
    }

    pub fn is_empty(&self) -> bool {
        self == &FieldPatch::default()
    }

    pub fn apply_to(&self, field: &mut FieldSchema) {
        if let Some(label) = &self.label {
            field.label = label.clone();
        }
        if let Some(placeholder) = &self.placeholder {
            field.placeholder = (!placeholder.is_empty()).then(|| placeholder.clone());
        }
        if let Some(required) = self.required {
            field.required = required;
        }
        if let Some(rules) = &self.validation {
            field.validation = rules.clone();
        }
        if let Some(options) = &self.options {
            if field.kind.has_options() {
                field.options = options.clone();
            } else {
                debug!(field = %field.id, kind = %field.kind, "ignoring options patch");
            }
        }
        if let Some(properties) = &self.properties {
            properties.apply_to(&mut field.properties);
        }
    }
}

impl PropertiesPatch {
    pub fn width(width: FieldWidth) -> Self {
        Self {
            width: Some(width),
            ..Self::default()
        }
    }

    pub fn size(size: FieldSize) -> Self {
        Self {
            size: Some(size),
            ..Self::default()
        }
    }

    pub fn style(style: StylePatch) -> Self {
        Self {
            style: Some(style),
            ..Self::default()
        }
    }

    pub fn apply_to(&self, properties: &mut FieldProperties) {
        if let Some(width) = self.width {
            properties.width = width;
        }
        if let Some(size) = self.size {
            properties.size = size;
        }
        if let Some(style) = &self.style {
            style.apply_to(&mut properties.style);
        }
    }
}

impl StylePatch {
    pub fn apply_to(&self, style: &mut FieldStyle) {
        let slots = [
            (&self.background_color, &mut style.background_color),
            (&self.text_color, &mut style.text_color),
            (&self.border_color, &mut style.border_color),
            (&self.border_radius, &mut style.border_radius),
            (&self.font_size, &mut style.font_size),
            (&self.font_weight, &mut style.font_weight),
            (&self.padding, &mut style.padding),
        ];
        for (patch, slot) in slots {
            if let Some(value) = patch {
                *slot = value.clone();
            }
        }
    }
}
