use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use serde_json::Value;
use tracing::debug;

use crate::domain::FormDocument;
use crate::validation::FormValues;

use super::{DocumentFormat, schema::check_document_value};

/// Parse structured data in any supported format into a `serde_json::Value`.
pub fn parse_document_str(contents: &str, format: DocumentFormat) -> Result<Value> {
    match format {
        DocumentFormat::Json => {
            serde_json::from_str::<Value>(contents).with_context(|| "failed to parse JSON document")
        }
        #[cfg(feature = "yaml")]
        DocumentFormat::Yaml => {
            serde_yaml::from_str::<Value>(contents).with_context(|| "failed to parse YAML document")
        }
        #[cfg(feature = "toml")]
        DocumentFormat::Toml => {
            toml::from_str::<Value>(contents).with_context(|| "failed to parse TOML document")
        }
    }
}

/// Parse and check a form document: shape first, then id uniqueness and
/// rule definitions.
pub fn parse_form_document(contents: &str, format: DocumentFormat) -> Result<FormDocument> {
    let value = parse_document_str(contents, format)?;
    form_document_from_value(value)
}

pub fn form_document_from_value(value: Value) -> Result<FormDocument> {
    check_document_value(&value)?;
    let document: FormDocument =
        serde_json::from_value(value).context("failed to decode form document")?;
    document.check().context("form document is inconsistent")?;
    debug!(document = %document.id, fields = document.fields.len(), "parsed form document");
    Ok(document)
}

/// Parse submitted values: an object keyed by field id.
pub fn parse_form_values(contents: &str, format: DocumentFormat) -> Result<FormValues> {
    let value = parse_document_str(contents, format)?;
    let Value::Object(map) = value else {
        bail!("form values must be an object keyed by field id");
    };
    Ok(map
        .into_iter()
        .map(|(id, value)| (id.into(), value))
        .collect())
}

pub fn read_form_document(path: impl AsRef<Path>) -> Result<FormDocument> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    parse_form_document(&contents, DocumentFormat::from_path(path)?)
        .with_context(|| format!("failed to load form from {}", path.display()))
}

pub fn read_form_values(path: impl AsRef<Path>) -> Result<FormValues> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    parse_form_values(&contents, DocumentFormat::from_path(path)?)
        .with_context(|| format!("failed to load values from {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FieldId, FieldType};
    use serde_json::json;

    fn sample_document() -> Value {
        json!({
            "id": "contact",
            "title": "Contact",
            "fields": [
                {
                    "id": "email",
                    "type": "email",
                    "label": "Email",
                    "required": true,
                    "properties": {"width": "half", "size": "medium", "style": {}}
                },
                {
                    "id": "age",
                    "type": "number",
                    "label": "Age",
                    "validation": [{"type": "min", "value": 18, "message": "Adults only"}],
                    "properties": {"width": "full", "size": "small", "style": {"textColor": "#333"}}
                }
            ],
            "theme": {"id": "minimal-gray", "name": "Minimal Gray"},
            "settings": {"submitButtonText": "Send"}
        })
    }

    #[test]
    fn parse_json_documents() {
        let raw = sample_document().to_string();
        let doc = parse_form_document(&raw, DocumentFormat::Json).unwrap();
        assert_eq!(doc.fields.len(), 2);
        assert_eq!(doc.fields[0].kind, FieldType::Email);
        assert_eq!(doc.fields[1].properties.style.text_color, "#333");
        assert_eq!(doc.fields[1].properties.style.padding, "");
        assert_eq!(doc.settings.submit_button_text, "Send");
        assert!(doc.settings.show_progress_bar, "missing settings use defaults");
        assert_eq!(doc.theme.id, "minimal-gray");
    }

    #[test]
    fn rejects_malformed_patterns_at_load() {
        let mut raw = sample_document();
        raw["fields"][0]["validation"] = json!([{"type": "pattern", "value": "(["}]);
        let err = form_document_from_value(raw).unwrap_err();
        assert!(format!("{err:#}").contains("not a valid regular expression"));
    }

    #[test]
    fn rejects_duplicate_field_ids() {
        let mut raw = sample_document();
        raw["fields"][1]["id"] = json!("email");
        let err = form_document_from_value(raw).unwrap_err();
        assert!(format!("{err:#}").contains("more than once"));
    }

    #[test]
    fn parses_values_keyed_by_field_id() {
        let values =
            parse_form_values(r#"{"email": "a@b.com", "age": 30}"#, DocumentFormat::Json).unwrap();
        assert_eq!(values.get(&FieldId::from("age")), Some(&json!(30)));
        assert!(parse_form_values("[1, 2]", DocumentFormat::Json).is_err());
    }

    #[cfg(feature = "yaml")]
    #[test]
    fn parse_yaml_documents() {
        let raw = "id: y\ntitle: Yaml form\nfields:\n  - id: name\n    type: text\n    label: Name\n";
        let doc = parse_form_document(raw, DocumentFormat::Yaml).unwrap();
        assert_eq!(doc.fields[0].label, "Name");
    }

    #[cfg(feature = "toml")]
    #[test]
    fn parse_toml_documents() {
        let raw = "id = \"t\"\ntitle = \"Toml form\"\n[[fields]]\nid = \"n\"\ntype = \"number\"\nlabel = \"N\"\n";
        let doc = parse_form_document(raw, DocumentFormat::Toml).unwrap();
        assert_eq!(doc.fields[0].kind, FieldType::Number);
    }

    #[cfg(feature = "toml")]
    #[test]
    fn parse_toml_values_tables() {
        let values = parse_form_values("email = \"a@b.com\"\nage = 30\n", DocumentFormat::Toml)
            .unwrap();
        assert_eq!(values.get(&FieldId::from("email")), Some(&json!("a@b.com")));
        assert_eq!(values.get(&FieldId::from("age")), Some(&json!(30)));
    }
}
