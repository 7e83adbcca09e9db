use std::sync::LazyLock;

use anyhow::{Result, anyhow};
use jsonschema::Validator;
use schemars::schema_for;
use serde_json::Value;

use crate::domain::FormDocument;

static DOCUMENT_VALIDATOR: LazyLock<Result<Validator, String>> = LazyLock::new(|| {
    jsonschema::validator_for(&document_schema()).map_err(|err| err.to_string())
});

/// JSON Schema describing the serialized form document.
pub fn document_schema() -> Value {
    serde_json::to_value(schema_for!(FormDocument)).unwrap_or(Value::Bool(true))
}

/// Check a raw document value against [`document_schema`], reporting every
/// violation with its JSON pointer.
pub fn check_document_value(value: &Value) -> Result<()> {
    let validator = DOCUMENT_VALIDATOR
        .as_ref()
        .map_err(|err| anyhow!("failed to compile document schema: {err}"))?;
    let issues = validator
        .iter_errors(value)
        .map(|error| {
            let pointer = error.instance_path.to_string();
            let prefix = if pointer.is_empty() {
                "<root>".to_string()
            } else {
                pointer
            };
            format!("{prefix}: {error}")
        })
        .collect::<Vec<_>>();
    if issues.is_empty() {
        Ok(())
    } else {
        Err(anyhow!("invalid form document:\n  {}", issues.join("\n  ")))
    }
}
