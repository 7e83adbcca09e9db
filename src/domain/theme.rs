use indexmap::IndexMap;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

pub const DEFAULT_THEME_ID: &str = "modern-blue";

/// Theme attached to a document. Only identity is modelled; the design
/// tokens (colors, typography, spacing...) are carried through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FormTheme {
    pub id: String,
    pub name: String,
    #[serde(flatten)]
    pub tokens: IndexMap<String, Value>,
}

impl FormTheme {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            tokens: IndexMap::new(),
        }
    }

    pub fn with_token(mut self, key: impl Into<String>, value: Value) -> Self {
        self.tokens.insert(key.into(), value);
        self
    }

    /// Built-in themes in palette order.
    pub fn catalogue() -> Vec<FormTheme> {
        [
            ("modern-blue", "Modern Blue", "#3b82f6", "#1e293b"),
            ("elegant-purple", "Elegant Purple", "#8b5cf6", "#111827"),
            ("minimal-gray", "Minimal Gray", "#374151", "#111827"),
            ("vibrant-orange", "Vibrant Orange", "#ea580c", "#1c1917"),
        ]
        .into_iter()
        .map(|(id, name, primary, text)| {
            FormTheme::new(id, name).with_token(
                "colors",
                json!({
                    "primary": primary,
                    "background": "#ffffff",
                    "text": text,
                }),
            )
        })
        .collect()
    }

    pub fn builtin(id: &str) -> Option<FormTheme> {
        Self::catalogue().into_iter().find(|theme| theme.id == id)
    }
}

impl Default for FormTheme {
    fn default() -> Self {
        Self::builtin(DEFAULT_THEME_ID)
            .unwrap_or_else(|| FormTheme::new(DEFAULT_THEME_ID, "Modern Blue"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_theme_is_modern_blue() {
        let theme = FormTheme::default();
        assert_eq!(theme.id, "modern-blue");
        assert_eq!(theme.tokens["colors"]["primary"], json!("#3b82f6"));
    }

    #[test]
    fn unknown_tokens_survive_round_trip() {
        let raw = json!({
            "id": "custom",
            "name": "Custom",
            "spacing": {"md": "1rem"},
            "colors": {"primary": "#000"}
        });
        let theme: FormTheme = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(theme.tokens.len(), 2);
        assert_eq!(serde_json::to_value(&theme).unwrap(), raw);
    }

    #[test]
    fn builtin_lookup_misses_unknown_ids() {
        assert!(FormTheme::builtin("elegant-purple").is_some());
        assert!(FormTheme::builtin("neon").is_none());
    }
}
