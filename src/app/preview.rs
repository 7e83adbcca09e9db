use serde_json::Value;
use tracing::{debug, info};

use crate::domain::{FieldId, FieldSchema, FormDocument, FormSettings};
use crate::validation::{
    FormValues, ValidationError, field_error, is_empty_value, validate_field, validate_form,
};

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Every field passed; carries the submitted values.
    Submitted(FormValues),
    /// Submission blocked until the listed errors are corrected.
    Blocked(Vec<ValidationError>),
    /// The form already accepted its single allowed submission.
    Closed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub completed: usize,
    pub total: usize,
}

impl Progress {
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.completed as f64 / self.total as f64
        }
    }
}

/// Fillable rendition of a form document.
#[derive(Debug, Clone)]
pub struct FormPreview {
    fields: Vec<FieldSchema>,
    settings: FormSettings,
    values: FormValues,
    errors: Vec<ValidationError>,
    submitted: bool,
}

impl FormPreview {
    pub fn new(document: &FormDocument) -> Self {
        Self {
            fields: document.fields.clone(),
            settings: document.settings.clone(),
            values: FormValues::new(),
            errors: Vec::new(),
            submitted: false,
        }
    }

    pub fn fields(&self) -> &[FieldSchema] {
        &self.fields
    }

    pub fn settings(&self) -> &FormSettings {
        &self.settings
    }

    pub fn values(&self) -> &FormValues {
        &self.values
    }

    pub fn value(&self, id: &FieldId) -> Option<&Value> {
        self.values.get(id)
    }

    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    pub fn field_error(&self, id: &FieldId) -> Option<&str> {
        field_error(&self.errors, id)
    }

    pub fn is_submitted(&self) -> bool {
        self.submitted
    }

    /// Record a value; outstanding errors for that field are cleared.
    pub fn set_value(&mut self, id: &FieldId, value: Value) {
        self.values.insert(id.clone(), value);
        self.errors.retain(|error| &error.field != id);
    }

    /// Re-validate one field on change, replacing its stored errors.
    pub fn check_field(&mut self, id: &FieldId) -> Vec<ValidationError> {
        let Some(field) = self.fields.iter().find(|field| &field.id == id) else {
            return Vec::new();
        };
        let fresh = validate_field(field, self.values.get(id));
        self.errors.retain(|error| &error.field != id);
        self.errors.extend(fresh.iter().cloned());
        let order: Vec<&FieldId> = self.fields.iter().map(|field| &field.id).collect();
        self.errors
            .sort_by_key(|error| order.iter().position(|id| *id == &error.field));
        fresh
    }

    pub fn submit(&mut self) -> SubmitOutcome {
        if self.submitted && !self.settings.allow_multiple_submissions {
            return SubmitOutcome::Closed;
        }
        let errors = validate_form(&self.fields, &self.values);
        if !errors.is_empty() {
            debug!(issues = errors.len(), "submission blocked");
            self.errors = errors.clone();
            return SubmitOutcome::Blocked(errors);
        }

        self.errors.clear();
        self.submitted = true;
        let submitted = if self.settings.allow_multiple_submissions {
            self.values.clone()
        } else {
            std::mem::take(&mut self.values)
        };
        info!(fields = submitted.len(), "form submitted");
        SubmitOutcome::Submitted(submitted)
    }

    /// Filled fields over all fields, in document order.
    pub fn progress(&self) -> Progress {
        let completed = self
            .fields
            .iter()
            .filter(|field| !is_empty_value(self.values.get(&field.id)))
            .count();
        Progress {
            completed,
            total: self.fields.len(),
        }
    }
}
