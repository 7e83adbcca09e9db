#![deny(rust_2018_idioms)]

pub mod app;
pub mod autosave;
pub mod domain;
pub mod form;
pub mod io;
pub mod validation;

pub use app::{BuilderOptions, FormBuilder, FormPreview, SubmitOutcome};
pub use autosave::{AutosaveController, SaveSink};
pub use domain::{FieldId, FieldSchema, FieldType, FormDocument, ValidationRule, create_field};
pub use form::{BuilderCommand, FieldPatch};
pub use validation::{FormValues, ValidationError, validate_field, validate_form};

pub mod prelude {
    pub use super::{
        BuilderCommand, BuilderOptions, FieldId, FieldPatch, FieldSchema, FieldType,
        FormBuilder, FormDocument, FormPreview, FormValues, SaveSink, SubmitOutcome,
        ValidationError, ValidationRule, create_field, validate_field, validate_form,
    };
}
