mod format;
mod input;
mod output;
mod schema;

pub use format::DocumentFormat;
pub use input::{
    form_document_from_value, parse_document_str, parse_form_document, parse_form_values,
    read_form_document, read_form_values,
};
pub use output::{OutputDestination, OutputOptions, emit};
pub use schema::{check_document_value, document_schema};
