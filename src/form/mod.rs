mod actions;
pub mod fields;
mod patch;
mod reducers;

pub use actions::BuilderCommand;
pub use patch::{FieldPatch, PropertiesPatch, StylePatch};
pub use reducers::{Applied, apply_command};
