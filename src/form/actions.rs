use crate::domain::{FieldId, FieldType, FormSettings, FormTheme};

use super::patch::FieldPatch;

/// Every edit a builder UI can request against a form document.
#[derive(Debug, Clone, PartialEq)]
pub enum BuilderCommand {
    AddField(FieldType),
    UpdateField {
        id: FieldId,
        patch: FieldPatch,
    },
    DeleteField(FieldId),
    ReorderFields {
        from: usize,
        to: usize,
    },
    /// Drag gesture resolved to the dragged field and the field it was dropped on.
    MoveField {
        active: FieldId,
        over: FieldId,
    },
    DuplicateField(FieldId),
    SetTheme(FormTheme),
    UpdateSettings(FormSettings),
    UpdateDetails {
        title: Option<String>,
        description: Option<String>,
    },
}
