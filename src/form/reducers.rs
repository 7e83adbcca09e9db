use tracing::warn;

use crate::domain::{FieldId, FormDocument, check_rules, create_field};

use super::{actions::BuilderCommand, fields};

/// Result of applying a command: the next document plus what it created.
#[derive(Debug, Clone)]
pub struct Applied {
    pub document: FormDocument,
    pub created: Option<FieldId>,
    pub changed: bool,
}

/// Apply `command` to `document`, producing a new document.
///
/// Field updates carrying a malformed rule leave the document unchanged.
pub fn apply_command(document: &FormDocument, command: BuilderCommand) -> Applied {
    let mut next = document.clone();
    let mut created = None;
    match command {
        BuilderCommand::AddField(kind) => {
            let field = create_field(kind);
            created = Some(field.id.clone());
            next.fields = fields::append(&document.fields, field);
        }
        BuilderCommand::UpdateField { id, patch } => {
            match patch.validation.as_deref().map(|rules| check_rules(&id, rules)) {
                Some(Err(err)) => warn!(error = %err, "rule edit refused"),
                _ => next.fields = fields::update(&document.fields, &id, &patch),
            }
        }
        BuilderCommand::DeleteField(id) => {
            next.fields = fields::delete(&document.fields, &id);
        }
        BuilderCommand::ReorderFields { from, to } => {
            next.fields = fields::move_index(&document.fields, from, to);
        }
        BuilderCommand::MoveField { active, over } => {
            next.fields = fields::move_by_id(&document.fields, &active, &over);
        }
        BuilderCommand::DuplicateField(id) => {
            let (updated, copy) = fields::duplicate(&document.fields, &id);
            next.fields = updated;
            created = copy;
        }
        BuilderCommand::SetTheme(theme) => next.theme = theme,
        BuilderCommand::UpdateSettings(settings) => next.settings = settings,
        BuilderCommand::UpdateDetails { title, description } => {
            if let Some(title) = title {
                next.title = title;
            }
            if let Some(description) = description {
                next.description = description;
            }
        }
    }
    let changed = &next != document;
    Applied {
        document: next,
        created: created.filter(|_| changed),
        changed,
    }
}
