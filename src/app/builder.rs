use std::time::Instant;

use anyhow::Result;
use tracing::{debug, info, warn};

use crate::autosave::{AutosaveController, SaveSink};
use crate::domain::{
    DocumentError, FieldId, FieldSchema, FieldType, FormDocument, FormSettings, FormTheme,
    RuleError, ValidationRule, check_rules,
};
use crate::form::{Applied, BuilderCommand, FieldPatch, apply_command};

use super::{options::BuilderOptions, preview::FormPreview, status::StatusLine};

/// Editing session over one form document.
///
/// Owns the document, the UI selection and the autosave controller. Every
/// edit goes through [`FormBuilder::dispatch_at`]; only edits that actually
/// change the document mark it dirty.
pub struct FormBuilder<S> {
    document: FormDocument,
    selected: Option<FieldId>,
    autosave: AutosaveController,
    options: BuilderOptions,
    status: StatusLine,
    sink: S,
}

enum EditKind {
    Created { duplicate: bool },
    Deleted(FieldId),
    Other,
}

impl EditKind {
    fn of(command: &BuilderCommand) -> Self {
        match command {
            BuilderCommand::AddField(_) => EditKind::Created { duplicate: false },
            BuilderCommand::DuplicateField(_) => EditKind::Created { duplicate: true },
            BuilderCommand::DeleteField(id) => EditKind::Deleted(id.clone()),
            _ => EditKind::Other,
        }
    }
}

impl<S: SaveSink> FormBuilder<S> {
    pub fn new(options: BuilderOptions, sink: S) -> Self {
        let document = FormDocument::new();
        let autosave = AutosaveController::new(options.autosave_delay)
            .with_enabled(options.autosave && document.settings.enable_auto_save);
        Self {
            document,
            selected: None,
            autosave,
            options,
            status: StatusLine::new(),
            sink,
        }
    }

    /// Start a session from an existing document.
    pub fn with_document(
        document: FormDocument,
        options: BuilderOptions,
        sink: S,
    ) -> Result<Self, DocumentError> {
        let mut builder = Self::new(options, sink);
        builder.load_at(document, None)?;
        Ok(builder)
    }

    pub fn document(&self) -> &FormDocument {
        &self.document
    }

    pub fn options(&self) -> &BuilderOptions {
        &self.options
    }

    pub fn status(&self) -> &StatusLine {
        &self.status
    }

    pub fn field(&self, id: &FieldId) -> Option<&FieldSchema> {
        self.document.field(id)
    }

    pub fn selected_id(&self) -> Option<&FieldId> {
        self.selected.as_ref()
    }

    pub fn selected_field(&self) -> Option<&FieldSchema> {
        self.selected.as_ref().and_then(|id| self.document.field(id))
    }

    /// Select a field for editing; unknown ids clear the selection.
    pub fn select_field(&mut self, id: Option<FieldId>) {
        self.selected = id.filter(|id| self.document.field(id).is_some());
    }

    pub fn is_dirty(&self) -> bool {
        self.autosave.is_dirty()
    }

    pub fn last_saved(&self) -> Option<Instant> {
        self.autosave.last_saved()
    }

    pub fn next_autosave(&self) -> Option<Instant> {
        self.autosave.next_deadline()
    }

    pub fn dispatch(&mut self, command: BuilderCommand) -> Applied {
        self.dispatch_at(command, Instant::now())
    }

    /// Apply `command` as of `now`, notifying autosave when the document changed.
    ///
    /// A field update carrying a malformed rule is refused and leaves the
    /// document unchanged; use [`FormBuilder::try_dispatch_at`] to get the error.
    pub fn dispatch_at(&mut self, command: BuilderCommand, now: Instant) -> Applied {
        self.try_dispatch_at(command, now)
            .unwrap_or_else(|_| Applied {
                document: self.document.clone(),
                created: None,
                changed: false,
            })
    }

    pub fn try_dispatch(&mut self, command: BuilderCommand) -> Result<Applied, RuleError> {
        self.try_dispatch_at(command, Instant::now())
    }

    /// Like [`FormBuilder::dispatch_at`], but reports rejected rule definitions.
    pub fn try_dispatch_at(
        &mut self,
        command: BuilderCommand,
        now: Instant,
    ) -> Result<Applied, RuleError> {
        if let BuilderCommand::UpdateField { id, patch } = &command
            && let Some(rules) = &patch.validation
            && let Err(err) = check_rules(id, rules)
        {
            warn!(error = %err, "rule edit refused");
            self.status.set_raw(err.to_string());
            return Err(err);
        }
        Ok(self.apply_at(command, now))
    }

    fn apply_at(&mut self, command: BuilderCommand, now: Instant) -> Applied {
        let edit = EditKind::of(&command);
        let applied = apply_command(&self.document, command);
        if !applied.changed {
            debug!("command left the document unchanged");
            self.status.unchanged();
            return applied;
        }

        self.document = applied.document.clone();
        self.sync_autosave_flag();
        self.autosave.notify_change(&self.document, now);

        match edit {
            EditKind::Created { duplicate } => {
                if let Some(field) = applied.created.as_ref().and_then(|id| self.document.field(id)) {
                    if duplicate {
                        self.status.field_duplicated(&field.label);
                    } else {
                        self.status.field_added(&field.label);
                    }
                    if self.options.select_new_fields {
                        self.selected = Some(field.id.clone());
                    }
                }
            }
            EditKind::Deleted(id) => {
                if self.selected.as_ref() == Some(&id) {
                    self.selected = None;
                }
                self.status.field_removed();
            }
            EditKind::Other => self.status.value_updated(),
        }
        applied
    }

    /// Append a field of `kind`; returns its id when it was added.
    pub fn add_field(&mut self, kind: FieldType) -> Option<FieldId> {
        self.dispatch(BuilderCommand::AddField(kind)).created
    }

    /// Patch a field. Rules in the patch are checked first; a malformed one
    /// rejects the whole patch.
    pub fn update_field(&mut self, id: &FieldId, patch: FieldPatch) -> Result<bool, RuleError> {
        self.try_dispatch(BuilderCommand::UpdateField {
            id: id.clone(),
            patch,
        })
        .map(|applied| applied.changed)
    }

    /// Replace a field's rules after checking every rule definition.
    pub fn set_field_rules(
        &mut self,
        id: &FieldId,
        rules: Vec<ValidationRule>,
    ) -> Result<bool, RuleError> {
        self.update_field(id, FieldPatch::default().with_validation(rules))
    }

    /// Append one checked rule to a field's rules.
    pub fn add_field_rule(&mut self, id: &FieldId, rule: ValidationRule) -> Result<bool, RuleError> {
        let Some(field) = self.document.field(id) else {
            return Ok(false);
        };
        let mut rules = field.validation.clone();
        rules.push(rule);
        self.set_field_rules(id, rules)
    }

    pub fn delete_field(&mut self, id: &FieldId) -> bool {
        self.dispatch(BuilderCommand::DeleteField(id.clone()))
            .changed
    }

    pub fn reorder_fields(&mut self, from: usize, to: usize) -> bool {
        self.dispatch(BuilderCommand::ReorderFields { from, to })
            .changed
    }

    pub fn move_field(&mut self, active: &FieldId, over: &FieldId) -> bool {
        self.dispatch(BuilderCommand::MoveField {
            active: active.clone(),
            over: over.clone(),
        })
        .changed
    }

    pub fn duplicate_field(&mut self, id: &FieldId) -> Option<FieldId> {
        self.dispatch(BuilderCommand::DuplicateField(id.clone()))
            .created
    }

    pub fn update_theme(&mut self, theme: FormTheme) -> bool {
        self.dispatch(BuilderCommand::SetTheme(theme)).changed
    }

    pub fn update_settings(&mut self, settings: FormSettings) -> bool {
        self.dispatch(BuilderCommand::UpdateSettings(settings))
            .changed
    }

    pub fn update_details(&mut self, title: Option<String>, description: Option<String>) -> bool {
        self.dispatch(BuilderCommand::UpdateDetails { title, description })
            .changed
    }

    /// Replace the whole document. The loaded state counts as saved.
    pub fn load(&mut self, document: FormDocument) -> Result<(), DocumentError> {
        self.load_at(document, Some(Instant::now()))
    }

    fn load_at(
        &mut self,
        document: FormDocument,
        saved_at: Option<Instant>,
    ) -> Result<(), DocumentError> {
        document.check()?;
        info!(document = %document.id, fields = document.fields.len(), "loaded form document");
        self.status.loaded(&document.title);
        self.document = document;
        self.selected = None;
        self.autosave.reset(saved_at);
        self.sync_autosave_flag();
        Ok(())
    }

    /// Discard the document and start over with a fresh, never-saved one.
    pub fn reset(&mut self) {
        self.document = FormDocument::new();
        self.selected = None;
        self.autosave.reset(None);
        self.sync_autosave_flag();
        self.status.ready();
        info!(document = %self.document.id, "form reset");
    }

    pub fn save(&mut self) -> Result<()> {
        self.save_at(Instant::now())
    }

    /// Save immediately, bypassing the debounce.
    pub fn save_at(&mut self, now: Instant) -> Result<()> {
        let result = self
            .autosave
            .save_now(&self.document, now, &mut self.sink);
        match &result {
            Ok(()) => self.status.saved(),
            Err(err) => self.status.save_failed(&err.to_string()),
        }
        result
    }

    /// Drive the autosave timer. Returns `Ok(true)` when a save happened.
    pub fn tick(&mut self, now: Instant) -> Result<bool> {
        match self.autosave.poll(now, &mut self.sink) {
            Ok(saved) => {
                if saved {
                    self.status.saved();
                }
                Ok(saved)
            }
            Err(err) => {
                self.status.save_failed(&err.to_string());
                Err(err)
            }
        }
    }

    /// A fillable preview of the current document.
    pub fn preview(&self) -> FormPreview {
        FormPreview::new(&self.document)
    }

    fn sync_autosave_flag(&mut self) {
        self.autosave
            .set_enabled(self.options.autosave && self.document.settings.enable_auto_save);
    }
}
