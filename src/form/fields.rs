//! Sequence-level edits of a document's field list.
//!
//! Every operation takes the current slice and returns a new vector; the
//! input is never mutated. Operations that reference a missing id or an
//! out-of-range index return an unchanged copy.

use tracing::debug;

use crate::domain::{FieldId, FieldSchema};

use super::patch::FieldPatch;

pub fn index_of(fields: &[FieldSchema], id: &FieldId) -> Option<usize> {
    fields.iter().position(|field| &field.id == id)
}

/// Insert `field` at the end. A field whose id is already present is rejected.
pub fn append(fields: &[FieldSchema], field: FieldSchema) -> Vec<FieldSchema> {
    let mut next = fields.to_vec();
    if index_of(fields, &field.id).is_some() {
        debug!(field = %field.id, "append skipped: id already present");
        return next;
    }
    next.push(field);
    next
}

pub fn update(fields: &[FieldSchema], id: &FieldId, patch: &FieldPatch) -> Vec<FieldSchema> {
    let mut next = fields.to_vec();
    match index_of(&next, id) {
        Some(index) => patch.apply_to(&mut next[index]),
        None => debug!(field = %id, "update skipped: no such field"),
    }
    next
}

pub fn delete(fields: &[FieldSchema], id: &FieldId) -> Vec<FieldSchema> {
    fields
        .iter()
        .filter(|field| &field.id != id)
        .cloned()
        .collect()
}

/// Remove the element at `from` and reinsert it at `to`, shifting the
/// elements in between by one.
pub fn move_index(fields: &[FieldSchema], from: usize, to: usize) -> Vec<FieldSchema> {
    let mut next = fields.to_vec();
    let len = next.len();
    if from >= len || to >= len {
        debug!(from, to, len, "move skipped: index out of range");
        return next;
    }
    if from != to {
        let moved = next.remove(from);
        next.insert(to, moved);
    }
    next
}

/// Move the `active` field into the slot currently held by `over`.
pub fn move_by_id(fields: &[FieldSchema], active: &FieldId, over: &FieldId) -> Vec<FieldSchema> {
    match (index_of(fields, active), index_of(fields, over)) {
        (Some(from), Some(to)) => move_index(fields, from, to),
        _ => {
            debug!(%active, %over, "move skipped: unknown field id");
            fields.to_vec()
        }
    }
}

/// Insert a copy of `id` right after it. Returns the new sequence and the
/// copy's id, or an unchanged copy and `None` when `id` is absent.
pub fn duplicate(fields: &[FieldSchema], id: &FieldId) -> (Vec<FieldSchema>, Option<FieldId>) {
    let mut next = fields.to_vec();
    let Some(index) = index_of(fields, id) else {
        debug!(field = %id, "duplicate skipped: no such field");
        return (next, None);
    };
    let copy = next[index].duplicate();
    let copy_id = copy.id.clone();
    next.insert(index + 1, copy);
    (next, Some(copy_id))
}
