use tracing::info;
use uuid::Uuid;

use crate::{
    models::{
        Outcome,
        note::{Note, NoteUpdate},
        store::Store,
    },
    services::{ServiceError, commit},
    storage::Storage,
};

pub struct AddNoteParameters {
    pub title: Option<String>,
    pub content: Option<String>,
}

pub fn add_note(
    store: &mut Store,
    storage: &impl Storage,
    parameters: AddNoteParameters,
) -> Result<Outcome<Note>, ServiceError> {
    let outcome = store.add_note(parameters.title, parameters.content, jiff::Timestamp::now());
    if let Outcome::Applied(note) = &outcome {
        info!(note_number = note.note_number, "note added");
    }
    commit(store, storage, "add_note", outcome)
}

pub fn update_note(
    store: &mut Store,
    storage: &impl Storage,
    note_id: Uuid,
    update: NoteUpdate,
) -> Result<Outcome<Note>, ServiceError> {
    let outcome = store.update_note(note_id, update, jiff::Timestamp::now());
    commit(store, storage, "update_note", outcome)
}

pub fn delete_note(
    store: &mut Store,
    storage: &impl Storage,
    note_id: Uuid,
) -> Result<Outcome<Note>, ServiceError> {
    let outcome = store.delete_note(note_id);
    if let Outcome::Applied(note) = &outcome {
        info!(note_number = note.note_number, "note deleted");
    }
    commit(store, storage, "delete_note", outcome)
}
