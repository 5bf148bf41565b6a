// src/models.rs

pub mod note;
pub mod preferences;
pub mod store;
pub mod task;

use thiserror::Error;

/// Result of a store operation. Operations never fail: inputs that cannot be
/// applied (blank text, unknown ids) leave the store untouched and say why.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    Applied(T),
    Ignored(Ignored),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Ignored {
    #[error("text is empty")]
    EmptyText,

    #[error("task not found")]
    TaskNotFound,

    #[error("subtask not found")]
    SubtaskNotFound,

    #[error("note not found")]
    NoteNotFound,

    #[error("project already exists")]
    DuplicateProject,
}

impl<T> Outcome<T> {
    pub fn applied(self) -> Option<T> {
        match self {
            Outcome::Applied(value) => Some(value),
            Outcome::Ignored(_) => None,
        }
    }
}
