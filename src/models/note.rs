use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Title given to notes created or edited with a blank title
pub const UNTITLED_NOTE: &str = "Untitled Note";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Note {
    /// UUID of the note
    pub id: Uuid,
    /// User-facing auto-incremental note number
    pub note_number: u64,
    /// Title of the note
    pub title: String,
    /// Free-form content of the note
    pub content: String,
    /// Created at timestamp of the note
    pub created_at: Timestamp,
    /// Last edit timestamp, never earlier than `created_at`
    pub updated_at: Timestamp,
}

/// Fields to merge into an existing note. `None` keeps the current value.
#[derive(Debug, Default, Clone)]
pub struct NoteUpdate {
    pub title: Option<String>,
    pub content: Option<String>,
}

impl Note {
    pub fn new(note_number: u64, title: Option<String>, content: String, now: Timestamp) -> Self {
        Self {
            id: Uuid::new_v4(),
            note_number,
            title: title_or_placeholder(title),
            content,
            created_at: now,
            updated_at: now,
        }
    }

    /// Merges the update and refreshes `updated_at`. A clock that went
    /// backwards does not move `updated_at` backwards.
    pub fn apply(&mut self, update: NoteUpdate, now: Timestamp) {
        if let Some(title) = update.title {
            self.title = title_or_placeholder(Some(title));
        }
        if let Some(content) = update.content {
            self.content = content;
        }
        self.updated_at = now.max(self.updated_at);
    }
}

fn title_or_placeholder(title: Option<String>) -> String {
    match title {
        Some(title) if !title.trim().is_empty() => title,
        _ => UNTITLED_NOTE.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_title_becomes_placeholder() {
        let note = Note::new(1, Some(String::from("   ")), String::from("body"), Timestamp::UNIX_EPOCH);
        assert_eq!(note.title, UNTITLED_NOTE);

        let note = Note::new(2, None, String::from("body"), Timestamp::UNIX_EPOCH);
        assert_eq!(note.title, UNTITLED_NOTE);
    }

    #[test]
    fn test_apply_merges_only_given_fields() {
        let mut note = Note::new(
            1,
            Some(String::from("Groceries")),
            String::from("eggs"),
            Timestamp::UNIX_EPOCH,
        );
        let later = Timestamp::from_second(60).unwrap();

        note.apply(
            NoteUpdate {
                content: Some(String::from("eggs, milk")),
                ..NoteUpdate::default()
            },
            later,
        );

        assert_eq!(note.title, "Groceries");
        assert_eq!(note.content, "eggs, milk");
        assert_eq!(note.updated_at, later);
        assert_eq!(note.created_at, Timestamp::UNIX_EPOCH);
    }

    #[test]
    fn test_apply_never_moves_updated_at_backwards() {
        let created = Timestamp::from_second(1_000).unwrap();
        let mut note = Note::new(1, None, String::from("x"), created);

        note.apply(NoteUpdate::default(), Timestamp::from_second(10).unwrap());

        assert_eq!(note.updated_at, created);
        assert!(note.updated_at >= note.created_at);
    }
}
