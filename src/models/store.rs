use jiff::Timestamp;
use jiff::civil::Date;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{
    Ignored, Outcome,
    note::{Note, NoteUpdate},
    preferences::{PreferenceUpdate, Preferences},
    task::{Priority, Subtask, Task},
};

/// Projects every new store starts with
pub const DEFAULT_PROJECTS: [&str; 3] = ["Inbox", "Work", "Shopping"];

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Store {
    pub tasks: Vec<Task>,
    pub notes: Vec<Note>,
    pub projects: Vec<String>,
    pub preferences: Preferences,
    /// Last task number handed out. Numbers are not reused after deletes.
    #[serde(default)]
    pub task_counter: u64,
    #[serde(default)]
    pub note_counter: u64,
}

impl Default for Store {
    fn default() -> Self {
        Self {
            tasks: vec![],
            notes: vec![],
            projects: DEFAULT_PROJECTS.iter().map(|p| p.to_string()).collect(),
            preferences: Preferences::default(),
            task_counter: 0,
            note_counter: 0,
        }
    }
}

pub struct AddTaskParameters {
    pub text: String,
    pub due_date: Option<Date>,
    pub project: String,
}

impl Store {
    pub fn get_task(&self, id: Uuid) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn get_task_by_number(&self, task_number: u64) -> Option<&Task> {
        self.tasks.iter().find(|t| t.task_number == task_number)
    }

    pub fn get_note(&self, id: Uuid) -> Option<&Note> {
        self.notes.iter().find(|n| n.id == id)
    }

    pub fn get_note_by_number(&self, note_number: u64) -> Option<&Note> {
        self.notes.iter().find(|n| n.note_number == note_number)
    }

    /// Case-insensitive lookup of a known project name
    pub fn find_project(&self, name: &str) -> Option<&str> {
        let wanted = slug::slugify(name);
        self.projects
            .iter()
            .find(|p| slug::slugify(p) == wanted)
            .map(String::as_str)
    }

    fn get_task_mut(&mut self, id: Uuid) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| t.id == id)
    }

    fn get_note_mut(&mut self, id: Uuid) -> Option<&mut Note> {
        self.notes.iter_mut().find(|n| n.id == id)
    }

    /// Edits one task in place, reporting a missing task as ignored.
    fn update_task<T>(&mut self, id: Uuid, f: impl FnOnce(&mut Task) -> T) -> Outcome<T> {
        match self.get_task_mut(id) {
            Some(task) => Outcome::Applied(f(task)),
            None => Outcome::Ignored(Ignored::TaskNotFound),
        }
    }

    pub fn add_task(&mut self, parameters: AddTaskParameters, now: Timestamp) -> Outcome<Task> {
        if parameters.text.trim().is_empty() {
            return Outcome::Ignored(Ignored::EmptyText);
        }

        self.task_counter += 1;
        let task = Task::new(
            self.task_counter,
            parameters.text,
            parameters.due_date,
            parameters.project,
            now,
        );
        self.tasks.push(task.clone());
        Outcome::Applied(task)
    }

    pub fn toggle_task(&mut self, id: Uuid, now: Timestamp) -> Outcome<Task> {
        self.update_task(id, |task| {
            task.toggle(now);
            task.clone()
        })
    }

    /// Removes the task together with its subtasks
    pub fn delete_task(&mut self, id: Uuid) -> Outcome<Task> {
        match self.tasks.iter().position(|t| t.id == id) {
            Some(index) => Outcome::Applied(self.tasks.remove(index)),
            None => Outcome::Ignored(Ignored::TaskNotFound),
        }
    }

    pub fn set_priority(&mut self, id: Uuid, priority: Priority) -> Outcome<Task> {
        self.update_task(id, |task| {
            task.priority = priority;
            task.clone()
        })
    }

    pub fn set_due_date(&mut self, id: Uuid, due_date: Option<Date>) -> Outcome<Task> {
        self.update_task(id, |task| {
            task.due_date = due_date;
            task.clone()
        })
    }

    pub fn add_subtask(&mut self, task_id: Uuid, text: String) -> Outcome<Subtask> {
        if text.trim().is_empty() {
            return Outcome::Ignored(Ignored::EmptyText);
        }
        self.update_task(task_id, |task| {
            let subtask = Subtask::new(text);
            task.subtasks.push(subtask.clone());
            subtask
        })
    }

    pub fn toggle_subtask(&mut self, task_id: Uuid, subtask_id: Uuid) -> Outcome<Subtask> {
        let Some(task) = self.get_task_mut(task_id) else {
            return Outcome::Ignored(Ignored::TaskNotFound);
        };
        match task.subtask_mut(subtask_id) {
            Some(subtask) => {
                subtask.completed = !subtask.completed;
                Outcome::Applied(subtask.clone())
            }
            None => Outcome::Ignored(Ignored::SubtaskNotFound),
        }
    }

    pub fn delete_subtask(&mut self, task_id: Uuid, subtask_id: Uuid) -> Outcome<Subtask> {
        let Some(task) = self.get_task_mut(task_id) else {
            return Outcome::Ignored(Ignored::TaskNotFound);
        };
        match task.subtasks.iter().position(|s| s.id == subtask_id) {
            Some(index) => Outcome::Applied(task.subtasks.remove(index)),
            None => Outcome::Ignored(Ignored::SubtaskNotFound),
        }
    }

    pub fn add_note(
        &mut self,
        title: Option<String>,
        content: Option<String>,
        now: Timestamp,
    ) -> Outcome<Note> {
        let has_title = title.as_deref().is_some_and(|t| !t.trim().is_empty());
        let has_content = content.as_deref().is_some_and(|c| !c.trim().is_empty());
        if !has_title && !has_content {
            return Outcome::Ignored(Ignored::EmptyText);
        }

        self.note_counter += 1;
        let note = Note::new(self.note_counter, title, content.unwrap_or_default(), now);
        self.notes.push(note.clone());
        Outcome::Applied(note)
    }

    pub fn update_note(&mut self, id: Uuid, update: NoteUpdate, now: Timestamp) -> Outcome<Note> {
        match self.get_note_mut(id) {
            Some(note) => {
                note.apply(update, now);
                Outcome::Applied(note.clone())
            }
            None => Outcome::Ignored(Ignored::NoteNotFound),
        }
    }

    pub fn delete_note(&mut self, id: Uuid) -> Outcome<Note> {
        match self.notes.iter().position(|n| n.id == id) {
            Some(index) => Outcome::Applied(self.notes.remove(index)),
            None => Outcome::Ignored(Ignored::NoteNotFound),
        }
    }

    pub fn set_preference(&mut self, update: PreferenceUpdate) -> Outcome<Preferences> {
        self.preferences.apply(update);
        Outcome::Applied(self.preferences)
    }

    pub fn add_project(&mut self, name: String) -> Outcome<String> {
        let name = name.trim().to_string();
        if name.is_empty() {
            return Outcome::Ignored(Ignored::EmptyText);
        }
        if self.find_project(&name).is_some() {
            return Outcome::Ignored(Ignored::DuplicateProject);
        }
        self.projects.push(name.clone());
        Outcome::Applied(name)
    }
}
