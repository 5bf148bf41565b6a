// src/models/task.rs

use jiff::Timestamp;
use jiff::civil::Date;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Task {
    /// UUID to identify the task
    pub id: Uuid,
    /// User-facing auto-incremental task number
    pub task_number: u64,
    /// Text of the task, stored as entered
    pub text: String,
    /// Whether the task is done
    pub completed: bool,
    /// When the task was created
    pub created_at: Timestamp,
    /// When the task was completed, set only while `completed` is true
    pub completed_at: Option<Timestamp>,
    /// Urgency of the task
    pub priority: Priority,
    /// Day the task is due, if any
    pub due_date: Option<Date>,
    /// Name of the project owning this task. Not checked against the project list.
    pub project: String,
    /// Sub tasks of the main task - Modeled as a lighter task called Subtask
    pub subtasks: Vec<Subtask>,
}

/// Four urgency levels, most urgent first. `P4` is the default for new tasks.
#[derive(
    Serialize, Deserialize, Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash,
    clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    P1,
    P2,
    P3,
    #[default]
    P4,
}

impl Priority {
    pub const ALL: [Priority; 4] = [Priority::P1, Priority::P2, Priority::P3, Priority::P4];

    /// Sort rank, 0 being the most urgent
    pub fn rank(self) -> u8 {
        match self {
            Priority::P1 => 0,
            Priority::P2 => 1,
            Priority::P3 => 2,
            Priority::P4 => 3,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Priority::P1 => "p1",
            Priority::P2 => "p2",
            Priority::P3 => "p3",
            Priority::P4 => "p4",
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Subtask {
    pub id: Uuid,
    pub text: String,
    pub completed: bool,
}

impl Subtask {
    pub fn new(text: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            text,
            completed: false,
        }
    }
}

impl Task {
    pub fn new(
        task_number: u64,
        text: String,
        due_date: Option<Date>,
        project: String,
        now: Timestamp,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            task_number,
            text,
            completed: false,
            created_at: now,
            completed_at: None,
            priority: Priority::default(),
            due_date,
            project,
            subtasks: vec![],
        }
    }

    /// Flips completion, keeping `completed_at` in step with the flag.
    pub fn toggle(&mut self, now: Timestamp) {
        self.completed = !self.completed;
        self.completed_at = if self.completed { Some(now) } else { None };
    }

    pub fn subtask(&self, subtask_id: Uuid) -> Option<&Subtask> {
        self.subtasks.iter().find(|s| s.id == subtask_id)
    }

    pub fn subtask_mut(&mut self, subtask_id: Uuid) -> Option<&mut Subtask> {
        self.subtasks.iter_mut().find(|s| s.id == subtask_id)
    }

    /// (completed, total) subtasks
    pub fn subtask_progress(&self) -> (usize, usize) {
        let done = self.subtasks.iter().filter(|s| s.completed).count();
        (done, self.subtasks.len())
    }
}
