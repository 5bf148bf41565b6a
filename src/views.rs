//! Read-only projections of the store: what the task and note lists show,
//! in which order, and how due dates are presented.

use jiff::civil::Date;

use crate::models::{
    note::Note,
    preferences::SortMode,
    store::Store,
    task::Task,
};

/// Which side of the completion flag the task list shows
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ViewMode {
    #[default]
    Active,
    Completed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectSelection {
    All,
    Project(String),
}

impl ProjectSelection {
    pub fn label(&self) -> &str {
        match self {
            ProjectSelection::All => "All Tasks",
            ProjectSelection::Project(name) => name.as_str(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskFilter {
    pub mode: ViewMode,
    pub project: ProjectSelection,
}

impl TaskFilter {
    pub fn matches(&self, task: &Task) -> bool {
        let mode_matches = match self.mode {
            ViewMode::Active => !task.completed,
            ViewMode::Completed => task.completed,
        };
        mode_matches
            && match &self.project {
                ProjectSelection::All => true,
                ProjectSelection::Project(name) => &task.project == name,
            }
    }
}

/// Sorts in place. All three orders are stable, so ties keep insertion order.
pub fn sort_tasks(tasks: &mut [&Task], sort_by: SortMode) {
    match sort_by {
        SortMode::Priority => tasks.sort_by_key(|t| t.priority.rank()),
        SortMode::DueDate => tasks.sort_by(|a, b| match (a.due_date, b.due_date) {
            (Some(a), Some(b)) => a.cmp(&b),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => std::cmp::Ordering::Equal,
        }),
        SortMode::Date => tasks.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
    }
}

/// The task list as displayed: filtered, then sorted by the preferred order
pub fn visible_tasks<'a>(store: &'a Store, filter: &TaskFilter) -> Vec<&'a Task> {
    let mut tasks: Vec<_> = store.tasks.iter().filter(|t| filter.matches(t)).collect();
    sort_tasks(&mut tasks, store.preferences.sort_by);
    tasks
}

/// Most recently edited first
pub fn sorted_notes(notes: &[Note]) -> Vec<&Note> {
    let mut notes: Vec<_> = notes.iter().collect();
    notes.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
    notes
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DueBand {
    Overdue,
    DueToday,
    /// One to three days out
    DueSoon,
    DueLater,
    NoDate,
}

/// Whole days from `today` to `due`, negative when the date has passed.
pub fn days_until_due(due: Date, today: Date) -> i64 {
    // Civil dates have no time of day, so this is already the rounded-up day count.
    today
        .until(due)
        .map(|span| i64::from(span.get_days()))
        .unwrap_or_default()
}

pub fn classify_due_date(due: Option<Date>, today: Date) -> DueBand {
    let Some(due) = due else {
        return DueBand::NoDate;
    };
    match days_until_due(due, today) {
        days if days < 0 => DueBand::Overdue,
        0 => DueBand::DueToday,
        1..=3 => DueBand::DueSoon,
        _ => DueBand::DueLater,
    }
}

/// Human label for a due date, e.g. "Tomorrow", "Fri", "Jun 3" or "Jan 5, 2025"
pub fn due_label(due: Date, today: Date) -> String {
    match days_until_due(due, today) {
        0 => "Today".to_string(),
        1 => "Tomorrow".to_string(),
        -1 => "Yesterday".to_string(),
        2..=7 => due.strftime("%a").to_string(),
        _ if due.year() == today.year() => due.strftime("%b %-d").to_string(),
        _ => due.strftime("%b %-d, %Y").to_string(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Counts {
    pub active: usize,
    pub completed: usize,
    /// Active tasks per listed project, in project list order
    pub per_project: Vec<(String, usize)>,
    pub notes: usize,
}

pub fn active_count_for_project(tasks: &[Task], project: &str) -> usize {
    tasks
        .iter()
        .filter(|t| !t.completed && t.project == project)
        .count()
}

pub fn counts(store: &Store) -> Counts {
    Counts {
        active: store.tasks.iter().filter(|t| !t.completed).count(),
        completed: store.tasks.iter().filter(|t| t.completed).count(),
        per_project: store
            .projects
            .iter()
            .map(|p| (p.clone(), active_count_for_project(&store.tasks, p)))
            .collect(),
        notes: store.notes.len(),
    }
}
