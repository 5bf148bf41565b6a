//! Interactive session. Holds the store for the lifetime of the process,
//! the transient view state (tab, view mode, selected project, expanded
//! tasks) and maps typed commands onto the services.

use std::collections::HashSet;
use std::io::{BufRead, Write};

use clap::{Parser, error::ErrorKind};
use colored::*;
use jiff::civil::Date;
use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{
    models::{
        Outcome,
        note::NoteUpdate,
        preferences::PreferenceUpdate,
        store::{AddTaskParameters, Store},
        task::Task,
    },
    services::{
        self, ServiceError,
        notes::AddNoteParameters,
    },
    storage::{Storage, StorageError},
    ui,
    views::{self, ProjectSelection, TaskFilter, ViewMode},
};

pub mod commands;

use commands::{Command, Line, NoteCommands, ProjectCommands, SetCommands, SubCommands};

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("Unterminated quote in command")]
    UnterminatedQuote,

    #[error("{0}")]
    Parse(#[from] clap::Error),

    #[error("Task #{0} not found")]
    TaskNotFound(u64),

    #[error("Task #{task_number} has no sub-task {position}")]
    SubtaskNotFound { task_number: u64, position: usize },

    #[error("Note #{0} not found")]
    NoteNotFound(u64),

    #[error("Invalid date '{0}'. Expected YYYY-MM-DD, \"today\", \"tomorrow\" or \"none\"")]
    InvalidDate(String),

    #[error("Unknown project '{0}'")]
    ProjectNotFound(String),

    #[error(transparent)]
    Service(#[from] ServiceError),

    #[error("Failed to export snapshot: {0}")]
    Export(#[source] serde_json::Error),
}

/// Which list the session shows
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    #[default]
    Tasks,
    Notes,
}

/// Presentation state. Never stored in the snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    pub tab: Tab,
    pub mode: ViewMode,
    pub project: ProjectSelection,
    pub expanded: HashSet<Uuid>,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            tab: Tab::default(),
            mode: ViewMode::default(),
            project: ProjectSelection::Project(String::from("Inbox")),
            expanded: HashSet::new(),
        }
    }
}

impl ViewState {
    pub fn filter(&self) -> TaskFilter {
        TaskFilter {
            mode: self.mode,
            project: self.project.clone(),
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct Session<S: Storage> {
    pub store: Store,
    pub view: ViewState,
    storage: S,
}

impl<S: Storage> Session<S> {
    /// Seeds the session from the storage slot
    pub fn start(storage: S) -> Result<Self, StorageError> {
        let store = storage.load()?;
        info!(
            tasks = store.tasks.len(),
            notes = store.notes.len(),
            projects = store.projects.len(),
            "session started"
        );
        let mut view = ViewState::default();
        if let Some(first) = store.projects.first()
            && store.find_project("Inbox").is_none()
        {
            view.project = ProjectSelection::Project(first.clone());
        }
        Ok(Self {
            store,
            view,
            storage,
        })
    }

    /// Reads commands until end of input or `quit`. Command errors are
    /// reported and the session carries on.
    pub fn run(&mut self, input: impl BufRead) -> std::io::Result<()> {
        println!(
            "{} Type {} for commands, {} to leave.",
            "tasknote".bold(),
            "help".cyan(),
            "quit".cyan()
        );
        self.render();

        let mut lines = input.lines();
        loop {
            print!("{} ", "›".color(ui::Palette::new(self.store.preferences.theme).accent()));
            std::io::stdout().flush()?;

            let Some(line) = lines.next() else {
                println!();
                break;
            };
            match self.execute(&line?) {
                Ok(Flow::Quit) => break,
                Ok(Flow::Continue) => {}
                Err(CommandError::Parse(e))
                    if matches!(
                        e.kind(),
                        ErrorKind::DisplayHelp
                            | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
                    ) =>
                {
                    println!("{}", e.render());
                }
                Err(e) => {
                    warn!(error = %e, "command failed");
                    eprintln!("{} {}", "Error:".red(), e);
                }
            }
        }
        info!("session ended");
        Ok(())
    }

    pub fn execute(&mut self, line: &str) -> Result<Flow, CommandError> {
        let words = commands::split_line(line)?;
        if words.is_empty() {
            return Ok(Flow::Continue);
        }
        let line = Line::try_parse_from(words)?;
        debug!(command = ?line.command, "executing");
        self.dispatch(line.command)
    }

    fn today() -> Date {
        jiff::Zoned::now().date()
    }

    fn resolve_task(&self, task_number: u64) -> Result<&Task, CommandError> {
        self.store
            .get_task_by_number(task_number)
            .ok_or(CommandError::TaskNotFound(task_number))
    }

    fn resolve_subtask(&self, task_number: u64, position: usize) -> Result<(Uuid, Uuid), CommandError> {
        let task = self.resolve_task(task_number)?;
        position
            .checked_sub(1)
            .and_then(|index| task.subtasks.get(index))
            .map(|subtask| (task.id, subtask.id))
            .ok_or(CommandError::SubtaskNotFound {
                task_number,
                position,
            })
    }

    fn resolve_note(&self, note_number: u64) -> Result<Uuid, CommandError> {
        self.store
            .get_note_by_number(note_number)
            .map(|n| n.id)
            .ok_or(CommandError::NoteNotFound(note_number))
    }

    /// Project for new tasks: the selected one, or Inbox while viewing all
    fn default_project(&self) -> String {
        match &self.view.project {
            ProjectSelection::Project(name) => name.clone(),
            ProjectSelection::All => String::from("Inbox"),
        }
    }

    fn dispatch(&mut self, command: Command) -> Result<Flow, CommandError> {
        match command {
            Command::Add { text, due, project } => {
                let due_date = due
                    .as_deref()
                    .map(|d| commands::parse_due_date(d, Self::today()))
                    .transpose()?
                    .flatten();
                // Known projects are matched case-insensitively; unknown names are kept as typed.
                let project = match project {
                    Some(name) => self
                        .store
                        .find_project(&name)
                        .map(str::to_string)
                        .unwrap_or(name),
                    None => self.default_project(),
                };
                let outcome = services::tasks::add_task(
                    &mut self.store,
                    &self.storage,
                    AddTaskParameters {
                        text,
                        due_date,
                        project,
                    },
                )?;
                report(outcome, |task| {
                    format!("Task added: {} (#{}, {})", task.text, task.task_number, task.project)
                });
            }
            Command::Done { task_number } => {
                let task_id = self.resolve_task(task_number)?.id;
                let outcome = services::tasks::toggle_task(&mut self.store, &self.storage, task_id)?;
                report(outcome, |task| {
                    if task.completed {
                        format!("Task completed: {}", task.text)
                    } else {
                        format!("Task reopened: {}", task.text)
                    }
                });
            }
            Command::Rm { task_number } => {
                let task_id = self.resolve_task(task_number)?.id;
                let outcome = services::tasks::delete_task(&mut self.store, &self.storage, task_id)?;
                self.view.expanded.remove(&task_id);
                report(outcome, |task| format!("Task deleted: {}", task.text));
            }
            Command::Priority { task_number, level } => {
                let task_id = self.resolve_task(task_number)?.id;
                let outcome =
                    services::tasks::set_priority(&mut self.store, &self.storage, task_id, level)?;
                report(outcome, |task| {
                    format!("Priority of #{} set to {}", task.task_number, task.priority.label())
                });
            }
            Command::Due { task_number, date } => {
                let task_id = self.resolve_task(task_number)?.id;
                let today = Self::today();
                let due_date = commands::parse_due_date(&date, today)?;
                let outcome =
                    services::tasks::set_due_date(&mut self.store, &self.storage, task_id, due_date)?;
                report(outcome, |task| match task.due_date {
                    Some(due) => format!("#{} due {}", task.task_number, views::due_label(due, today)),
                    None => format!("#{} has no due date", task.task_number),
                });
            }
            Command::Sub(sub) => self.dispatch_subtask(sub)?,
            Command::Expand { task_number } => {
                let task_id = self.resolve_task(task_number)?.id;
                if !self.view.expanded.remove(&task_id) {
                    self.view.expanded.insert(task_id);
                }
                self.render();
            }
            Command::List => self.render(),
            Command::Tasks => {
                self.view.tab = Tab::Tasks;
                self.render();
            }
            Command::View { mode } => {
                self.view.tab = Tab::Tasks;
                self.view.mode = mode;
                self.render();
            }
            Command::Project(project) => self.dispatch_project(project)?,
            Command::Note(note) => self.dispatch_note(note)?,
            Command::Notes => {
                self.view.tab = Tab::Notes;
                self.render();
            }
            Command::Set(set) => {
                let update = match set {
                    SetCommands::Theme { value } => PreferenceUpdate::Theme(value),
                    SetCommands::Font { value } => PreferenceUpdate::FontSize(value),
                    SetCommands::Sort { value } => PreferenceUpdate::SortBy(value),
                };
                services::preferences::set_preference(&mut self.store, &self.storage, update)?;
                self.render();
            }
            Command::Theme => {
                services::preferences::toggle_theme(&mut self.store, &self.storage)?;
                self.render();
            }
            Command::Summary => {
                let counts = views::counts(&self.store);
                ui::render_sidebar(
                    &counts,
                    &self.view.project,
                    self.view.mode,
                    &self.store.preferences,
                );
            }
            Command::Export => {
                let json =
                    serde_json::to_string_pretty(&self.store).map_err(CommandError::Export)?;
                println!("{}", json);
            }
            Command::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    fn dispatch_subtask(&mut self, command: SubCommands) -> Result<(), CommandError> {
        match command {
            SubCommands::Add { task_number, text } => {
                let task_id = self.resolve_task(task_number)?.id;
                let outcome =
                    services::tasks::add_subtask(&mut self.store, &self.storage, task_id, text)?;
                report(outcome, |subtask| {
                    format!("Sub-task added to #{}: {}", task_number, subtask.text)
                });
            }
            SubCommands::Done {
                task_number,
                position,
            } => {
                let (task_id, subtask_id) = self.resolve_subtask(task_number, position)?;
                let outcome = services::tasks::toggle_subtask(
                    &mut self.store,
                    &self.storage,
                    task_id,
                    subtask_id,
                )?;
                report(outcome, |subtask| {
                    let state = if subtask.completed { "done" } else { "open" };
                    format!("Sub-task {}: {}", state, subtask.text)
                });
            }
            SubCommands::Rm {
                task_number,
                position,
            } => {
                let (task_id, subtask_id) = self.resolve_subtask(task_number, position)?;
                let outcome = services::tasks::delete_subtask(
                    &mut self.store,
                    &self.storage,
                    task_id,
                    subtask_id,
                )?;
                report(outcome, |subtask| format!("Sub-task deleted: {}", subtask.text));
            }
        }
        Ok(())
    }

    fn dispatch_project(&mut self, command: ProjectCommands) -> Result<(), CommandError> {
        match command {
            ProjectCommands::New { name } => {
                let outcome = services::tasks::add_project(&mut self.store, &self.storage, name)?;
                report(outcome, |name| format!("Project created: {}", name));
            }
            ProjectCommands::Select { name } => {
                self.view.project = if name.eq_ignore_ascii_case("all") {
                    ProjectSelection::All
                } else {
                    let project = self
                        .store
                        .find_project(&name)
                        .ok_or_else(|| CommandError::ProjectNotFound(name.clone()))?;
                    ProjectSelection::Project(project.to_string())
                };
                self.view.tab = Tab::Tasks;
                self.render();
            }
            ProjectCommands::List => {
                let counts = views::counts(&self.store);
                ui::render_sidebar(
                    &counts,
                    &self.view.project,
                    self.view.mode,
                    &self.store.preferences,
                );
            }
        }
        Ok(())
    }

    fn dispatch_note(&mut self, command: NoteCommands) -> Result<(), CommandError> {
        match command {
            NoteCommands::Add { title, content } => {
                let outcome = services::notes::add_note(
                    &mut self.store,
                    &self.storage,
                    AddNoteParameters { title, content },
                )?;
                report(outcome, |note| {
                    format!("Note added: {} (#{})", note.title, note.note_number)
                });
            }
            NoteCommands::Edit {
                note_number,
                title,
                content,
            } => {
                let note_id = self.resolve_note(note_number)?;
                let outcome = services::notes::update_note(
                    &mut self.store,
                    &self.storage,
                    note_id,
                    NoteUpdate { title, content },
                )?;
                report(outcome, |note| format!("Note updated: {}", note.title));
            }
            NoteCommands::Rm { note_number } => {
                let note_id = self.resolve_note(note_number)?;
                let outcome = services::notes::delete_note(&mut self.store, &self.storage, note_id)?;
                report(outcome, |note| format!("Note deleted: {}", note.title));
            }
        }
        Ok(())
    }

    fn render(&self) {
        let preferences = &self.store.preferences;
        match self.view.tab {
            Tab::Tasks => {
                let tasks = views::visible_tasks(&self.store, &self.view.filter());
                ui::render_task_list(
                    &tasks,
                    self.view.mode,
                    &self.view.project,
                    preferences,
                    Self::today(),
                    &self.view.expanded,
                );
            }
            Tab::Notes => {
                let notes = views::sorted_notes(&self.store.notes);
                ui::render_notes(&notes, preferences);
            }
        }
    }
}

fn report<T>(outcome: Outcome<T>, describe: impl FnOnce(&T) -> String) {
    match outcome {
        Outcome::Applied(value) => println!("{} {}", "✓".green(), describe(&value)),
        Outcome::Ignored(reason) => println!("{} {}", "Nothing to do:".dimmed(), reason),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::{preferences::SortMode, task::Priority},
        storage::memory::MemoryStorage,
    };

    fn session() -> Session<MemoryStorage> {
        Session::start(MemoryStorage::default()).unwrap()
    }

    fn run(session: &mut Session<MemoryStorage>, lines: &[&str]) {
        for line in lines {
            if let Err(e) = session.execute(line) {
                panic!("'{}' failed: {}", line, e);
            }
        }
    }

    #[test]
    fn test_buy_milk_session() {
        let mut session = session();
        run(
            &mut session,
            &["project select shopping", "add \"Buy milk\""],
        );

        assert_eq!(session.view.project, ProjectSelection::Project(String::from("Shopping")));
        assert_eq!(views::active_count_for_project(&session.store.tasks, "Shopping"), 1);

        run(&mut session, &["done 1"]);

        let counts = views::counts(&session.store);
        assert_eq!(views::active_count_for_project(&session.store.tasks, "Shopping"), 0);
        assert_eq!(counts.completed, 1);
        assert_eq!(session.storage.load().unwrap(), session.store);
    }

    #[test]
    fn test_add_with_all_selected_goes_to_inbox() {
        let mut session = session();
        run(&mut session, &["project select all", "add 'Call mom' --due 2030-01-02"]);

        let task = session.store.get_task_by_number(1).unwrap();
        assert_eq!(task.project, "Inbox");
        assert_eq!(task.due_date, Some(jiff::civil::date(2030, 1, 2)));
    }

    #[test]
    fn test_task_edits_through_commands() {
        let mut session = session();
        run(
            &mut session,
            &[
                "add 'Write report' -p work",
                "priority 1 p1",
                "due 1 2030-05-01",
                "sub add 1 'Draft outline'",
                "sub add 1 'Collect numbers'",
                "sub done 1 2",
                "sub rm 1 1",
                "expand 1",
            ],
        );

        let task = session.store.get_task_by_number(1).unwrap().clone();
        assert_eq!(task.project, "Work");
        assert_eq!(task.priority, Priority::P1);
        assert_eq!(task.due_date, Some(jiff::civil::date(2030, 5, 1)));
        assert_eq!(task.subtasks.len(), 1);
        assert_eq!(task.subtasks[0].text, "Collect numbers");
        assert!(task.subtasks[0].completed);
        assert!(session.view.expanded.contains(&task.id));

        run(&mut session, &["due 1 none", "rm 1"]);
        assert!(session.store.tasks.is_empty());
        assert!(session.view.expanded.is_empty());
    }

    #[test]
    fn test_unknown_numbers_are_reported() {
        let mut session = session();
        assert!(matches!(
            session.execute("done 7"),
            Err(CommandError::TaskNotFound(7))
        ));
        run(&mut session, &["add chores"]);
        assert!(matches!(
            session.execute("sub done 1 0"),
            Err(CommandError::SubtaskNotFound { task_number: 1, position: 0 })
        ));
        assert!(matches!(
            session.execute("note rm 3"),
            Err(CommandError::NoteNotFound(3))
        ));
        assert!(matches!(
            session.execute("project select Garden"),
            Err(CommandError::ProjectNotFound(_))
        ));
        assert!(matches!(
            session.execute("due 1 someday"),
            Err(CommandError::InvalidDate(_))
        ));
        assert!(matches!(session.execute("fly"), Err(CommandError::Parse(_))));
    }

    #[test]
    fn test_blank_inputs_change_nothing() {
        let mut session = session();
        run(&mut session, &["", "add '   '", "note add --title ' '"]);

        assert!(session.store.tasks.is_empty());
        assert!(session.store.notes.is_empty());
        assert!(session.storage.snapshot().is_none());
    }

    #[test]
    fn test_notes_and_preferences() {
        let mut session = session();
        run(
            &mut session,
            &[
                "note add --content 'pick up keys'",
                "note edit 1 --title Errands",
                "notes",
                "set sort priority",
                "theme",
                "view completed",
            ],
        );

        let note = session.store.get_note_by_number(1).unwrap();
        assert_eq!(note.title, "Errands");
        assert_eq!(note.content, "pick up keys");
        assert_eq!(session.store.preferences.sort_by, SortMode::Priority);
        assert_eq!(session.view.mode, ViewMode::Completed);
        assert_eq!(session.view.tab, Tab::Tasks);

        run(&mut session, &["note rm 1"]);
        assert!(session.store.notes.is_empty());
    }

    #[test]
    fn test_quit() {
        let mut session = session();
        assert_eq!(session.execute("quit").unwrap(), Flow::Quit);
        assert_eq!(session.execute("exit").unwrap(), Flow::Quit);
    }

    #[test]
    fn test_run_reads_until_end_of_input() {
        let mut session = session();
        let input = "add 'from stdin'\nbogus\nsummary\n";
        session.run(input.as_bytes()).unwrap();
        assert_eq!(session.store.tasks.len(), 1);
    }
}
