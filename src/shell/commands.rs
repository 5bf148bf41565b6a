use clap::{Parser, Subcommand};
use jiff::civil::Date;

use crate::{
    models::{
        preferences::{FontSize, SortMode, Theme},
        task::Priority,
    },
    shell::CommandError,
    views::ViewMode,
};

/// One line typed into the session
#[derive(Parser, Debug)]
#[command(
    no_binary_name = true,
    disable_version_flag = true,
    help_template = "{subcommands}"
)]
pub struct Line {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Add a task to the selected project
    Add {
        /// Task text
        text: String,

        /// Due date (YYYY-MM-DD, "today" or "tomorrow")
        #[arg(short, long)]
        due: Option<String>,

        /// Add to this project instead of the selected one
        #[arg(short, long)]
        project: Option<String>,
    },

    /// Toggle a task between active and completed
    Done { task_number: u64 },

    /// Delete a task and its sub-tasks
    Rm { task_number: u64 },

    /// Set the priority of a task
    Priority {
        task_number: u64,
        #[arg(value_enum)]
        level: Priority,
    },

    /// Set or clear ("none") the due date of a task
    Due { task_number: u64, date: String },

    /// Manage sub-tasks
    #[command(subcommand)]
    Sub(SubCommands),

    /// Show or hide the sub-tasks of a task
    Expand { task_number: u64 },

    /// Show the current tab
    #[command(alias = "ls")]
    List,

    /// Switch to the task tab and list tasks
    Tasks,

    /// Switch between active and completed tasks
    View {
        #[arg(value_enum)]
        mode: ViewMode,
    },

    /// Manage projects
    #[command(subcommand)]
    Project(ProjectCommands),

    /// Manage notes
    #[command(subcommand)]
    Note(NoteCommands),

    /// Switch to the notes tab and list notes
    Notes,

    /// Change a preference
    #[command(subcommand)]
    Set(SetCommands),

    /// Switch between light and dark theme
    Theme,

    /// Show task and note counts
    Summary,

    /// Print the session snapshot as JSON
    Export,

    /// Leave the session
    #[command(alias = "exit")]
    Quit,
}

#[derive(Subcommand, Debug)]
pub enum SubCommands {
    /// Add a sub-task
    Add { task_number: u64, text: String },
    /// Toggle a sub-task
    Done { task_number: u64, position: usize },
    /// Delete a sub-task
    Rm { task_number: u64, position: usize },
}

#[derive(Subcommand, Debug)]
pub enum ProjectCommands {
    /// Create a new project
    New { name: String },
    /// Select a project, or "all"
    Select { name: String },
    /// List projects with their active task counts
    List,
}

#[derive(Subcommand, Debug)]
pub enum NoteCommands {
    /// Create a note
    Add {
        #[arg(short, long)]
        title: Option<String>,
        #[arg(short, long)]
        content: Option<String>,
    },
    /// Edit the title and/or content of a note
    Edit {
        note_number: u64,
        #[arg(short, long)]
        title: Option<String>,
        #[arg(short, long)]
        content: Option<String>,
    },
    /// Delete a note
    Rm { note_number: u64 },
}

#[derive(Subcommand, Debug)]
pub enum SetCommands {
    Theme {
        #[arg(value_enum)]
        value: Theme,
    },
    Font {
        #[arg(value_enum)]
        value: FontSize,
    },
    Sort {
        #[arg(value_enum)]
        value: SortMode,
    },
}

/// Splits a line into words. Single and double quotes group words, and a
/// backslash outside single quotes escapes the next character.
pub fn split_line(line: &str) -> Result<Vec<String>, CommandError> {
    let mut words = vec![];
    let mut current = String::new();
    let mut in_word = false;
    let mut quote: Option<char> = None;
    let mut chars = line.chars();

    while let Some(c) = chars.next() {
        match (quote, c) {
            (Some('\''), '\'') => quote = None,
            (Some('"'), '"') => quote = None,
            (Some('\''), _) => current.push(c),
            (_, '\\') => {
                if let Some(escaped) = chars.next() {
                    current.push(escaped);
                }
                in_word = true;
            }
            (Some(_), _) => current.push(c),
            (None, '\'' | '"') => {
                quote = Some(c);
                in_word = true;
            }
            (None, c) if c.is_whitespace() => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            (None, _) => {
                current.push(c);
                in_word = true;
            }
        }
    }

    if quote.is_some() {
        return Err(CommandError::UnterminatedQuote);
    }
    if in_word {
        words.push(current);
    }
    Ok(words)
}

/// Parses a due date argument. `Ok(None)` clears the date.
pub fn parse_due_date(input: &str, today: Date) -> Result<Option<Date>, CommandError> {
    match input.trim().to_lowercase().as_str() {
        "none" | "clear" | "" => Ok(None),
        "today" => Ok(Some(today)),
        "tomorrow" => today
            .tomorrow()
            .map(Some)
            .map_err(|_| CommandError::InvalidDate(input.to_string())),
        other => other
            .parse::<Date>()
            .map(Some)
            .map_err(|_| CommandError::InvalidDate(input.to_string())),
    }
}
