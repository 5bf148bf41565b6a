use std::collections::HashSet;

use colored::*;
use jiff::civil::Date;
use uuid::Uuid;

use crate::{
    models::{
        note::Note,
        preferences::{FontSize, Preferences, Theme},
        task::{Priority, Task},
    },
    views::{self, Counts, DueBand, ProjectSelection, ViewMode},
};

/// Get the terminal width, defaulting to 80 if unavailable
fn get_terminal_width() -> usize {
    term_size::dimensions().map(|(w, _)| w).unwrap_or(80)
}

/// Colors for one theme. Dark uses the lighter shade of each hue.
pub struct Palette {
    theme: Theme,
}

impl Palette {
    pub fn new(theme: Theme) -> Self {
        Self { theme }
    }

    fn pick(&self, light: (u8, u8, u8), dark: (u8, u8, u8)) -> Color {
        let (r, g, b) = match self.theme {
            Theme::Light => light,
            Theme::Dark => dark,
        };
        Color::TrueColor { r, g, b }
    }

    pub fn priority(&self, priority: Priority) -> Color {
        match priority {
            Priority::P1 => self.pick((239, 68, 68), (248, 113, 113)),
            Priority::P2 => self.pick((249, 115, 22), (251, 146, 60)),
            Priority::P3 => self.pick((59, 130, 246), (96, 165, 250)),
            Priority::P4 => self.pick((156, 163, 175), (107, 114, 128)),
        }
    }

    /// `None` for undated tasks, which are not colored
    pub fn due(&self, band: DueBand) -> Option<Color> {
        match band {
            DueBand::Overdue => Some(self.pick((239, 68, 68), (248, 113, 113))),
            DueBand::DueToday => Some(self.pick((249, 115, 22), (251, 146, 60))),
            DueBand::DueSoon => Some(self.pick((202, 138, 4), (250, 204, 21))),
            DueBand::DueLater => Some(self.pick((22, 163, 74), (74, 222, 128))),
            DueBand::NoDate => None,
        }
    }

    pub fn accent(&self) -> Color {
        self.pick((37, 99, 235), (96, 165, 250))
    }
}

/// Get the appropriate status glyph for a task
pub fn get_status_glyph(task: &Task, palette: &Palette) -> ColoredString {
    if task.completed {
        "✓".dimmed()
    } else {
        "○".color(palette.priority(task.priority))
    }
}

/// Due label and subtask progress, e.g. "Tomorrow · 1/3"
fn get_task_badges(task: &Task, today: Date) -> Vec<(String, DueBand)> {
    let mut badges = vec![];
    if let Some(due) = task.due_date {
        badges.push((
            views::due_label(due, today),
            views::classify_due_date(Some(due), today),
        ));
    }
    if !task.subtasks.is_empty() {
        let (done, total) = task.subtask_progress();
        badges.push((format!("{}/{}", done, total), DueBand::NoDate));
    }
    badges
}

/// Render a single task line with number, glyph, text, badges and right-aligned project
pub fn render_task_line(
    task: &Task,
    preferences: &Preferences,
    today: Date,
    show_project: bool,
    expanded: bool,
) {
    let palette = Palette::new(preferences.theme);
    let terminal_width = get_terminal_width();

    let id_str = format!("{:>3}", task.task_number);
    let glyph = get_status_glyph(task, &palette);

    let styled_text = if task.completed {
        task.text.strikethrough().dimmed()
    } else {
        task.text.bold()
    };

    let badges = get_task_badges(task, today);
    let badge_text: Vec<String> = badges
        .iter()
        .map(|(label, band)| match palette.due(*band) {
            Some(color) => label.color(color).to_string(),
            None => label.dimmed().to_string(),
        })
        .collect();
    let plain_badges: Vec<&str> = badges.iter().map(|(label, _)| label.as_str()).collect();

    let left_visible_len = format!(
        "  {}  {}  {}  {}",
        id_str,
        " ",
        task.text,
        plain_badges.join("  ")
    )
    .chars()
    .count();
    let left = format!(
        "  {}  {}  {}  {}",
        id_str.dimmed(),
        glyph,
        styled_text,
        badge_text.join("  ")
    );

    let right_section = if show_project {
        task.project.clone()
    } else {
        String::new()
    };
    let total_content = left_visible_len + right_section.chars().count();

    if !right_section.is_empty() && total_content + 4 < terminal_width {
        let padding = terminal_width - total_content - 2;
        println!("{}{}{}", left, " ".repeat(padding), right_section.dimmed());
    } else {
        // Not enough space for right alignment, just print normally
        println!("{}", left.trim_end());
    }

    if preferences.font_size != FontSize::Small {
        println!(
            "         {}",
            format!(
                "{} · {} · created {}",
                task.project,
                task.priority.label(),
                format_timestamp(task.created_at)
            )
            .dimmed()
        );
    }

    if expanded {
        render_subtasks(task);
    }

    if preferences.font_size == FontSize::Large {
        println!();
    }
}

fn render_subtasks(task: &Task) {
    if task.subtasks.is_empty() {
        println!("         {}", "no sub-tasks yet".dimmed());
        return;
    }
    for (position, subtask) in task.subtasks.iter().enumerate() {
        let (glyph, text) = if subtask.completed {
            ("☑".dimmed(), subtask.text.strikethrough().dimmed())
        } else {
            ("☐".normal(), subtask.text.normal())
        };
        println!("         {} {} {}", format!("{}.", position + 1).dimmed(), glyph, text);
    }
}

/// Render the filtered task list for the current view
pub fn render_task_list(
    tasks: &[&Task],
    mode: ViewMode,
    project: &ProjectSelection,
    preferences: &Preferences,
    today: Date,
    expanded: &HashSet<Uuid>,
) {
    let title = match mode {
        ViewMode::Active => project.label().to_string(),
        ViewMode::Completed => format!("Completed · {}", project.label()),
    };
    render_view_header(&title, tasks.len(), "task", preferences.theme);

    if tasks.is_empty() {
        let (headline, hint) = match mode {
            ViewMode::Active => ("No tasks yet", "Add your first task to get started!"),
            ViewMode::Completed => ("No completed tasks", "Complete tasks to see them here"),
        };
        println!("  {}", headline.bold());
        println!("  {}\n", hint.dimmed());
        return;
    }

    let show_project = matches!(project, ProjectSelection::All);
    for task in tasks {
        render_task_line(
            task,
            preferences,
            today,
            show_project,
            expanded.contains(&task.id),
        );
    }
    println!();
}

/// Render notes, most recently edited first
pub fn render_notes(notes: &[&Note], preferences: &Preferences) {
    render_view_header("Notes", notes.len(), "note", preferences.theme);

    if notes.is_empty() {
        println!("  {}", "No notes yet".bold());
        println!("  {}\n", "Create your first note above".dimmed());
        return;
    }

    for note in notes {
        println!(
            "  {}  {}",
            format!("{:>3}", note.note_number).dimmed(),
            note.title.bold()
        );
        let lines: Vec<&str> = note.content.lines().collect();
        let shown = match preferences.font_size {
            FontSize::Small => lines.len().min(3),
            FontSize::Medium | FontSize::Large => lines.len(),
        };
        for line in &lines[..shown] {
            println!("       {}", line);
        }
        if shown < lines.len() {
            println!("       {}", "…".dimmed());
        }
        println!(
            "       {}",
            format!("Updated {}", format_timestamp(note.updated_at)).dimmed()
        );
        println!("    {}", "─".repeat(30).dimmed());
    }
    println!();
}

/// Render the workspace summary: views, projects and their active counts
pub fn render_sidebar(
    counts: &Counts,
    selected: &ProjectSelection,
    mode: ViewMode,
    preferences: &Preferences,
) {
    let palette = Palette::new(preferences.theme);
    let marker = |is_selected: bool| if is_selected { "▸" } else { " " };

    println!("\n  {}\n", "Workspace".bold());
    let all_selected = matches!(selected, ProjectSelection::All);
    let rows = [
        (
            "All Tasks",
            counts.active,
            all_selected && mode == ViewMode::Active,
        ),
        ("Completed", counts.completed, mode == ViewMode::Completed),
    ];
    for (label, count, is_selected) in rows {
        println!("  {} {:<20}{:>4}", marker(is_selected), label, count);
    }

    render_section_header("Projects");
    for (project, count) in &counts.per_project {
        let is_selected = matches!(selected, ProjectSelection::Project(p) if p == project);
        let line = format!("  {} {:<20}{:>4}", marker(is_selected), project, count);
        if is_selected {
            println!("{}", line.color(palette.accent()));
        } else {
            println!("{}", line);
        }
    }

    render_section_header("Notes");
    println!("    {:<20}{:>4}\n", "Notes", counts.notes);
}

/// Render a view header with title and count
pub fn render_view_header(title: &str, count: usize, noun: &str, theme: Theme) {
    let palette = Palette::new(theme);
    let word = if count == 1 {
        noun.to_string()
    } else {
        format!("{}s", noun)
    };
    println!(
        "\n  {} ({} {})\n",
        title.color(palette.accent()).bold(),
        count,
        word
    );
}

/// Render a section header (e.g., "Projects")
pub fn render_section_header(title: &str) {
    println!("\n  ─── {} ───\n", title.bold());
}

/// Format a timestamp for display (e.g., "Today", "Yesterday", "Feb 15")
pub fn format_timestamp(timestamp: jiff::Timestamp) -> String {
    let zoned = jiff::Zoned::new(timestamp, jiff::tz::TimeZone::system());
    let date = zoned.date();
    let today = jiff::Zoned::now().date();

    if date == today {
        "Today".to_string()
    } else if today.yesterday().is_ok_and(|yesterday| yesterday == date) {
        "Yesterday".to_string()
    } else if date.year() == today.year() {
        date.strftime("%b %-d").to_string()
    } else {
        date.strftime("%b %-d, %Y").to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jiff::civil::date;

    #[test]
    fn test_palette_differs_per_theme() {
        let light = Palette::new(Theme::Light);
        let dark = Palette::new(Theme::Dark);
        assert_ne!(light.priority(Priority::P1), dark.priority(Priority::P1));
        assert_eq!(light.due(DueBand::NoDate), None);
    }

    #[test]
    fn test_task_badges() {
        let mut task = Task::new(
            1,
            String::from("Pay rent"),
            Some(date(2024, 6, 11)),
            String::from("Inbox"),
            jiff::Timestamp::UNIX_EPOCH,
        );
        task.subtasks.push(crate::models::task::Subtask::new(String::from("transfer")));

        let badges = get_task_badges(&task, date(2024, 6, 10));
        assert_eq!(
            badges,
            vec![
                (String::from("Tomorrow"), DueBand::DueSoon),
                (String::from("0/1"), DueBand::NoDate),
            ]
        );
    }
}
