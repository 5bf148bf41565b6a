use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Default, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Theme {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

/// Rendering density of task and note lists
#[derive(Serialize, Deserialize, Debug, Default, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum FontSize {
    #[default]
    Small,
    Medium,
    Large,
}

/// Order of the task list
#[derive(Serialize, Deserialize, Debug, Default, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum SortMode {
    /// Newest first
    #[default]
    Date,
    /// Most urgent first
    Priority,
    /// Soonest first, undated last
    DueDate,
}

#[derive(Serialize, Deserialize, Debug, Default, Clone, Copy, PartialEq, Eq)]
#[serde(default)]
pub struct Preferences {
    pub theme: Theme,
    pub font_size: FontSize,
    pub sort_by: SortMode,
}

/// One preference field with its new value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreferenceUpdate {
    Theme(Theme),
    FontSize(FontSize),
    SortBy(SortMode),
}

impl Preferences {
    pub fn apply(&mut self, update: PreferenceUpdate) {
        match update {
            PreferenceUpdate::Theme(theme) => self.theme = theme,
            PreferenceUpdate::FontSize(font_size) => self.font_size = font_size,
            PreferenceUpdate::SortBy(sort_by) => self.sort_by = sort_by,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let preferences = Preferences::default();
        assert_eq!(preferences.theme, Theme::Light);
        assert_eq!(preferences.font_size, FontSize::Small);
        assert_eq!(preferences.sort_by, SortMode::Date);
    }

    #[test]
    fn test_apply_replaces_one_field() {
        let mut preferences = Preferences::default();
        preferences.apply(PreferenceUpdate::SortBy(SortMode::DueDate));

        assert_eq!(preferences.sort_by, SortMode::DueDate);
        assert_eq!(preferences.theme, Theme::Light);
        assert_eq!(preferences.font_size, FontSize::Small);
    }

    #[test]
    fn test_partial_preferences_deserialize_with_defaults() {
        let preferences: Preferences = serde_json::from_str(r#"{"sort_by": "due-date"}"#).unwrap();
        assert_eq!(preferences.sort_by, SortMode::DueDate);
        assert_eq!(preferences.theme, Theme::Light);
    }
}
