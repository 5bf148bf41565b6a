use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::models::{preferences::Preferences, store::Store};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config from '{path}': {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config '{path}': {source}")]
    ParseFailed {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Startup settings. Only read, never written back.
///
/// ```toml
/// projects = ["Inbox", "Work", "Shopping", "Garden"]
///
/// [preferences]
/// theme = "dark"
/// font_size = "medium"
/// sort_by = "due-date"
/// ```
#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub preferences: Preferences,
    /// Replaces the default project list when set
    pub projects: Option<Vec<String>>,
}

impl Config {
    /// Loads `path_override`, or the user config file if it exists.
    /// An explicit path must exist; the default one may be missing.
    pub fn load(path_override: Option<&Path>) -> Result<Config, ConfigError> {
        let (path, required) = match path_override {
            Some(path) => (path.to_path_buf(), true),
            None => match default_config_path() {
                Some(path) => (path, false),
                None => {
                    debug!("no config directory on this platform; using defaults");
                    return Ok(Config::default());
                }
            },
        };

        match std::fs::read_to_string(&path) {
            Ok(content) => {
                info!(config = %path.display(), "loading config");
                Config::parse(&content, &path)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound && !required => {
                debug!(config = %path.display(), "no config file; using defaults");
                Ok(Config::default())
            }
            Err(e) => Err(ConfigError::ReadFailed { path, source: e }),
        }
    }

    fn parse(content: &str, path: &Path) -> Result<Config, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::ParseFailed {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// The store a fresh session starts from
    pub fn initial_store(&self) -> Store {
        let mut store = Store {
            preferences: self.preferences,
            ..Store::default()
        };
        if let Some(projects) = &self.projects {
            store.projects.clear();
            for project in projects {
                // Blank and duplicate names are dropped the same way interactive adds are.
                store.add_project(project.clone());
            }
        }
        store
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("tasknote").join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::preferences::{FontSize, SortMode, Theme};

    #[test]
    fn test_parse_full_config() {
        let content = r#"
            projects = ["Inbox", "Garden", "inbox", " "]

            [preferences]
            theme = "dark"
            font_size = "large"
            sort_by = "due-date"
        "#;
        let config = Config::parse(content, Path::new("config.toml")).unwrap();

        assert_eq!(config.preferences.theme, Theme::Dark);
        assert_eq!(config.preferences.font_size, FontSize::Large);
        assert_eq!(config.preferences.sort_by, SortMode::DueDate);

        let store = config.initial_store();
        assert_eq!(store.projects, vec!["Inbox", "Garden"]);
        assert_eq!(store.preferences.theme, Theme::Dark);
    }

    #[test]
    fn test_empty_config_is_default() {
        let config = Config::parse("", Path::new("config.toml")).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.initial_store(), Store::default());
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        let result = Config::parse("colour = \"red\"", Path::new("config.toml"));
        assert!(matches!(result, Err(ConfigError::ParseFailed { .. })));
    }

    #[test]
    fn test_explicit_missing_path_fails() {
        let path = PathBuf::from("/tmp/tasknote_missing_config_for_test.toml");
        let _ = std::fs::remove_file(&path);

        let result = Config::load(Some(&path));
        assert!(matches!(result, Err(ConfigError::ReadFailed { .. })));
    }

    #[test]
    fn test_load_explicit_path() {
        let path = PathBuf::from("/tmp/tasknote_config_for_test.toml");
        std::fs::write(&path, "[preferences]\nsort_by = \"priority\"\n").unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.preferences.sort_by, SortMode::Priority);

        std::fs::remove_file(&path).unwrap();
    }
}
