//! Configuration file
//!
//! Settings are read from a TOML file. Every field has a default, so an
//! empty file (or no file at all) is a valid configuration.

use crate::layout::NoteLayout;
use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// File looked up in the working directory when no `--config` is given
pub const DEFAULT_CONFIG_FILE: &str = "taskvault.toml";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Log level (`error`, `warn`, `info`, `debug`, `trace`)
    pub log_level: String,
    pub vault: VaultConfig,
    pub taskwarrior: TaskWarriorConfig,
    pub layout: NoteLayout,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            vault: VaultConfig::default(),
            taskwarrior: TaskWarriorConfig::default(),
            layout: NoteLayout::default(),
        }
    }
}

/// Where notes live
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VaultConfig {
    /// Base directory for relative note paths
    pub root: PathBuf,
    /// Directory of daily notes, relative to `root`
    pub daily_dir: PathBuf,
    /// Commit and push notes after every change
    pub sync_git: bool,
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            daily_dir: PathBuf::from("daily"),
            sync_git: false,
        }
    }
}

impl VaultConfig {
    /// Resolve a note path given on the command line or by an MCP client
    pub fn resolve_note(&self, note: &str) -> PathBuf {
        let path = Path::new(note);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }

    /// Path of the daily note for `date`
    pub fn daily_note_path(&self, date: NaiveDate) -> PathBuf {
        self.root
            .join(&self.daily_dir)
            .join(format!("{}.md", date.format("%Y-%m-%d")))
    }
}

/// How to reach TaskWarrior
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskWarriorConfig {
    /// The `task` executable
    pub binary: String,
    /// `rc.` overrides passed before every command
    pub overrides: Vec<String>,
    /// Filter selecting tasks for daily notes
    pub pending_filter: String,
}

impl Default for TaskWarriorConfig {
    fn default() -> Self {
        Self {
            binary: "task".to_string(),
            overrides: vec!["rc.confirmation=off".to_string()],
            pending_filter: "status:pending".to_string(),
        }
    }
}

impl Config {
    /// Load configuration
    ///
    /// An explicit `path` must exist. Without one, [`DEFAULT_CONFIG_FILE`] is
    /// used when present and defaults otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => {
                if !p.exists() {
                    bail!("Config file '{}' does not exist", p.display());
                }
                p.to_path_buf()
            }
            None => {
                let default = PathBuf::from(DEFAULT_CONFIG_FILE);
                if !default.exists() {
                    return Ok(Self::default());
                }
                default
            }
        };

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config '{}'", path.display()))?;
        Self::from_toml(&content).with_context(|| format!("Invalid config '{}'", path.display()))
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.taskwarrior.binary, "task");
        assert_eq!(config.layout.identifier_marker, "uuid:");
    }

    #[test]
    fn test_partial_config() {
        let config = Config::from_toml(
            r#"
log_level = "debug"

[vault]
root = "/home/me/notes"
sync_git = true

[layout]
primary_heading = "Today"
"#,
        )
        .unwrap();
        assert_eq!(config.log_level, "debug");
        assert!(config.vault.sync_git);
        assert_eq!(config.vault.daily_dir, PathBuf::from("daily"));
        assert_eq!(config.layout.primary_heading, "Today");
        assert_eq!(config.layout.tbd_heading, "TBD: Proposed Tasks");
    }

    #[test]
    fn test_malformed_config_is_an_error() {
        assert!(Config::from_toml("log_level = [").is_err());
    }

    #[test]
    fn test_load_explicit_missing_file() {
        assert!(Config::load(Some(Path::new("/nonexistent/taskvault.toml"))).is_err());
    }

    #[test]
    fn test_load_explicit_file() {
        let file = NamedTempFile::new().unwrap();
        fs::write(file.path(), "[taskwarrior]\nbinary = \"/usr/bin/task\"\n").unwrap();
        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!(config.taskwarrior.binary, "/usr/bin/task");
    }

    #[test]
    fn test_resolve_paths() {
        let vault = VaultConfig {
            root: PathBuf::from("/vault"),
            ..Default::default()
        };
        assert_eq!(vault.resolve_note("inbox.md"), PathBuf::from("/vault/inbox.md"));
        assert_eq!(vault.resolve_note("/tmp/x.md"), PathBuf::from("/tmp/x.md"));
        let date = NaiveDate::from_ymd_opt(2025, 10, 7).unwrap();
        assert_eq!(
            vault.daily_note_path(date),
            PathBuf::from("/vault/daily/2025-10-07.md")
        );
    }
}
