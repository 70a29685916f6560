use crate::git_ops::GitOps;
use anyhow::{Context, Result};
use log::{debug, warn};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Failures that make a note unusable for a pipeline step
#[derive(Debug, Error)]
pub enum NoteError {
    #[error("note '{}' does not exist", .0.display())]
    NotFound(PathBuf),
    #[error("failed to read note '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Reads and writes note files, optionally keeping them in sync with Git
pub struct NoteStorage {
    sync_git: bool,
}

impl NoteStorage {
    pub fn new(sync_git: bool) -> Self {
        Self { sync_git }
    }

    /// Load a note, pulling the vault first when Git sync is on
    ///
    /// A failed pull is logged and the local copy is used.
    pub fn load(&self, path: &Path) -> Result<String, NoteError> {
        if self.sync_git
            && let Err(e) = GitOps::discover(path).pull()
        {
            warn!("event=git_pull status=error path={} error={:#}", path.display(), e);
        }

        if !path.exists() {
            return Err(NoteError::NotFound(path.to_path_buf()));
        }
        fs::read_to_string(path).map_err(|source| NoteError::Read {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Write a note and, when Git sync is on, commit and push it with `message`
    pub fn save_with_message(&self, path: &Path, content: &str, message: &str) -> Result<()> {
        fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))?;
        debug!("event=note_saved path={} bytes={}", path.display(), content.len());

        if self.sync_git {
            GitOps::discover(path)
                .publish(path, message)
                .with_context(|| format!("Failed to sync {}", path.display()))?;
        }
        Ok(())
    }

    /// Write a new note; an existing file is left untouched
    ///
    /// # Returns
    /// `true` when the note was created
    pub fn create_new(&self, path: &Path, content: &str, message: &str) -> Result<bool> {
        if path.exists() {
            return Ok(false);
        }
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        self.save_with_message(path, content, message)?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_missing_note() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing.md");
        let result = NoteStorage::new(false).load(&path);
        assert!(matches!(result, Err(NoteError::NotFound(p)) if p == path));
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("note.md");
        let storage = NoteStorage::new(false);
        storage.save_with_message(&path, "# Note\n", "Save").unwrap();
        assert_eq!(storage.load(&path).unwrap(), "# Note\n");
    }

    #[test]
    fn test_create_new_never_overwrites() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("daily").join("2025-10-07.md");
        let storage = NoteStorage::new(false);
        assert!(storage.create_new(&path, "first\n", "Create").unwrap());
        assert!(!storage.create_new(&path, "second\n", "Create").unwrap());
        assert_eq!(fs::read_to_string(&path).unwrap(), "first\n");
    }
}
