//! Common test utilities for integration tests

#![allow(dead_code)]

use chrono::NaiveDate;
use std::collections::HashSet;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;
use taskvault::{Config, NewTask, TaskTracker, TaskVaultHandler, TrackedStatus, TrackedTask};
use tempfile::TempDir;

/// In-memory task tracker
///
/// Tasks get identifiers `t-1`, `t-2`, ... in creation order. Descriptions
/// listed in `fail_on` are refused at creation.
#[derive(Default)]
pub struct MemoryTracker {
    pub tasks: Mutex<Vec<TrackedTask>>,
    pub fail_on: HashSet<String>,
    pub done_calls: Mutex<Vec<String>>,
}

impl MemoryTracker {
    pub fn failing_on(descriptions: &[&str]) -> Self {
        Self {
            fail_on: descriptions.iter().map(|d| d.to_string()).collect(),
            ..Default::default()
        }
    }

    pub fn with_tasks(tasks: Vec<TrackedTask>) -> Self {
        Self {
            tasks: Mutex::new(tasks),
            ..Default::default()
        }
    }

    pub fn created_descriptions(&self) -> Vec<String> {
        self.tasks
            .lock()
            .unwrap()
            .iter()
            .map(|t| t.description.clone())
            .collect()
    }
}

impl TaskTracker for MemoryTracker {
    fn create_task(&self, task: &NewTask) -> Option<String> {
        if self.fail_on.contains(&task.description) {
            return None;
        }
        let mut tasks = self.tasks.lock().unwrap();
        let id = format!("t-{}", tasks.len() + 1);
        tasks.push(TrackedTask {
            id: id.clone(),
            description: task.description.clone(),
            status: TrackedStatus::pending,
            due: task.due,
            priority: task.priority,
            project: task.project.clone(),
            tags: task.tags.clone(),
        });
        Some(id)
    }

    fn get_task(&self, id: &str) -> Option<TrackedTask> {
        let tasks = self.tasks.lock().unwrap();
        tasks.iter().find(|t| t.id == id).cloned()
    }

    fn mark_task_done(&self, id: &str) -> bool {
        self.done_calls.lock().unwrap().push(id.to_string());
        let mut tasks = self.tasks.lock().unwrap();
        match tasks.iter_mut().find(|t| t.id == id) {
            Some(task) => {
                task.status = TrackedStatus::completed;
                true
            }
            None => false,
        }
    }

    fn pending_tasks(&self) -> Vec<TrackedTask> {
        let tasks = self.tasks.lock().unwrap();
        tasks
            .iter()
            .filter(|t| t.status == TrackedStatus::pending)
            .cloned()
            .collect()
    }
}

/// Reference date used across tests: a Tuesday
pub fn reference() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 10, 7).unwrap()
}

/// Create a vault directory holding one note
pub fn vault_with_note(name: &str, content: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join(name);
    fs::write(&path, content).unwrap();
    (temp_dir, path)
}

/// Create a test handler rooted at `vault`
pub fn get_test_handler(vault: &TempDir, tracker: MemoryTracker) -> TaskVaultHandler {
    let mut config = Config::default();
    config.vault.root = vault.path().to_path_buf();
    TaskVaultHandler::with_tracker(config, Box::new(tracker))
}

/// Set the decision marker of the TBD record for `description`
pub fn mark(note: &str, description: &str, marker: char) -> String {
    note.replace(
        &format!("- [ ] {}\n    - proposed:", description),
        &format!("- [{}] {}\n    - proposed:", marker, description),
    )
}
