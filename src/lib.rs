//! Task Vault Library
//!
//! Turns informal checkbox items in markdown notes into TaskWarrior tasks
//! through a two-step, human-in-the-loop workflow, and exposes it as a
//! Model Context Protocol (MCP) server.
//!
//! # Architecture
//!
//! The library follows a 3-layer architecture:
//! - **MCP Layer**: `TaskVaultHandler` - Handles MCP protocol communication
//! - **Domain Layer**: `scanner`, `nlp`, `proposal`, `tbd`, `materialize`,
//!   `reorganize` - The note pipeline, pure apart from the task tracker
//! - **Persistence Layer**: `storage` and `tracker` - Note files with Git sync,
//!   and the TaskWarrior client
//!
//! # Example
//!
//! ```no_run
//! use taskvault::{Config, TaskVaultHandler};
//! use anyhow::Result;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = Config::load(None)?;
//!     let handler = TaskVaultHandler::new(config);
//!     // Use handler with MCP server...
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod daily;
pub mod formatting;
pub mod git_ops;
pub mod handlers;
pub mod layout;
pub mod logging;
pub mod materialize;
pub mod nlp;
pub mod pipeline;
pub mod proposal;
pub mod reorganize;
pub mod scanner;
pub mod storage;
pub mod tbd;
pub mod tracker;
pub mod validation;

use chrono::{Local, NaiveDate};
use mcp_attr::Result as McpResult;
use mcp_attr::server::{McpServer, mcp_server};

// Re-export commonly used types
pub use config::{Config, TaskWarriorConfig, VaultConfig};
pub use layout::NoteLayout;
pub use nlp::Priority;
pub use pipeline::{ApplyOutcome, ProposeOutcome, apply_text, propose_text};
pub use proposal::TaskProposal;
pub use scanner::InformalTask;
pub use storage::NoteStorage;
pub use tbd::{Decision, TbdError};
pub use tracker::{NewTask, TaskTracker, TaskWarrior, TrackedStatus, TrackedTask};

/// Get the current date in local timezone
pub fn local_date_today() -> NaiveDate {
    Local::now().date_naive()
}

/// MCP Server handler for the task vault
///
/// Holds the loaded configuration, note storage, and the task tracker every
/// tool talks to. Notes are re-read on each call, so edits made between
/// calls (marking TBD records) are always picked up.
pub struct TaskVaultHandler {
    pub(crate) config: Config,
    pub(crate) storage: NoteStorage,
    pub(crate) tracker: Box<dyn TaskTracker>,
}

impl TaskVaultHandler {
    /// Create a handler backed by TaskWarrior
    ///
    /// # Arguments
    /// * `config` - Loaded configuration; `vault.sync_git` enables Git synchronization
    pub fn new(config: Config) -> Self {
        let tracker = Box::new(TaskWarrior::new(config.taskwarrior.clone()));
        Self::with_tracker(config, tracker)
    }

    /// Create a handler with a caller-supplied task tracker
    pub fn with_tracker(config: Config, tracker: Box<dyn TaskTracker>) -> Self {
        let storage = NoteStorage::new(config.vault.sync_git);
        Self {
            config,
            storage,
            tracker,
        }
    }
}

/// Task vault server: captures the loose checkbox items scattered through
/// markdown notes and turns them into tracked TaskWarrior tasks.
///
/// Workflow:
/// 1. **propose_tasks**: stage a proposal for each informal checkbox in a TBD block
/// 2. The user marks each record `[a]` (approve) or `[r]` (reject) in the note
/// 3. **apply_tasks**: create the approved tasks and tidy the note
///
/// Notes are markdown paths relative to the vault root. Dates are YYYY-MM-DD
/// and default to today.
#[mcp_server]
impl McpServer for TaskVaultHandler {
    /// **Step 1 (Propose)**: Scan a note for informal checkbox items and write a TBD
    /// block proposing a task for each, with parsed due date and priority.
    /// **Next**: Ask the user to mark records [a]/[r], then call apply_tasks.
    #[tool]
    async fn propose_tasks(
        &self,
        /// Note path relative to the vault root (e.g., "inbox.md")
        note: String,
        /// Reference date for relative dates like "tomorrow": YYYY-MM-DD (optional, default today)
        date: Option<String>,
    ) -> McpResult<String> {
        self.handle_propose(note, date).await
    }

    /// **Step 2 (Apply)**: Create the approved TBD records as TaskWarrior tasks,
    /// remove their original lines, and list them under "Created Tasks".
    /// The TBD block is kept while any record failed or still needs review.
    #[tool]
    async fn apply_tasks(
        &self,
        /// Note path relative to the vault root (e.g., "inbox.md")
        note: String,
        /// Today's date for promoting due tasks: YYYY-MM-DD (optional, default today)
        date: Option<String>,
    ) -> McpResult<String> {
        self.handle_apply(note, date).await
    }

    /// **Preview**: List the informal tasks in a note without modifying it.
    #[tool]
    async fn scan_note(
        &self,
        /// Note path relative to the vault root (e.g., "inbox.md")
        note: String,
    ) -> McpResult<String> {
        self.handle_scan(note).await
    }

    /// **Daily note**: Create the daily note with overdue, due and high-priority
    /// pending tasks. Leaves an existing daily note untouched.
    #[tool]
    async fn daily_note(
        &self,
        /// Day of the note: YYYY-MM-DD (optional, default today)
        date: Option<String>,
    ) -> McpResult<String> {
        self.handle_daily(date).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::sync::Mutex;
    use tempfile::TempDir;

    #[derive(Default)]
    struct CountingTracker {
        created: Mutex<Vec<NewTask>>,
    }

    impl TaskTracker for CountingTracker {
        fn create_task(&self, task: &NewTask) -> Option<String> {
            let mut created = self.created.lock().unwrap();
            created.push(task.clone());
            Some(format!("id-{}", created.len()))
        }

        fn get_task(&self, id: &str) -> Option<TrackedTask> {
            let created = self.created.lock().unwrap();
            let index: usize = id.strip_prefix("id-")?.parse().ok()?;
            let task = created.get(index - 1)?;
            Some(TrackedTask {
                id: id.to_string(),
                description: task.description.clone(),
                status: TrackedStatus::pending,
                due: task.due,
                priority: task.priority,
                project: None,
                tags: Vec::new(),
            })
        }

        fn mark_task_done(&self, _id: &str) -> bool {
            true
        }

        fn pending_tasks(&self) -> Vec<TrackedTask> {
            Vec::new()
        }
    }

    fn get_test_handler() -> (TaskVaultHandler, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let mut config = Config::default();
        config.vault.root = temp_dir.path().to_path_buf();
        let handler = TaskVaultHandler::with_tracker(config, Box::new(CountingTracker::default()));
        (handler, temp_dir)
    }

    #[tokio::test]
    async fn test_propose_then_apply() {
        let (handler, temp_dir) = get_test_handler();
        let note = temp_dir.path().join("inbox.md");
        fs::write(&note, "# Inbox\n- [ ] urgent: fix server\n").unwrap();

        let result = handler
            .propose_tasks("inbox.md".to_string(), Some("2025-10-07".to_string()))
            .await
            .unwrap();
        assert!(result.contains("Proposed 1 task(s) in inbox.md"));

        // 提案を承認する
        let staged = fs::read_to_string(&note).unwrap();
        fs::write(&note, staged.replace("- [ ] fix server", "- [a] fix server")).unwrap();

        let result = handler
            .apply_tasks("inbox.md".to_string(), Some("2025-10-07".to_string()))
            .await
            .unwrap();
        assert!(result.contains("1 created"));

        let text = fs::read_to_string(&note).unwrap();
        assert!(!text.contains("## TBD"));
        assert!(text.contains("- [ ] fix server (priority: high, uuid: id-1)"));
    }

    #[tokio::test]
    async fn test_scan_note_leaves_note_unchanged() {
        let (handler, temp_dir) = get_test_handler();
        let note = temp_dir.path().join("inbox.md");
        let content = "## Errands\n- [ ] buy milk\n";
        fs::write(&note, content).unwrap();

        let result = handler.scan_note("inbox.md".to_string()).await.unwrap();
        assert!(result.contains("- [ ] buy milk (line 2, section: Errands)"));
        assert_eq!(fs::read_to_string(&note).unwrap(), content);
    }

    #[tokio::test]
    async fn test_invalid_arguments() {
        let (handler, temp_dir) = get_test_handler();

        // 日付の形式が不正
        assert!(
            handler
                .propose_tasks("inbox.md".to_string(), Some("10/07/2025".to_string()))
                .await
                .is_err()
        );
        // 存在しないノート
        assert!(handler.scan_note("missing.md".to_string()).await.is_err());
        // TBDブロックがない
        fs::write(temp_dir.path().join("plain.md"), "# Plain\n").unwrap();
        assert!(handler.apply_tasks("plain.md".to_string(), None).await.is_err());
    }
}
