//! External task tracker
//!
//! The core only needs a handful of operations from the tracker, all of which
//! report failure as "no result" instead of an error:
//! - `create_task`: create a task, returning its identifier
//! - `get_task`: fetch the canonical record of a task
//! - `mark_task_done`: complete a task
//! - `pending_tasks`: list tasks matching the configured pending filter

mod taskwarrior;

pub use taskwarrior::TaskWarrior;

use crate::nlp::Priority;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Fields for a task to be created
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NewTask {
    pub description: String,
    pub project: Option<String>,
    pub due: Option<NaiveDate>,
    pub priority: Option<Priority>,
    pub tags: Vec<String>,
}

/// Task status as reported by the tracker
#[allow(non_camel_case_types)]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrackedStatus {
    pending,
    completed,
    deleted,
    waiting,
    recurring,
}

/// A task as stored by the tracker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackedTask {
    pub id: String,
    pub description: String,
    pub status: TrackedStatus,
    pub due: Option<NaiveDate>,
    pub priority: Option<Priority>,
    pub project: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Operations the core consumes from the task tracker
pub trait TaskTracker: Send + Sync {
    /// Create a task; `None` when the tracker did not create it
    fn create_task(&self, task: &NewTask) -> Option<String>;

    /// Fetch a task by identifier
    fn get_task(&self, id: &str) -> Option<TrackedTask>;

    /// Mark a task completed; `false` on failure
    fn mark_task_done(&self, id: &str) -> bool;

    /// Tasks matching the tracker's pending filter
    fn pending_tasks(&self) -> Vec<TrackedTask>;
}
