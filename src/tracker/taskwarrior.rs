//! TaskWarrior client that shells out to the `task` binary

use super::{NewTask, TaskTracker, TrackedStatus, TrackedTask};
use crate::config::TaskWarriorConfig;
use crate::nlp::Priority;
use anyhow::{Context, Result, bail};
use chrono::{Local, NaiveDate, NaiveDateTime, TimeZone, Utc};
use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use std::process::Command;

static CREATED_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Created task ([0-9a-fA-F]{8}-[0-9a-fA-F-]{27}|\d+)").unwrap());

/// A task as printed by `task export`
#[derive(Debug, Deserialize)]
struct ExportedTask {
    uuid: String,
    description: String,
    status: TrackedStatus,
    due: Option<String>,
    priority: Option<String>,
    project: Option<String>,
    #[serde(default)]
    tags: Vec<String>,
}

impl ExportedTask {
    fn into_tracked(self) -> TrackedTask {
        TrackedTask {
            due: self.due.as_deref().and_then(parse_export_date),
            priority: self.priority.as_deref().and_then(|p| p.parse().ok()),
            id: self.uuid,
            description: self.description,
            status: self.status,
            project: self.project,
            tags: self.tags,
        }
    }
}

/// TaskWarrior command-line client
pub struct TaskWarrior {
    config: TaskWarriorConfig,
}

impl TaskWarrior {
    pub fn new(config: TaskWarriorConfig) -> Self {
        Self { config }
    }

    /// Run `task` with the configured overrides followed by `args`
    ///
    /// # Returns
    /// Standard output of the command when it exits successfully
    fn run(&self, args: &[String]) -> Result<String> {
        debug!("event=taskwarrior_exec args={:?}", args);
        let output = Command::new(&self.config.binary)
            .args(&self.config.overrides)
            .args(args)
            .output()
            .with_context(|| format!("Failed to run '{}'", self.config.binary))?;

        if !output.status.success() {
            bail!(
                "'{} {}' failed ({}): {}",
                self.config.binary,
                args.join(" "),
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    fn export(&self, filter: &[String]) -> Result<Vec<TrackedTask>> {
        let mut args = filter.to_vec();
        args.push("export".to_string());
        let stdout = self.run(&args)?;
        parse_export(&stdout)
    }
}

impl TaskTracker for TaskWarrior {
    fn create_task(&self, task: &NewTask) -> Option<String> {
        let args = add_arguments(task);
        match self.run(&args) {
            Ok(stdout) => {
                let id = parse_created_id(&stdout);
                if id.is_none() {
                    warn!(
                        "event=taskwarrior_add status=no_id description={:?} output={:?}",
                        task.description,
                        stdout.trim()
                    );
                }
                id
            }
            Err(e) => {
                warn!("event=taskwarrior_add status=error error={:#}", e);
                None
            }
        }
    }

    fn get_task(&self, id: &str) -> Option<TrackedTask> {
        match self.export(&[id.to_string()]) {
            Ok(tasks) => tasks.into_iter().next(),
            Err(e) => {
                warn!("event=taskwarrior_get status=error id={} error={:#}", id, e);
                None
            }
        }
    }

    fn mark_task_done(&self, id: &str) -> bool {
        match self.run(&[id.to_string(), "done".to_string()]) {
            Ok(_) => true,
            Err(e) => {
                warn!("event=taskwarrior_done status=error id={} error={:#}", id, e);
                false
            }
        }
    }

    fn pending_tasks(&self) -> Vec<TrackedTask> {
        let filter: Vec<String> = self
            .config
            .pending_filter
            .split_whitespace()
            .map(str::to_string)
            .collect();
        self.export(&filter).unwrap_or_else(|e| {
            warn!("event=taskwarrior_export status=error error={:#}", e);
            Vec::new()
        })
    }
}

/// Build the argument list of `task add`
///
/// Attributes go before `--` so the description is never read as one.
fn add_arguments(task: &NewTask) -> Vec<String> {
    let mut args = vec!["rc.verbose=new-uuid".to_string(), "add".to_string()];
    if let Some(project) = &task.project {
        args.push(format!("project:{}", project));
    }
    if let Some(due) = task.due {
        args.push(format!("due:{}", due.format("%Y-%m-%d")));
    }
    if let Some(priority) = task.priority {
        args.push(format!("priority:{}", priority_code(priority)));
    }
    for tag in &task.tags {
        args.push(format!("+{}", tag));
    }
    args.push("--".to_string());
    args.push(task.description.clone());
    args
}

fn priority_code(priority: Priority) -> &'static str {
    match priority {
        Priority::high => "H",
        Priority::medium => "M",
        Priority::low => "L",
    }
}

fn parse_created_id(stdout: &str) -> Option<String> {
    CREATED_RE
        .captures(stdout)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

fn parse_export(stdout: &str) -> Result<Vec<TrackedTask>> {
    let trimmed = stdout.trim();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }
    let tasks: Vec<ExportedTask> =
        serde_json::from_str(trimmed).context("Failed to parse task export output")?;
    Ok(tasks.into_iter().map(ExportedTask::into_tracked).collect())
}

/// Convert an export timestamp (`20251006T220000Z`) to a local calendar date
fn parse_export_date(raw: &str) -> Option<NaiveDate> {
    let utc = NaiveDateTime::parse_from_str(raw, "%Y%m%dT%H%M%SZ").ok()?;
    Some(
        Utc.from_utc_datetime(&utc)
            .with_timezone(&Local)
            .date_naive(),
    )
}
