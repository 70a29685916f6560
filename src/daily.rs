//! Daily note generation
//!
//! A daily note lists the pending tasks worth looking at on a given day:
//! anything overdue, due that day, or of high priority.

use crate::config::VaultConfig;
use crate::layout::NoteLayout;
use crate::nlp::Priority;
use crate::reorganize::format_task_line;
use crate::storage::NoteStorage;
use crate::tracker::{TaskTracker, TrackedStatus, TrackedTask};
use anyhow::Result;
use chrono::NaiveDate;
use log::info;
use std::path::PathBuf;

/// Result of writing a daily note
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyOutcome {
    pub path: PathBuf,
    /// `false` when the note already existed and was left alone
    pub created: bool,
    pub tasks: usize,
}

/// Pending tasks for `date`, most important first
///
/// Sorted by priority (high first, unset last), then due date (undated last).
pub fn select_tasks(tasks: &[TrackedTask], date: NaiveDate) -> Vec<&TrackedTask> {
    let mut selected: Vec<&TrackedTask> = tasks
        .iter()
        .filter(|t| t.status == TrackedStatus::pending)
        .filter(|t| t.priority == Some(Priority::high) || t.due.is_some_and(|d| d <= date))
        .collect();
    selected.sort_by_key(|t| (t.priority.is_none(), t.priority, t.due.is_none(), t.due));
    selected
}

/// Render the daily note for `date`
pub fn render_daily_note(date: NaiveDate, tasks: &[TrackedTask], layout: &NoteLayout) -> String {
    let mut lines = vec![
        format!("# {}", date.format("%Y-%m-%d %A")),
        String::new(),
        layout.primary_header(),
    ];
    lines.extend(select_tasks(tasks, date).into_iter().map(|t| {
        format_task_line(&t.description, t.due, t.priority, &t.id, false, layout)
    }));
    lines.push(String::new());
    lines.push("## Notes".to_string());

    let mut text = lines.join("\n");
    text.push('\n');
    text
}

/// Write the daily note for `date` into the vault unless it already exists
pub fn daily_note_file(
    date: NaiveDate,
    vault: &VaultConfig,
    layout: &NoteLayout,
    storage: &NoteStorage,
    tracker: &dyn TaskTracker,
) -> Result<DailyOutcome> {
    let path = vault.daily_note_path(date);
    let pending = tracker.pending_tasks();
    let tasks = select_tasks(&pending, date).len();
    let text = render_daily_note(date, &pending, layout);

    let created = storage.create_new(
        &path,
        &text,
        &format!("Create daily note {}", date.format("%Y-%m-%d")),
    )?;
    info!(
        "event=daily_note path={} created={} tasks={}",
        path.display(),
        created,
        tasks
    );

    Ok(DailyOutcome {
        path,
        created,
        tasks,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 10, d).unwrap()
    }

    fn task(id: &str, due: Option<NaiveDate>, priority: Option<Priority>) -> TrackedTask {
        TrackedTask {
            id: id.to_string(),
            description: format!("task {}", id),
            status: TrackedStatus::pending,
            due,
            priority,
            project: None,
            tags: Vec::new(),
        }
    }

    #[test]
    fn test_select_tasks() {
        let mut done = task("done", Some(date(7)), Some(Priority::high));
        done.status = TrackedStatus::completed;
        let tasks = vec![
            task("later", Some(date(20)), Some(Priority::low)),
            task("overdue", Some(date(1)), None),
            task("today", Some(date(7)), Some(Priority::medium)),
            task("urgent", None, Some(Priority::high)),
            done,
        ];
        let ids: Vec<_> = select_tasks(&tasks, date(7))
            .iter()
            .map(|t| t.id.as_str())
            .collect();
        assert_eq!(ids, vec!["urgent", "today", "overdue"]);
    }

    #[test]
    fn test_render_daily_note() {
        let tasks = vec![task("u-1", Some(date(7)), Some(Priority::high))];
        let text = render_daily_note(date(7), &tasks, &NoteLayout::default());
        assert_eq!(
            text,
            "# 2025-10-07 Tuesday\n\n## Tasks\n- [ ] task u-1 (due: 2025-10-07, priority: high, uuid: u-1)\n\n## Notes\n"
        );
    }

    #[test]
    fn test_render_daily_note_without_tasks() {
        let text = render_daily_note(date(7), &[], &NoteLayout::default());
        assert_eq!(text, "# 2025-10-07 Tuesday\n\n## Tasks\n\n## Notes\n");
    }
}
