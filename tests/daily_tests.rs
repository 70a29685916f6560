//! Tests for daily note generation

mod common;

use chrono::NaiveDate;
use common::{MemoryTracker, get_test_handler, reference};
use std::fs;
use taskvault::{Priority, TrackedStatus, TrackedTask};
use tempfile::TempDir;

fn tracked(id: &str, due: Option<NaiveDate>, priority: Option<Priority>) -> TrackedTask {
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

#[tokio::test]
async fn test_daily_note_created_once() {
    let vault = TempDir::new().unwrap();
    let tomorrow = reference().succ_opt().unwrap();
    let tracker = MemoryTracker::with_tasks(vec![
        tracked("a", Some(tomorrow), Some(Priority::low)),
        tracked("b", Some(reference()), None),
        tracked("c", None, Some(Priority::high)),
    ]);
    let handler = get_test_handler(&vault, tracker);

    let result = handler
        .handle_daily(Some("2025-10-07".to_string()))
        .await
        .unwrap();
    assert!(result.contains("with 2 task(s)"));

    let path = vault.path().join("daily").join("2025-10-07.md");
    let text = fs::read_to_string(&path).unwrap();
    assert_eq!(
        text,
        "# 2025-10-07 Tuesday\n\n## Tasks\n- [ ] task c (priority: high, uuid: c)\n- [ ] task b (due: 2025-10-07, uuid: b)\n\n## Notes\n"
    );

    // 既存の日次ノートは上書きしない
    fs::write(&path, "# edited\n").unwrap();
    let result = handler
        .handle_daily(Some("2025-10-07".to_string()))
        .await
        .unwrap();
    assert!(result.contains("already exists"));
    assert_eq!(fs::read_to_string(&path).unwrap(), "# edited\n");
}

#[tokio::test]
async fn test_daily_note_invalid_date() {
    let vault = TempDir::new().unwrap();
    let handler = get_test_handler(&vault, MemoryTracker::default());

    assert!(handler.handle_daily(Some("2025-13-01".to_string())).await.is_err());
    assert!(!vault.path().join("daily").exists());
}
