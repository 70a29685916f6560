//! Tests for the MCP tool handlers

mod common;

use common::{MemoryTracker, get_test_handler, mark, vault_with_note};
use std::fs;

const NOTE: &str = "# Inbox\n- [ ] call mom tomorrow\n- [ ] important: book flights\n";

#[tokio::test]
async fn test_handle_propose_and_apply() {
    let (vault, path) = vault_with_note("inbox.md", NOTE);
    let handler = get_test_handler(&vault, MemoryTracker::default());

    let result = handler
        .handle_propose("inbox.md".to_string(), Some("2025-10-07".to_string()))
        .await
        .unwrap();
    assert!(result.contains("Proposed 2 task(s) in inbox.md (0 need review)"));
    assert!(result.contains("- call mom (priority: low, due: 2025-10-08)"));
    assert!(result.contains("- book flights (priority: medium)"));

    let staged = fs::read_to_string(&path).unwrap();
    let staged = mark(&staged, "call mom", 'a');
    let staged = mark(&staged, "book flights", 'r');
    fs::write(&path, staged).unwrap();

    let result = handler
        .handle_apply("inbox.md".to_string(), Some("2025-10-07".to_string()))
        .await
        .unwrap();
    assert!(result.starts_with(
        "Applied TBD block in inbox.md: 1 approved, 1 rejected, 1 created, 0 error(s)"
    ));
    assert!(result.ends_with("TBD block removed."));

    let text = fs::read_to_string(&path).unwrap();
    assert_eq!(
        text,
        "# Inbox\n- [ ] important: book flights\n\n## Created Tasks\n- [ ] call mom (due: 2025-10-08, priority: low, uuid: t-1)\n"
    );
}

#[tokio::test]
async fn test_handle_apply_reports_failures() {
    let (vault, path) = vault_with_note("inbox.md", NOTE);
    let handler = get_test_handler(&vault, MemoryTracker::failing_on(&["call mom"]));

    handler
        .handle_propose("inbox.md".to_string(), Some("2025-10-07".to_string()))
        .await
        .unwrap();
    let staged = mark(&fs::read_to_string(&path).unwrap(), "call mom", 'a');
    fs::write(&path, staged).unwrap();

    let result = handler
        .handle_apply("inbox.md".to_string(), Some("2025-10-07".to_string()))
        .await
        .unwrap();
    assert!(result.contains("- FAILED call mom: task creation failed"));
    assert!(result.contains("TBD block kept"));
    assert!(fs::read_to_string(&path).unwrap().contains("- [a] call mom"));
}

#[tokio::test]
async fn test_handle_apply_without_block() {
    let (vault, _path) = vault_with_note("inbox.md", NOTE);
    let handler = get_test_handler(&vault, MemoryTracker::default());

    let result = handler.handle_apply("inbox.md".to_string(), None).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_handle_scan() {
    let (vault, _path) = vault_with_note("inbox.md", NOTE);
    let handler = get_test_handler(&vault, MemoryTracker::default());

    let result = handler.handle_scan("inbox.md".to_string()).await.unwrap();
    assert!(result.starts_with("Found 2 informal task(s) in inbox.md"));
    assert!(result.contains("- [ ] call mom tomorrow (line 2, section: top of document)"));
}

#[tokio::test]
async fn test_invalid_note_arguments() {
    let (vault, _path) = vault_with_note("inbox.md", NOTE);
    let handler = get_test_handler(&vault, MemoryTracker::default());

    assert!(handler.handle_scan("".to_string()).await.is_err());
    assert!(handler.handle_scan("inbox.txt".to_string()).await.is_err());
    assert!(handler.handle_propose("missing.md".to_string(), None).await.is_err());
    assert!(
        handler
            .handle_propose("inbox.md".to_string(), Some("tomorrow".to_string()))
            .await
            .is_err()
    );
    // ノートは変更されない
    assert_eq!(fs::read_to_string(vault.path().join("inbox.md")).unwrap(), NOTE);
}
