//! Formatting helper functions for tool and command output
//!
//! Summaries are plain text, shared by the CLI and the MCP tools.

use crate::daily::DailyOutcome;
use crate::pipeline::{ApplyOutcome, ProposeOutcome};
use crate::scanner::InformalTask;

/// Summarize a propose run
///
/// # Arguments
/// * `outcome` - The result of step 1
/// * `note` - Note name shown to the user
pub fn format_propose(outcome: &ProposeOutcome, note: &str) -> String {
    if outcome.proposals.is_empty() {
        return format!("No informal tasks found in {}", note);
    }

    let mut result = format!(
        "Proposed {} task(s) in {} ({} need review):\n\n",
        outcome.proposals.len(),
        note,
        outcome.needs_review()
    );
    for proposal in &outcome.proposals {
        result.push_str(&format!(
            "- {} (priority: {}",
            proposal.description, proposal.priority
        ));
        if let Some(due) = proposal.due {
            result.push_str(&format!(", due: {}", due));
        }
        result.push_str(")\n");
        if let Some(reason) = &proposal.review_reason {
            result.push_str(&format!("  Needs review: {}\n", reason));
        }
    }
    result.push_str("\nMark records with [a] or [r] in the TBD block, then run apply.");
    result
}

/// Summarize an apply run
pub fn format_apply(outcome: &ApplyOutcome, note: &str) -> String {
    let mut result = format!(
        "Applied TBD block in {}: {} approved, {} rejected, {} created, {} error(s)",
        note,
        outcome.approved,
        outcome.rejected,
        outcome.created.len(),
        outcome.errors.len()
    );
    if outcome.unmarked > 0 {
        result.push_str(&format!(", {} undecided", outcome.unmarked));
    }
    if outcome.dropped > 0 {
        result.push_str(&format!(", {} malformed record(s) skipped", outcome.dropped));
    }
    result.push('\n');

    for task in &outcome.created {
        result.push_str(&format!("- [{}] {}", task.id, task.description));
        if task.completed {
            result.push_str(" (done)");
        }
        result.push('\n');
    }
    for error in &outcome.errors {
        result.push_str(&format!("- FAILED {}: {}\n", error.description, error.reason));
    }

    if outcome.tbd_retained {
        result.push_str("\nTBD block kept: fix the remaining records and run apply again.");
    } else {
        result.push_str("\nTBD block removed.");
    }
    result
}

/// List informal tasks found by the scanner
pub fn format_informal_tasks(tasks: &[InformalTask], note: &str) -> String {
    if tasks.is_empty() {
        return format!("No informal tasks found in {}", note);
    }

    let mut result = format!("Found {} informal task(s) in {}:\n\n", tasks.len(), note);
    for task in tasks {
        result.push_str(&format!(
            "- [{}] {} (line {}, section: {})\n",
            task.checkbox.marker(),
            task.text,
            task.line_number + 1,
            task.section.as_deref().unwrap_or("top of document")
        ));
    }
    result
}

/// Summarize a daily note run
pub fn format_daily(outcome: &DailyOutcome) -> String {
    if outcome.created {
        format!(
            "Created daily note {} with {} task(s)",
            outcome.path.display(),
            outcome.tasks
        )
    } else {
        format!(
            "Daily note {} already exists; left unchanged",
            outcome.path.display()
        )
    }
}
