//! Note reorganizer
//!
//! Rewrites a note after the apply step: consumed informal checkboxes are
//! removed, created tasks are recorded, and urgent or due-today tasks are
//! promoted into the primary task section.

use crate::layout::{NoteLayout, heading, join_lines, section_range};
use crate::materialize::CreatedTask;
use crate::nlp::Priority;
use crate::proposal::TaskProposal;
use crate::scanner::parse_checkbox;
use crate::tbd::parse_block;
use chrono::NaiveDate;
use std::collections::HashSet;

/// Everything the reorganizer needs to know about an apply run
pub struct Reorganization<'a> {
    pub created: &'a [CreatedTask],
    pub approved: &'a [TaskProposal],
    pub rejected: &'a [TaskProposal],
    /// Keep the TBD block because something still needs attention
    pub has_errors: bool,
    pub reference: NaiveDate,
}

/// Render a created task as a tracked checkbox line
pub fn task_line(task: &CreatedTask, layout: &NoteLayout) -> String {
    format_task_line(
        &task.description,
        task.due,
        Some(task.priority),
        &task.id,
        task.completed,
        layout,
    )
}

/// Format `- [ ] description (due: ..., priority: ..., uuid: ...)`
pub fn format_task_line(
    description: &str,
    due: Option<NaiveDate>,
    priority: Option<Priority>,
    id: &str,
    completed: bool,
    layout: &NoteLayout,
) -> String {
    let mut fields = Vec::new();
    if let Some(due) = due {
        fields.push(format!("due: {}", due.format("%Y-%m-%d")));
    }
    if let Some(priority) = priority {
        fields.push(format!("priority: {}", priority));
    }
    fields.push(format!("{} {}", layout.identifier_marker.trim_end(), id));

    let marker = if completed { 'x' } else { ' ' };
    format!("- [{}] {} ({})", marker, description, fields.join(", "))
}

/// Rewrite `note` for a finished apply run
///
/// # Arguments
/// * `note` - Note text including the TBD block that was applied
/// * `run` - Created tasks, decisions and the error flag of the run
/// * `layout` - Section headings and identifier marker
pub fn reorganize(note: &str, run: &Reorganization<'_>, layout: &NoteLayout) -> String {
    let lines: Vec<&str> = note.lines().collect();
    let block = parse_block(note, layout).ok();
    let (block_start, block_end) = block
        .as_ref()
        .map(|b| (b.start, b.end))
        .unwrap_or((lines.len(), lines.len()));

    let consumed = consumed_descriptions(run);
    let protected = rejected_lines(&lines[..block_start], run.rejected, layout);

    let keep_line = |index: usize, line: &str| {
        protected.contains(&index) || !is_consumed(line, &consumed, layout)
    };

    let mut result: Vec<String> = lines[..block_start]
        .iter()
        .enumerate()
        .filter(|(i, l)| keep_line(*i, l))
        .map(|(_, l)| l.to_string())
        .collect();

    if run.has_errors
        && let Some(block) = &block
    {
        let approved_chunks = block.approved_chunks();
        let pruned: HashSet<usize> = run
            .created
            .iter()
            .filter_map(|t| approved_chunks.get(t.approved_index).copied())
            .collect();
        result.extend(block.render_retaining(layout, |index, _| !pruned.contains(&index)));
        result.push(String::new());
    }

    result.extend(
        lines
            .iter()
            .enumerate()
            .skip(block_end)
            .filter(|(i, l)| keep_line(*i, l))
            .map(|(_, l)| l.to_string()),
    );

    trim_trailing_blank(&mut result);
    append_created(&mut result, run.created, layout);
    promote(&mut result, run, layout);
    join_lines(&result)
}

/// Lowercased descriptions of approved proposals that became tasks
fn consumed_descriptions(run: &Reorganization<'_>) -> Vec<String> {
    run.created
        .iter()
        .filter_map(|t| run.approved.get(t.approved_index))
        .map(|p| p.description.to_lowercase())
        .collect()
}

/// Indices of the original checkbox lines of rejected proposals
///
/// A rejected proposal protects only the line its record points at, and only
/// while that line still carries its description.
fn rejected_lines(lines: &[&str], rejected: &[TaskProposal], layout: &NoteLayout) -> HashSet<usize> {
    rejected
        .iter()
        .filter_map(|p| {
            let index = p.source.line_number;
            let (_, text) = parse_checkbox(lines.get(index)?)?;
            let matches = !layout.has_identifier(text)
                && text.to_lowercase().contains(&p.description.to_lowercase());
            matches.then_some(index)
        })
        .collect()
}

/// Whether `line` is an informal checkbox consumed by a created task
///
/// Matching is a substring test on the cleaned description, so two
/// informal tasks whose descriptions overlap can both match.
fn is_consumed(line: &str, consumed: &[String], layout: &NoteLayout) -> bool {
    let Some((_, text)) = parse_checkbox(line) else {
        return false;
    };
    if layout.has_identifier(text) {
        return false;
    }
    let text = text.to_lowercase();
    consumed.iter().any(|d| text.contains(d.as_str()))
}

fn trim_trailing_blank(lines: &mut Vec<String>) {
    while lines.last().is_some_and(|l| l.trim().is_empty()) {
        lines.pop();
    }
}

/// Add created tasks to the created-tasks section, creating it at the end if needed
fn append_created(lines: &mut Vec<String>, created: &[CreatedTask], layout: &NoteLayout) {
    if created.is_empty() {
        return;
    }
    let entries: Vec<String> = created.iter().map(|t| task_line(t, layout)).collect();
    let header = layout.created_header();

    let borrowed: Vec<&str> = lines.iter().map(String::as_str).collect();
    match section_range(&borrowed, &header) {
        Some((start, end)) => {
            let mut insert_at = end;
            while insert_at > start + 1 && lines[insert_at - 1].trim().is_empty() {
                insert_at -= 1;
            }
            lines.splice(insert_at..insert_at, entries);
        }
        None => {
            if !lines.is_empty() {
                lines.push(String::new());
            }
            lines.push(header);
            lines.extend(entries);
        }
    }
}

/// Copy high-priority and due-today tasks into the primary task section
///
/// A missing section is created right after the note title.
fn promote(lines: &mut Vec<String>, run: &Reorganization<'_>, layout: &NoteLayout) {
    let entries: Vec<String> = run
        .created
        .iter()
        .filter(|t| t.priority == Priority::high || t.due == Some(run.reference))
        .map(|t| task_line(t, layout))
        .collect();
    if entries.is_empty() {
        return;
    }

    let header = layout.primary_header();
    let borrowed: Vec<&str> = lines.iter().map(String::as_str).collect();
    if let Some((start, _)) = section_range(&borrowed, &header) {
        lines.splice(start + 1..start + 1, entries);
        return;
    }

    let title_end = match lines.first().and_then(|l| heading(l)) {
        Some((1, _)) => 1,
        _ => 0,
    };
    let mut section = Vec::new();
    if title_end > 0 {
        section.push(String::new());
    }
    section.push(header);
    section.extend(entries);
    if lines.len() > title_end {
        section.push(String::new());
    }

    let mut rest = title_end;
    while rest < lines.len() && lines[rest].trim().is_empty() {
        rest += 1;
    }
    lines.splice(title_end..rest, section);
}
