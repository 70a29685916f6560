use super::{
    DONE_SUFFIX, Decision, LOCATION_PREFIX, NO_DUE, PROPOSED_PREFIX, REASON_PREFIX,
    REVIEW_PREFIX, TOP_OF_DOCUMENT, TbdBlock, TbdChunk, TbdError,
};
use crate::layout::{NoteLayout, section_range};
use crate::nlp::Priority;
use crate::proposal::TaskProposal;
use crate::scanner::{Checkbox, InformalTask};
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

static RECORD_START_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[-*]\s?\[(.)\]\s*(.*)$").unwrap());

/// Fields recovered from a record's metadata line
struct Metadata {
    description: String,
    due: Option<NaiveDate>,
    invalid_due: Option<String>,
    priority: Priority,
}

/// Locate and parse the TBD block of a note
///
/// # Errors
/// Returns [`TbdError::MissingBlock`] when the note has no TBD header.
pub fn parse_block(note: &str, layout: &NoteLayout) -> Result<TbdBlock, TbdError> {
    let header = layout.tbd_header();
    let lines: Vec<&str> = note.lines().collect();
    let (start, end) = section_range(&lines, &header)
        .ok_or_else(|| TbdError::MissingBlock(header.clone()))?;

    let mut preamble = Vec::new();
    let mut raw_chunks: Vec<(Decision, Vec<String>)> = Vec::new();

    for line in &lines[start + 1..end] {
        if let Some(decision) = record_start(line) {
            raw_chunks.push((decision, vec![line.to_string()]));
        } else if let Some((_, chunk)) = raw_chunks.last_mut() {
            chunk.push(line.to_string());
        } else {
            preamble.push(line.to_string());
        }
    }

    let chunks = raw_chunks
        .into_iter()
        .map(|(decision, mut lines)| {
            while lines.last().is_some_and(|l| l.trim().is_empty()) {
                lines.pop();
            }
            let proposal = parse_record(&lines);
            TbdChunk {
                lines,
                decision,
                proposal,
            }
        })
        .collect();

    while preamble.last().is_some_and(|l| l.trim().is_empty()) {
        preamble.pop();
    }

    Ok(TbdBlock {
        start,
        end,
        preamble,
        chunks,
    })
}

fn record_start(line: &str) -> Option<Decision> {
    let caps = RECORD_START_RE.captures(line)?;
    let marker = caps.get(1)?.as_str().chars().next()?;
    Decision::from_marker(marker)
}

/// Rebuild a proposal from the lines of one record
///
/// Returns `None` when the metadata line is missing or malformed.
fn parse_record(lines: &[String]) -> Option<TaskProposal> {
    let field = |prefix: &str| {
        lines
            .iter()
            .skip(1)
            .map(|l| l.trim())
            .find_map(|l| l.strip_prefix(prefix).map(str::trim))
    };

    let metadata = parse_metadata(field(PROPOSED_PREFIX)?)?;
    let (section, line_number, checkbox) = field(LOCATION_PREFIX)
        .map(parse_location)
        .unwrap_or((None, 0, Checkbox::Unfilled));
    let priority_reason = field(REASON_PREFIX)
        .filter(|r| !r.is_empty())
        .map(str::to_string);

    let mut review_reason = field(REVIEW_PREFIX).map(|r| {
        if r.is_empty() {
            "needs review".to_string()
        } else {
            r.to_string()
        }
    });
    if review_reason.is_none()
        && let Some(bad) = &metadata.invalid_due
    {
        review_reason = Some(format!("invalid due date '{}'", bad));
    }

    Some(TaskProposal {
        source: InformalTask {
            text: metadata.description.clone(),
            line_number,
            section,
            checkbox,
            original_line: String::new(),
        },
        description: metadata.description,
        due: metadata.due,
        priority: metadata.priority,
        project: None,
        tags: Vec::new(),
        priority_reason,
        needs_review: review_reason.is_some(),
        review_reason,
    })
}

/// Parse `desc | due: YYYY-MM-DD | priority: level`
///
/// Keyed fields are only read from the trailing `|` pieces; everything in
/// front of them is the description, kept verbatim.
fn parse_metadata(value: &str) -> Option<Metadata> {
    let mut rest = value;
    let mut due_field = None;
    let mut priority_field = None;

    while let Some((head, tail)) = rest.rsplit_once('|') {
        let tail = tail.trim();
        if due_field.is_none()
            && let Some(raw) = tail.strip_prefix("due:")
        {
            due_field = Some(raw.trim());
        } else if priority_field.is_none()
            && let Some(raw) = tail.strip_prefix("priority:")
        {
            priority_field = Some(raw.trim());
        } else {
            break;
        }
        rest = head;
    }

    let description = rest.trim().to_string();
    if description.is_empty() {
        return None;
    }
    let priority = priority_field?.parse::<Priority>().ok()?;

    let (due, invalid_due) = match due_field {
        None => (None, None),
        Some(raw) if raw.is_empty() || raw.eq_ignore_ascii_case(NO_DUE) => (None, None),
        Some(raw) => match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
            Ok(d) => (Some(d), None),
            Err(_) => (None, Some(raw.to_string())),
        },
    };

    Some(Metadata {
        description,
        due,
        invalid_due,
        priority,
    })
}

/// Parse `Section, line N` with an optional ` (done)` suffix
///
/// The written line number is 1-indexed; the result is 0-indexed.
fn parse_location(value: &str) -> (Option<String>, usize, Checkbox) {
    let (value, checkbox) = match value.strip_suffix(DONE_SUFFIX) {
        Some(rest) => (rest, Checkbox::Filled('x')),
        None => (value, Checkbox::Unfilled),
    };

    let Some((section, line)) = value.rsplit_once(", line ") else {
        return (None, 0, checkbox);
    };
    let section = match section.trim() {
        "" | TOP_OF_DOCUMENT => None,
        name => Some(name.to_string()),
    };
    let line_number = line
        .trim()
        .parse::<usize>()
        .map(|n| n.saturating_sub(1))
        .unwrap_or(0);
    (section, line_number, checkbox)
}
