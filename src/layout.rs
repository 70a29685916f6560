//! Note layout settings shared by the scanner, the TBD block and the reorganizer
//!
//! Everything that decides *where* things go in a note (section headings and
//! the marker that identifies already-tracked tasks) lives here so the rest of
//! the core can stay free of string constants.

use serde::{Deserialize, Serialize};

/// Section headings and markers used when reading and rewriting notes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoteLayout {
    /// Case-insensitive marker that identifies a line as an already-tracked task
    pub identifier_marker: String,
    /// Heading text of the review block (without the leading `## `)
    pub tbd_heading: String,
    /// Heading text of the section listing tasks created by the last apply
    pub created_heading: String,
    /// Heading text of the primary task section of a note
    pub primary_heading: String,
}

impl Default for NoteLayout {
    fn default() -> Self {
        Self {
            identifier_marker: "uuid:".to_string(),
            tbd_heading: "TBD: Proposed Tasks".to_string(),
            created_heading: "Created Tasks".to_string(),
            primary_heading: "Tasks".to_string(),
        }
    }
}

impl NoteLayout {
    /// Full markdown header line of the TBD block
    pub fn tbd_header(&self) -> String {
        format!("## {}", self.tbd_heading)
    }

    /// Full markdown header line of the created-tasks section
    pub fn created_header(&self) -> String {
        format!("## {}", self.created_heading)
    }

    /// Full markdown header line of the primary task section
    pub fn primary_header(&self) -> String {
        format!("## {}", self.primary_heading)
    }

    /// Check whether `text` carries the task identifier marker
    pub fn has_identifier(&self, text: &str) -> bool {
        text.to_lowercase()
            .contains(&self.identifier_marker.to_lowercase())
    }
}

/// Heading level and text of a markdown ATX heading line, if it is one
pub(crate) fn heading(line: &str) -> Option<(usize, &str)> {
    let trimmed = line.trim_end();
    let level = trimmed.chars().take_while(|c| *c == '#').count();
    if level == 0 || level > 6 {
        return None;
    }
    let rest = &trimmed[level..];
    if !rest.is_empty() && !rest.starts_with(' ') {
        return None;
    }
    Some((level, rest.trim()))
}

/// Find the line range `[start, end)` of the section whose header is `header`
///
/// The section ends at the next heading of the same or a higher level, or at
/// the end of the document.
pub(crate) fn section_range(lines: &[&str], header: &str) -> Option<(usize, usize)> {
    let (level, title) = heading(header)?;
    let start = lines
        .iter()
        .position(|line| matches!(heading(line), Some((l, t)) if l == level && t == title))?;
    let end = lines[start + 1..]
        .iter()
        .position(|line| matches!(heading(line), Some((l, _)) if l <= level))
        .map(|offset| start + 1 + offset)
        .unwrap_or(lines.len());
    Some((start, end))
}

/// Join lines back into note text, ending with exactly one newline
pub(crate) fn join_lines<S: AsRef<str>>(lines: &[S]) -> String {
    let mut text = lines
        .iter()
        .map(|l| l.as_ref())
        .collect::<Vec<_>>()
        .join("\n");
    let trimmed_len = text.trim_end().len();
    text.truncate(trimmed_len);
    text.push('\n');
    text
}
