//! Informal task scanner
//!
//! Finds checkbox lines in a note that are not yet tracked by the task
//! tracker (they carry no identifier marker) and records where they live.

use crate::layout::{NoteLayout, heading};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static CHECKBOX_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*[-*]\s?\[\s*([xX]|[^\]\sA-Za-z])?\s*\]\s+(\S.*?)\s*$").unwrap());

/// Fill state of a markdown checkbox
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Checkbox {
    Unfilled,
    /// Filled, keeping the original marker (`x` or `X`)
    Filled(char),
}

impl Checkbox {
    fn from_marker(marker: Option<char>) -> Self {
        match marker {
            Some(c @ ('x' | 'X')) => Checkbox::Filled(c),
            _ => Checkbox::Unfilled,
        }
    }

    pub fn is_filled(&self) -> bool {
        matches!(self, Checkbox::Filled(_))
    }

    /// The character written between the brackets
    pub fn marker(&self) -> char {
        match self {
            Checkbox::Filled(c) => *c,
            Checkbox::Unfilled => ' ',
        }
    }
}

/// A checkbox item found in a note that has no task identifier yet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InformalTask {
    /// Text after the checkbox marker
    pub text: String,
    /// Zero-indexed line number in the note
    pub line_number: usize,
    /// Nearest enclosing `##`-or-deeper heading, `None` at the top of the document
    pub section: Option<String>,
    pub checkbox: Checkbox,
    /// The complete source line
    pub original_line: String,
}

/// Parse a single line as a checkbox item
///
/// Returns the fill state and the trailing text, regardless of whether the
/// text carries an identifier marker.
pub(crate) fn parse_checkbox(line: &str) -> Option<(Checkbox, &str)> {
    let caps = CHECKBOX_RE.captures(line)?;
    let marker = caps.get(1).and_then(|m| m.as_str().chars().next());
    let text = caps.get(2)?.as_str();
    Some((Checkbox::from_marker(marker), text))
}

/// Scan a note for informal tasks
///
/// Lines are folded in order while tracking the current section. Level-one
/// headings are treated as the note title and do not start a section.
///
/// # Arguments
/// * `note` - Full note text
/// * `layout` - Provides the identifier marker that excludes tracked tasks
///
/// # Returns
/// Informal tasks in document order
pub fn scan(note: &str, layout: &NoteLayout) -> Vec<InformalTask> {
    let (_, tasks) = note.lines().enumerate().fold(
        (None::<String>, Vec::new()),
        |(section, mut tasks), (line_number, line)| {
            if let Some((level, title)) = heading(line) {
                let section = if level >= 2 {
                    Some(title.to_string())
                } else {
                    section
                };
                return (section, tasks);
            }

            if let Some((checkbox, text)) = parse_checkbox(line)
                && !layout.has_identifier(text)
            {
                tasks.push(InformalTask {
                    text: text.to_string(),
                    line_number,
                    section: section.clone(),
                    checkbox,
                    original_line: line.to_string(),
                });
            }
            (section, tasks)
        },
    );
    tasks
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan_default(note: &str) -> Vec<InformalTask> {
        scan(note, &NoteLayout::default())
    }

    #[test]
    fn test_scan_finds_checkboxes_with_sections() {
        let note = "# Daily\n- [ ] top item\n## Inbox\n- [ ] call mom today\n* [x] done thing\n### Work\n  - [X] ship it\n";
        let tasks = scan_default(note);
        assert_eq!(tasks.len(), 4);

        assert_eq!(tasks[0].text, "top item");
        assert_eq!(tasks[0].section, None);
        assert_eq!(tasks[0].line_number, 1);

        assert_eq!(tasks[1].section.as_deref(), Some("Inbox"));
        assert_eq!(tasks[1].checkbox, Checkbox::Unfilled);

        assert_eq!(tasks[2].checkbox, Checkbox::Filled('x'));
        assert_eq!(tasks[3].section.as_deref(), Some("Work"));
        assert_eq!(tasks[3].checkbox, Checkbox::Filled('X'));
        assert_eq!(tasks[3].original_line, "  - [X] ship it");
    }

    #[test]
    fn test_scan_skips_tracked_tasks() {
        let note = "## Tasks\n- [ ] fix server (uuid: 1234)\n- [ ] Pay rent UUID:abcd\n- [ ] new thing\n";
        let tasks = scan_default(note);
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].text, "new thing");
    }

    #[test]
    fn test_scan_tolerates_irregular_brackets() {
        // 括弧内の空白や空の括弧も検出する
        let note = "-[ ] no space after dash\n- [] empty brackets\n- [ x ] spaced fill\n- [  ] wide\n";
        let tasks = scan_default(note);
        assert_eq!(tasks.len(), 4);
        assert_eq!(tasks[1].checkbox, Checkbox::Unfilled);
        assert_eq!(tasks[2].checkbox, Checkbox::Filled('x'));
        assert_eq!(tasks[3].text, "wide");
    }

    #[test]
    fn test_scan_normalizes_other_fill_markers() {
        let tasks = scan_default("- [-] cancelled\n- [?] maybe\n");
        assert_eq!(tasks.len(), 2);
        assert!(tasks.iter().all(|t| t.checkbox == Checkbox::Unfilled));
    }

    #[test]
    fn test_scan_ignores_letter_markers() {
        assert!(scan_default("- [a] approved proposal\n- [r] rejected\n").is_empty());
    }

    #[test]
    fn test_scan_ignores_non_checkbox_lines() {
        let note = "- plain bullet\n[ ] no bullet\n- [ ]\n- [x]   \ntext - [ ] inline\n";
        assert!(scan_default(note).is_empty());
    }

    #[test]
    fn test_scan_level_one_heading_does_not_reset_section() {
        let note = "## Inbox\n# Another title\n- [ ] item\n";
        let tasks = scan_default(note);
        assert_eq!(tasks[0].section.as_deref(), Some("Inbox"));
    }
}
