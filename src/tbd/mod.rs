//! TBD review block
//!
//! The TBD block is a markdown section appended to a note that lists task
//! proposals waiting for a decision. It is both the on-disk format between
//! the propose and apply steps and the surface the user edits:
//!
//! ```text
//! ## TBD: Proposed Tasks
//! Mark each proposal: [a] approve, [r] reject; leave [ ] to decide later.
//!
//! - [ ] call mom
//!     - proposed: call mom | due: 2025-10-07 | priority: low
//!     - location: Inbox, line 4
//! ```
//!
//! - `render`: proposals → block text, replacing any previous block
//! - `parse`: block text → records grouped by decision

mod parse;
mod render;

pub use parse::parse_block;
pub use render::{render_block, render_record, replace_block};

use crate::layout::{NoteLayout, join_lines, section_range};
use crate::proposal::TaskProposal;
use thiserror::Error;

pub(crate) const INSTRUCTIONS: &str =
    "Mark each proposal: [a] approve, [r] reject; leave [ ] to decide later.";
pub(crate) const PROPOSED_PREFIX: &str = "- proposed:";
pub(crate) const LOCATION_PREFIX: &str = "- location:";
pub(crate) const REASON_PREFIX: &str = "- reason:";
pub(crate) const REVIEW_PREFIX: &str = "- needs review:";
pub(crate) const TOP_OF_DOCUMENT: &str = "top of document";
pub(crate) const DONE_SUFFIX: &str = " (done)";
pub(crate) const NO_DUE: &str = "none";
pub(crate) const RECORD_INDENT: &str = "    ";

/// Errors raised while locating the TBD block
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TbdError {
    #[error("no '{0}' section found in note; run propose first")]
    MissingBlock(String),
}

/// User decision on one proposal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Unmarked,
    Approved,
    Rejected,
}

impl Decision {
    /// Interpret the character between a record's brackets
    pub fn from_marker(marker: char) -> Option<Self> {
        match marker {
            ' ' => Some(Decision::Unmarked),
            'a' | 'A' | 'x' | 'X' => Some(Decision::Approved),
            'r' | 'R' | '-' => Some(Decision::Rejected),
            _ => None,
        }
    }

    /// Canonical marker written when rendering
    pub fn marker(&self) -> char {
        match self {
            Decision::Unmarked => ' ',
            Decision::Approved => 'a',
            Decision::Rejected => 'r',
        }
    }
}

/// One record of the block, as it appears in the note
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TbdChunk {
    /// Raw lines, starting with the record's checkbox line
    pub lines: Vec<String>,
    pub decision: Decision,
    /// `None` when the metadata line is missing or malformed
    pub proposal: Option<TaskProposal>,
}

/// A parsed TBD block together with its position in the note
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TbdBlock {
    /// Zero-indexed line of the block header
    pub start: usize,
    /// One past the last line of the block
    pub end: usize,
    /// Lines between the header and the first record
    pub preamble: Vec<String>,
    pub chunks: Vec<TbdChunk>,
}

/// Proposals grouped by the user's decisions
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Review {
    pub approved: Vec<TaskProposal>,
    pub rejected: Vec<TaskProposal>,
    /// Well-formed records the user has not decided on yet
    pub unmarked: usize,
    /// Records skipped because their metadata line was missing or malformed
    pub dropped: usize,
}

impl TbdBlock {
    /// Group well-formed records by decision
    ///
    /// Malformed records end up in neither list; they are only counted.
    pub fn review(&self) -> Review {
        let mut review = Review::default();
        for chunk in &self.chunks {
            let Some(proposal) = &chunk.proposal else {
                review.dropped += 1;
                continue;
            };
            match chunk.decision {
                Decision::Approved => review.approved.push(proposal.clone()),
                Decision::Rejected => review.rejected.push(proposal.clone()),
                Decision::Unmarked => review.unmarked += 1,
            }
        }
        review
    }

    /// Chunk index of each approved record, in the order of `review().approved`
    pub fn approved_chunks(&self) -> Vec<usize> {
        self.chunks
            .iter()
            .enumerate()
            .filter(|(_, chunk)| chunk.decision == Decision::Approved && chunk.proposal.is_some())
            .map(|(index, _)| index)
            .collect()
    }

    /// Render the block again, keeping only chunks accepted by `keep`
    ///
    /// Kept chunks are written back verbatim, including user edits.
    pub fn render_retaining<F>(&self, layout: &NoteLayout, keep: F) -> Vec<String>
    where
        F: Fn(usize, &TbdChunk) -> bool,
    {
        let mut lines = vec![layout.tbd_header()];
        lines.extend(self.preamble.iter().cloned());
        for (_, chunk) in self.chunks.iter().enumerate().filter(|(i, chunk)| keep(*i, chunk)) {
            if lines.last().is_some_and(|l| !l.trim().is_empty()) {
                lines.push(String::new());
            }
            lines.extend(chunk.lines.iter().cloned());
        }
        lines
    }
}

/// Remove every TBD block from a note
pub fn strip_block(note: &str, layout: &NoteLayout) -> String {
    let header = layout.tbd_header();
    let mut lines: Vec<&str> = note.lines().collect();
    let mut removed = false;
    while let Some((start, end)) = section_range(&lines, &header) {
        lines.drain(start..end);
        removed = true;
    }
    if !removed {
        return note.to_string();
    }
    join_lines(&lines)
}
