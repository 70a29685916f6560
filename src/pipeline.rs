//! Propose / apply pipeline
//!
//! Step 1 (`propose`) stages proposals for every informal task in a TBD
//! block. The user then marks records in the block, and step 2 (`apply`)
//! creates the approved tasks and rewrites the note. Step 2 keeps the block
//! when something still needs attention, so it can simply be run again.
//!
//! The `*_text` functions are pure apart from the tracker calls; the
//! `*_file` functions wrap them with note storage.

use crate::layout::NoteLayout;
use crate::materialize::{CreatedTask, MaterializeError, materialize};
use crate::proposal::{TaskProposal, generate_all};
use crate::reorganize::{Reorganization, reorganize};
use crate::scanner::scan;
use crate::storage::NoteStorage;
use crate::tbd::{self, Decision, TbdError};
use crate::tracker::TaskTracker;
use anyhow::Result;
use chrono::NaiveDate;
use log::info;
use std::path::Path;

/// Result of step 1
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProposeOutcome {
    /// Note text with a fresh TBD block
    pub text: String,
    pub proposals: Vec<TaskProposal>,
}

impl ProposeOutcome {
    pub fn needs_review(&self) -> usize {
        self.proposals.iter().filter(|p| p.needs_review).count()
    }
}

/// Result of step 2
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplyOutcome {
    /// Reorganized note text
    pub text: String,
    pub approved: usize,
    pub rejected: usize,
    pub unmarked: usize,
    /// Records dropped because their metadata line was missing or malformed
    pub dropped: usize,
    pub created: Vec<CreatedTask>,
    pub errors: Vec<MaterializeError>,
    /// The TBD block is still in the note and step 2 can be rerun
    pub tbd_retained: bool,
}

/// Step 1 on note text
///
/// Any existing TBD block is discarded before scanning, so running this twice
/// yields the same note.
pub fn propose_text(note: &str, reference: NaiveDate, layout: &NoteLayout) -> ProposeOutcome {
    let body = tbd::strip_block(note, layout);
    let tasks = scan(&body, layout);
    let proposals = generate_all(&tasks, reference);
    let text = tbd::replace_block(&body, &proposals, layout);
    ProposeOutcome { text, proposals }
}

/// Step 2 on note text
///
/// # Errors
/// [`TbdError::MissingBlock`] when the note has no TBD block.
pub fn apply_text(
    note: &str,
    reference: NaiveDate,
    layout: &NoteLayout,
    tracker: &dyn TaskTracker,
) -> Result<ApplyOutcome, TbdError> {
    let block = tbd::parse_block(note, layout)?;
    let review = block.review();
    let materialized = materialize(&review.approved, tracker);

    let pending_review = block.chunks.iter().any(|chunk| {
        chunk.decision != Decision::Rejected
            && chunk.proposal.as_ref().is_some_and(|p| p.needs_review)
    });
    let has_errors = !materialized.errors.is_empty() || pending_review;

    let text = reorganize(
        note,
        &Reorganization {
            created: &materialized.created,
            approved: &review.approved,
            rejected: &review.rejected,
            has_errors,
            reference,
        },
        layout,
    );

    Ok(ApplyOutcome {
        text,
        approved: review.approved.len(),
        rejected: review.rejected.len(),
        unmarked: review.unmarked,
        dropped: review.dropped,
        created: materialized.created,
        errors: materialized.errors,
        tbd_retained: has_errors,
    })
}

/// Step 1 on a note file
pub fn propose_file(
    path: &Path,
    reference: NaiveDate,
    layout: &NoteLayout,
    storage: &NoteStorage,
) -> Result<ProposeOutcome> {
    let note = storage.load(path)?;
    let outcome = propose_text(&note, reference, layout);
    info!(
        "event=propose note={} proposals={} needs_review={}",
        path.display(),
        outcome.proposals.len(),
        outcome.needs_review()
    );

    if outcome.text != note {
        storage.save_with_message(
            path,
            &outcome.text,
            &format!(
                "Propose {} task(s) in {}",
                outcome.proposals.len(),
                file_label(path)
            ),
        )?;
    }
    Ok(outcome)
}

/// Step 2 on a note file
pub fn apply_file(
    path: &Path,
    reference: NaiveDate,
    layout: &NoteLayout,
    storage: &NoteStorage,
    tracker: &dyn TaskTracker,
) -> Result<ApplyOutcome> {
    let note = storage.load(path)?;
    let outcome = apply_text(&note, reference, layout, tracker)?;
    info!(
        "event=apply note={} approved={} rejected={} created={} errors={} dropped={} tbd_retained={}",
        path.display(),
        outcome.approved,
        outcome.rejected,
        outcome.created.len(),
        outcome.errors.len(),
        outcome.dropped,
        outcome.tbd_retained
    );

    storage.save_with_message(
        path,
        &outcome.text,
        &format!(
            "Apply TBD block in {}: {} task(s) created",
            file_label(path),
            outcome.created.len()
        ),
    )?;
    Ok(outcome)
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
