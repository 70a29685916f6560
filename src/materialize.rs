//! Task materializer
//!
//! Turns approved proposals into tracker tasks, one call at a time. A failure
//! on one proposal is recorded and the batch moves on to the next one.

use crate::nlp::Priority;
use crate::proposal::TaskProposal;
use crate::tracker::{NewTask, TaskTracker, TrackedStatus};
use chrono::NaiveDate;
use log::{info, warn};

/// A task created from an approved proposal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedTask {
    pub id: String,
    pub description: String,
    /// Position of the source proposal in the approved list
    pub approved_index: usize,
    pub due: Option<NaiveDate>,
    pub priority: Priority,
    /// The informal checkbox was already ticked, so the task was completed
    pub completed: bool,
}

/// An approved proposal that did not become a task
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaterializeError {
    pub description: String,
    pub reason: String,
    pub needs_review: bool,
}

/// Outcome of a materializer run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Materialized {
    pub created: Vec<CreatedTask>,
    pub errors: Vec<MaterializeError>,
}

/// Create a task for every approved proposal
///
/// Proposals flagged for review are never submitted. Every proposal is
/// attempted regardless of earlier failures.
///
/// # Arguments
/// * `approved` - Approved proposals in submission order
/// * `tracker` - The task tracker to create tasks in
pub fn materialize(approved: &[TaskProposal], tracker: &dyn TaskTracker) -> Materialized {
    let mut result = Materialized::default();

    for (index, proposal) in approved.iter().enumerate() {
        match materialize_one(index, proposal, tracker) {
            Ok(task) => {
                info!(
                    "event=task_created id={} completed={} description={:?}",
                    task.id, task.completed, task.description
                );
                result.created.push(task);
            }
            Err(error) => {
                warn!(
                    "event=task_not_created description={:?} reason={:?}",
                    error.description, error.reason
                );
                result.errors.push(error);
            }
        }
    }

    result
}

fn materialize_one(
    index: usize,
    proposal: &TaskProposal,
    tracker: &dyn TaskTracker,
) -> Result<CreatedTask, MaterializeError> {
    let error = |reason: String| MaterializeError {
        description: proposal.description.clone(),
        reason,
        needs_review: true,
    };

    if proposal.needs_review {
        return Err(error(
            proposal
                .review_reason
                .clone()
                .unwrap_or_else(|| "needs review".to_string()),
        ));
    }

    let request = NewTask {
        description: proposal.description.clone(),
        project: proposal.project.clone(),
        due: proposal.due,
        priority: Some(proposal.priority),
        tags: proposal.tags.clone(),
    };

    let id = tracker
        .create_task(&request)
        .ok_or_else(|| error("task creation failed".to_string()))?;

    let tracked = tracker
        .get_task(&id)
        .ok_or_else(|| error(format!("created task {} could not be fetched", id)))?;

    let mut completed = tracked.status == TrackedStatus::completed;
    if proposal.source.checkbox.is_filled() && !completed {
        completed = tracker.mark_task_done(&id);
        if !completed {
            warn!("event=task_done_failed id={}", id);
        }
    }

    Ok(CreatedTask {
        description: tracked.description,
        approved_index: index,
        due: tracked.due.or(proposal.due),
        priority: tracked.priority.unwrap_or(proposal.priority),
        completed,
        id,
    })
}
