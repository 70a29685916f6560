//! Proposal generator
//!
//! Combines an [`InformalTask`] with the NLP heuristics into a
//! [`TaskProposal`]: the structured task we would create if the user approves.

use crate::nlp::{self, DateGuess, Priority};
use crate::scanner::InformalTask;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A candidate task derived from one informal task
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskProposal {
    pub source: InformalTask,
    pub description: String,
    pub due: Option<NaiveDate>,
    pub priority: Priority,
    /// Reserved for project assignment; always empty when generated
    pub project: Option<String>,
    /// Reserved for tags; always empty when generated
    pub tags: Vec<String>,
    /// Set when the priority came from a keyword
    pub priority_reason: Option<String>,
    pub needs_review: bool,
    pub review_reason: Option<String>,
}

/// Build a proposal for one informal task
///
/// # Arguments
/// * `task` - The informal task found by the scanner
/// * `reference` - Date that relative date keywords resolve against
pub fn generate(task: &InformalTask, reference: NaiveDate) -> TaskProposal {
    let date_guess = nlp::parse_date(&task.text, reference);
    let priority_guess = nlp::parse_priority(&task.text);
    let description = nlp::clean_description(&task.text, date_guess.span());

    let (needs_review, review_reason) = match date_guess {
        DateGuess::Unresolved => (true, Some(nlp::UNPARSED_DATE_REASON.to_string())),
        _ => (false, None),
    };

    TaskProposal {
        source: task.clone(),
        description,
        due: date_guess.date(),
        priority: priority_guess.priority,
        project: None,
        tags: Vec::new(),
        priority_reason: priority_guess.reason,
        needs_review,
        review_reason,
    }
}

/// Build proposals for every informal task, preserving order
pub fn generate_all(tasks: &[InformalTask], reference: NaiveDate) -> Vec<TaskProposal> {
    tasks.iter().map(|task| generate(task, reference)).collect()
}
