//! Apply handler for the task vault server

use crate::TaskVaultHandler;
use crate::formatting::format_apply;
use crate::pipeline::apply_file;
use crate::tbd::TbdError;
use crate::validation;
use mcp_attr::{Result as McpResult, bail_public};

impl TaskVaultHandler {
    /// **Step 2**: Create the approved records of a note's TBD block in TaskWarrior
    /// and reorganize the note. Safe to rerun while the block is kept.
    pub async fn handle_apply(&self, note: String, date: Option<String>) -> McpResult<String> {
        let note = validation::validate_note_path(&note)?;
        let reference = validation::parse_reference_date(date.as_deref())?;
        let path = self.config.vault.resolve_note(&note);

        match apply_file(
            &path,
            reference,
            &self.config.layout,
            &self.storage,
            self.tracker.as_ref(),
        ) {
            Ok(outcome) => Ok(format_apply(&outcome, &note)),
            Err(e) if e.downcast_ref::<TbdError>().is_some() => bail_public!(
                _,
                "{}. Run propose_tasks on '{}' first, mark records with [a] or [r], then apply again.",
                e,
                note
            ),
            Err(e) => bail_public!(_, "Failed to apply tasks for '{}': {:#}", note, e),
        }
    }
}
