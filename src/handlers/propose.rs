//! Propose handler for the task vault server

use crate::TaskVaultHandler;
use crate::formatting::format_propose;
use crate::pipeline::propose_file;
use crate::validation;
use mcp_attr::{Result as McpResult, bail_public};

impl TaskVaultHandler {
    /// **Step 1**: Stage proposals for every informal checkbox in a note.
    /// Writes a TBD block at the end of the note; any previous block is replaced.
    pub async fn handle_propose(&self, note: String, date: Option<String>) -> McpResult<String> {
        let note = validation::validate_note_path(&note)?;
        let reference = validation::parse_reference_date(date.as_deref())?;
        let path = self.config.vault.resolve_note(&note);

        match propose_file(&path, reference, &self.config.layout, &self.storage) {
            Ok(outcome) => Ok(format_propose(&outcome, &note)),
            Err(e) => bail_public!(_, "Failed to propose tasks for '{}': {:#}", note, e),
        }
    }
}
