//! Scan handler for the task vault server

use crate::TaskVaultHandler;
use crate::formatting::format_informal_tasks;
use crate::scanner::scan;
use crate::tbd;
use crate::validation;
use mcp_attr::{Result as McpResult, bail_public};

impl TaskVaultHandler {
    /// **Preview**: List the informal tasks a note contains without changing it.
    pub async fn handle_scan(&self, note: String) -> McpResult<String> {
        let note = validation::validate_note_path(&note)?;
        let path = self.config.vault.resolve_note(&note);

        let text = match self.storage.load(&path) {
            Ok(text) => text,
            Err(e) => bail_public!(_, "Failed to read '{}': {}", note, e),
        };

        let body = tbd::strip_block(&text, &self.config.layout);
        let tasks = scan(&body, &self.config.layout);
        Ok(format_informal_tasks(&tasks, &note))
    }
}
