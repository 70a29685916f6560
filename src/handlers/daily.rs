//! Daily note handler for the task vault server

use crate::TaskVaultHandler;
use crate::daily::daily_note_file;
use crate::formatting::format_daily;
use crate::validation;
use mcp_attr::{Result as McpResult, bail_public};

impl TaskVaultHandler {
    /// **Plan the day**: Write the daily note listing overdue, due and high-priority
    /// pending tasks. An existing daily note is never overwritten.
    pub async fn handle_daily(&self, date: Option<String>) -> McpResult<String> {
        let date = validation::parse_reference_date(date.as_deref())?;

        match daily_note_file(
            date,
            &self.config.vault,
            &self.config.layout,
            &self.storage,
            self.tracker.as_ref(),
        ) {
            Ok(outcome) => Ok(format_daily(&outcome)),
            Err(e) => bail_public!(_, "Failed to write daily note for {}: {:#}", date, e),
        }
    }
}
