//! Validation helper functions for MCP tool arguments

use crate::local_date_today;
use chrono::NaiveDate;
use mcp_attr::Result as McpResult;

fn invalid_params(message: String) -> mcp_attr::Error {
    mcp_attr::Error::new(mcp_attr::ErrorCode::INVALID_PARAMS).with_message(message, true)
}

/// Parse the optional reference date argument
///
/// # Arguments
/// * `date` - Date string in YYYY-MM-DD format, or `None` for today
///
/// # Returns
/// Result containing the parsed date or an invalid-params error
pub fn parse_reference_date(date: Option<&str>) -> McpResult<NaiveDate> {
    match date.map(str::trim) {
        None | Some("") => Ok(local_date_today()),
        Some(date_str) => NaiveDate::parse_from_str(date_str, "%Y-%m-%d").map_err(|_| {
            invalid_params(format!(
                "Invalid date format '{}'. Use YYYY-MM-DD (e.g., '2025-03-15')",
                date_str
            ))
        }),
    }
}

/// Check that a note argument names a markdown file
///
/// # Returns
/// The trimmed note path
pub fn validate_note_path(note: &str) -> McpResult<String> {
    let note = note.trim();
    if note.is_empty() {
        return Err(invalid_params(
            "Note path is empty. Pass a markdown file path relative to the vault root."
                .to_string(),
        ));
    }
    if !note.ends_with(".md") {
        return Err(invalid_params(format!(
            "Note '{}' is not a markdown file. Note paths must end with '.md'.",
            note
        )));
    }
    Ok(note.to_string())
}
