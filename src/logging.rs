//! Logging bootstrap
//!
//! Logs go to stderr: stdout carries the MCP stdio transport. The `RUST_LOG`
//! environment variable overrides the configured level.

use anyhow::{Result, anyhow};
use flexi_logger::{Logger, LoggerHandle};
use log::info;
use once_cell::sync::OnceCell;

static LOGGER: OnceCell<LoggerHandle> = OnceCell::new();

/// Start the logger once per process
///
/// Later calls are no-ops, whatever level they ask for.
pub fn init_logging(level: &str) -> Result<()> {
    LOGGER.get_or_try_init(|| -> Result<LoggerHandle> {
        let handle = Logger::try_with_env_or_str(level)
            .map_err(|e| anyhow!("Invalid log level '{}': {}", level, e))?
            .log_to_stderr()
            .format_for_stderr(flexi_logger::detailed_format)
            .start()
            .map_err(|e| anyhow!("Failed to start logger: {}", e))?;
        info!(
            "event=app_start version={} level={}",
            env!("CARGO_PKG_VERSION"),
            level
        );
        Ok(handle)
    })?;
    Ok(())
}
