//! MCP tool handlers for the task vault server
//!
//! Each tool's implementation lives in its own file as an inherent method
//! on `TaskVaultHandler`; the `#[mcp_server]` impl only forwards to them.

pub mod apply;
pub mod daily;
pub mod propose;
pub mod scan;
