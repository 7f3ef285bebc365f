//! Error types for tool registry domain validation.

use thiserror::Error;

/// Errors returned while constructing tool registry domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ToolRegistryDomainError {
    /// The server identifier is empty after trimming.
    #[error("MCP server id must not be empty")]
    EmptyServerId,

    /// The server display name is empty after trimming.
    #[error("MCP server name must not be empty")]
    EmptyServerName,

    /// The launch command is empty after trimming.
    #[error("launch command must not be empty")]
    EmptyLaunchCommand,

    /// A tool name is empty after trimming.
    #[error("tool name must not be empty")]
    EmptyToolName,
}
