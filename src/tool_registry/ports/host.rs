//! Tool-server host port for tool discovery and invocation.

use crate::tool_registry::domain::{DiscoveredTool, McpServerDescriptor, McpServerId, ToolContent};
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::sync::Arc;
use thiserror::Error;

/// Result type for tool-server host operations.
pub type ToolServerHostResult<T> = Result<T, ToolServerHostError>;

/// Transport contract for talking to MCP tool servers.
///
/// Implementations own process launch and the list/call RPC exchange. They
/// classify raw results into [`ToolContent`] before returning them.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ToolServerHost: Send + Sync {
    /// Lists the tools exposed by `server`.
    async fn discover(
        &self,
        server: &McpServerDescriptor,
    ) -> ToolServerHostResult<Vec<DiscoveredTool>>;

    /// Invokes `tool_name` on `server` with `arguments`.
    async fn invoke(
        &self,
        server: &McpServerDescriptor,
        tool_name: &str,
        arguments: &Map<String, Value>,
    ) -> ToolServerHostResult<Vec<ToolContent>>;
}

/// Errors returned by tool-server host adapters.
#[derive(Debug, Clone, Error)]
pub enum ToolServerHostError {
    /// The server could not be reached or launched.
    #[error("MCP server {0} is unavailable")]
    Unavailable(McpServerId),

    /// Tool discovery failed.
    #[error("tool discovery failed for MCP server {server_id}: {reason}")]
    Discovery {
        /// Server identifier.
        server_id: McpServerId,
        /// Reason string.
        reason: String,
    },

    /// The server reported a failure while running the tool.
    #[error("tool {tool_name} failed: {reason}")]
    Invocation {
        /// Tool name.
        tool_name: String,
        /// Reason string.
        reason: String,
    },

    /// Generic runtime failure.
    #[error("MCP host runtime error: {0}")]
    Runtime(Arc<dyn std::error::Error + Send + Sync>),
}

impl ToolServerHostError {
    /// Wraps a runtime error from the host adapter.
    pub fn runtime(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Runtime(Arc::new(err))
    }
}
