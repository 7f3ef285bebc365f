//! Port contracts for server registration and tool-server access.

mod host;
mod repository;

#[cfg(test)]
pub use host::MockToolServerHost;
pub use host::{ToolServerHost, ToolServerHostError, ToolServerHostResult};
pub use repository::{McpServerRegistry, McpServerRegistryError, McpServerRegistryResult};
