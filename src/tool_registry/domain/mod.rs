//! Domain model for MCP servers, tool catalogs and tool calls.
//!
//! The tool registry domain models server identity and launch parameters,
//! discovered tool metadata, parsed tool call intents and normalised tool
//! output. Transport concerns remain outside this boundary.

mod content;
mod error;
mod ids;
mod intent;
mod launch;
mod server;
mod tool;

pub use content::{ContentItem, DEFAULT_IMAGE_MIME_TYPE, ToolCallResponse, ToolContent};
pub use error::ToolRegistryDomainError;
pub use ids::{McpServerId, ToolId};
pub use intent::ToolCallIntent;
pub use launch::{CatalogFingerprint, LaunchSpec};
pub use server::McpServerDescriptor;
pub use tool::{DiscoveredTool, McpToolDescriptor, ToolParameter};
