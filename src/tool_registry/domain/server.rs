//! MCP server descriptor aggregate.

use super::{CatalogFingerprint, LaunchSpec, McpServerId, ToolRegistryDomainError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Registered configuration of one MCP tool server.
///
/// Descriptors are immutable once registered. The disabled-tool set names
/// tools that must never surface in this server's catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct McpServerDescriptor {
    id: McpServerId,
    name: String,
    launch: LaunchSpec,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    disabled_tools: BTreeSet<String>,
}

impl McpServerDescriptor {
    /// Creates a server descriptor.
    ///
    /// # Errors
    ///
    /// Returns [`ToolRegistryDomainError::EmptyServerName`] when the display
    /// name is empty after trimming.
    pub fn new(
        id: McpServerId,
        name: impl Into<String>,
        launch: LaunchSpec,
    ) -> Result<Self, ToolRegistryDomainError> {
        let normalized_name = name.into().trim().to_owned();
        if normalized_name.is_empty() {
            return Err(ToolRegistryDomainError::EmptyServerName);
        }

        Ok(Self {
            id,
            name: normalized_name,
            launch,
            disabled_tools: BTreeSet::new(),
        })
    }

    /// Replaces the set of disabled tool names.
    #[must_use]
    pub fn with_disabled_tools<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.disabled_tools = names.into_iter().map(Into::into).collect();
        self
    }

    /// Returns the server identifier.
    #[must_use]
    pub const fn id(&self) -> &McpServerId {
        &self.id
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the launch parameters.
    #[must_use]
    pub const fn launch(&self) -> &LaunchSpec {
        &self.launch
    }

    /// Returns the disabled tool names.
    #[must_use]
    pub const fn disabled_tools(&self) -> &BTreeSet<String> {
        &self.disabled_tools
    }

    /// Returns whether `tool_name` is disabled on this server.
    #[must_use]
    pub fn is_tool_disabled(&self, tool_name: &str) -> bool {
        self.disabled_tools.contains(tool_name)
    }

    /// Returns the catalog cache key for this server.
    #[must_use]
    pub fn fingerprint(&self) -> CatalogFingerprint {
        self.launch.fingerprint()
    }
}
