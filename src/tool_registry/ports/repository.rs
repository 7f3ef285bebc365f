//! Registry port for MCP server descriptors.

use crate::tool_registry::domain::{McpServerDescriptor, McpServerId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for MCP server registry operations.
pub type McpServerRegistryResult<T> = Result<T, McpServerRegistryError>;

/// Session-scoped store of registered server descriptors.
///
/// Written only by explicit registration and read by dispatch.
#[async_trait]
pub trait McpServerRegistry: Send + Sync {
    /// Stores a new server descriptor.
    ///
    /// # Errors
    ///
    /// Returns [`McpServerRegistryError::DuplicateServer`] when the id is
    /// already registered.
    async fn register(&self, server: &McpServerDescriptor) -> McpServerRegistryResult<()>;

    /// Finds a descriptor by identifier.
    async fn find_by_id(
        &self,
        server_id: &McpServerId,
    ) -> McpServerRegistryResult<Option<McpServerDescriptor>>;

    /// Returns all descriptors in registration order.
    async fn list_all(&self) -> McpServerRegistryResult<Vec<McpServerDescriptor>>;
}

/// Errors returned by MCP server registry implementations.
#[derive(Debug, Clone, Error)]
pub enum McpServerRegistryError {
    /// A server with the same identifier already exists.
    #[error("duplicate MCP server identifier: {0}")]
    DuplicateServer(McpServerId),

    /// Storage-layer failure.
    #[error("registry storage error: {0}")]
    Storage(Arc<dyn std::error::Error + Send + Sync>),
}

impl McpServerRegistryError {
    /// Wraps a storage-layer failure.
    pub fn storage(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Storage(Arc::new(err))
    }
}
