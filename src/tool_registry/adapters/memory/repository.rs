//! In-memory registry of MCP server descriptors.

use crate::tool_registry::{
    domain::{McpServerDescriptor, McpServerId},
    ports::{McpServerRegistry, McpServerRegistryError, McpServerRegistryResult},
};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Thread-safe in-memory MCP server registry.
#[derive(Debug, Clone, Default)]
pub struct InMemoryMcpServerRegistry {
    state: Arc<RwLock<InMemoryRegistryState>>,
}

#[derive(Debug, Default)]
struct InMemoryRegistryState {
    servers: HashMap<McpServerId, McpServerDescriptor>,
    registration_order: Vec<McpServerId>,
}

impl InMemoryMcpServerRegistry {
    /// Creates an empty in-memory registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl McpServerRegistry for InMemoryMcpServerRegistry {
    async fn register(&self, server: &McpServerDescriptor) -> McpServerRegistryResult<()> {
        let mut state = self.state.write().map_err(|err| {
            McpServerRegistryError::storage(std::io::Error::other(err.to_string()))
        })?;

        if state.servers.contains_key(server.id()) {
            return Err(McpServerRegistryError::DuplicateServer(server.id().clone()));
        }

        state.registration_order.push(server.id().clone());
        state.servers.insert(server.id().clone(), server.clone());
        Ok(())
    }

    async fn find_by_id(
        &self,
        server_id: &McpServerId,
    ) -> McpServerRegistryResult<Option<McpServerDescriptor>> {
        let state = self.state.read().map_err(|err| {
            McpServerRegistryError::storage(std::io::Error::other(err.to_string()))
        })?;
        Ok(state.servers.get(server_id).cloned())
    }

    async fn list_all(&self) -> McpServerRegistryResult<Vec<McpServerDescriptor>> {
        let state = self.state.read().map_err(|err| {
            McpServerRegistryError::storage(std::io::Error::other(err.to_string()))
        })?;
        Ok(state
            .registration_order
            .iter()
            .filter_map(|id| state.servers.get(id))
            .cloned()
            .collect())
    }
}
