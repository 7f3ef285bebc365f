//! In-memory tool-server host adapter for deterministic sessions and tests.

use crate::tool_registry::{
    domain::{CatalogFingerprint, DiscoveredTool, LaunchSpec, McpServerDescriptor, ToolContent},
    ports::{ToolServerHost, ToolServerHostError, ToolServerHostResult},
};
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// In-memory MCP tool-server host.
///
/// Servers are simulated per launch fingerprint, so two descriptors with the
/// same command and arguments reach the same simulated process. Catalogs,
/// tool results and failures are scripted up front, and every discovery and
/// invocation is counted.
#[derive(Debug, Clone, Default)]
pub struct InMemoryToolServerHost {
    state: Arc<RwLock<InMemoryHostState>>,
}

#[derive(Debug, Default)]
struct InMemoryHostState {
    tool_catalogs: HashMap<CatalogFingerprint, Vec<DiscoveredTool>>,
    discovery_failures: HashMap<CatalogFingerprint, String>,
    tool_results: HashMap<(CatalogFingerprint, String), ScriptedResult>,
    discovery_counts: HashMap<CatalogFingerprint, usize>,
    invocations: Vec<RecordedInvocation>,
}

#[derive(Debug, Clone)]
enum ScriptedResult {
    Content(Vec<ToolContent>),
    Failure(String),
}

/// A tool invocation observed by [`InMemoryToolServerHost`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedInvocation {
    /// Display name of the server the call was routed to.
    pub server_name: String,
    /// Invoked tool name.
    pub tool_name: String,
    /// Arguments as received by the host.
    pub arguments: Map<String, Value>,
}

impl InMemoryToolServerHost {
    /// Creates an empty in-memory host.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn write_state(
        &self,
    ) -> ToolServerHostResult<std::sync::RwLockWriteGuard<'_, InMemoryHostState>> {
        self.state
            .write()
            .map_err(|err| ToolServerHostError::runtime(std::io::Error::other(err.to_string())))
    }

    /// Associates a tool catalog with the server launched by `launch`.
    ///
    /// Existing catalog entries are replaced and any scripted discovery
    /// failure is cleared.
    ///
    /// # Errors
    ///
    /// Returns host runtime errors when lock acquisition fails.
    pub fn set_tool_catalog(
        &self,
        launch: &LaunchSpec,
        tools: Vec<DiscoveredTool>,
    ) -> ToolServerHostResult<()> {
        let mut state = self.write_state()?;
        let fingerprint = launch.fingerprint();
        state.discovery_failures.remove(&fingerprint);
        state.tool_catalogs.insert(fingerprint, tools);
        Ok(())
    }

    /// Makes discovery against the server launched by `launch` fail.
    ///
    /// # Errors
    ///
    /// Returns host runtime errors when lock acquisition fails.
    pub fn fail_discovery(
        &self,
        launch: &LaunchSpec,
        reason: impl Into<String>,
    ) -> ToolServerHostResult<()> {
        let mut state = self.write_state()?;
        state
            .discovery_failures
            .insert(launch.fingerprint(), reason.into());
        Ok(())
    }

    /// Scripts the output returned when `tool_name` is invoked.
    ///
    /// # Errors
    ///
    /// Returns host runtime errors when lock acquisition fails.
    pub fn set_tool_result(
        &self,
        launch: &LaunchSpec,
        tool_name: impl Into<String>,
        content: Vec<ToolContent>,
    ) -> ToolServerHostResult<()> {
        let mut state = self.write_state()?;
        state.tool_results.insert(
            (launch.fingerprint(), tool_name.into()),
            ScriptedResult::Content(content),
        );
        Ok(())
    }

    /// Makes every invocation of `tool_name` fail with `reason`.
    ///
    /// # Errors
    ///
    /// Returns host runtime errors when lock acquisition fails.
    pub fn fail_tool(
        &self,
        launch: &LaunchSpec,
        tool_name: impl Into<String>,
        reason: impl Into<String>,
    ) -> ToolServerHostResult<()> {
        let mut state = self.write_state()?;
        state.tool_results.insert(
            (launch.fingerprint(), tool_name.into()),
            ScriptedResult::Failure(reason.into()),
        );
        Ok(())
    }

    /// Returns how many discovery calls reached the server launched by
    /// `launch`.
    ///
    /// Returns `0` if the internal lock is poisoned.
    #[must_use]
    pub fn discovery_count(&self, launch: &LaunchSpec) -> usize {
        self.state
            .read()
            .map(|state| {
                state
                    .discovery_counts
                    .get(&launch.fingerprint())
                    .copied()
                    .unwrap_or(0)
            })
            .unwrap_or(0)
    }

    /// Returns every recorded invocation in arrival order.
    ///
    /// Returns an empty list if the internal lock is poisoned.
    #[must_use]
    pub fn invocations(&self) -> Vec<RecordedInvocation> {
        self.state
            .read()
            .map(|state| state.invocations.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl ToolServerHost for InMemoryToolServerHost {
    async fn discover(
        &self,
        server: &McpServerDescriptor,
    ) -> ToolServerHostResult<Vec<DiscoveredTool>> {
        let mut state = self.write_state()?;
        let fingerprint = server.fingerprint();
        *state
            .discovery_counts
            .entry(fingerprint.clone())
            .or_insert(0) += 1;

        if let Some(reason) = state.discovery_failures.get(&fingerprint) {
            return Err(ToolServerHostError::Discovery {
                server_id: server.id().clone(),
                reason: reason.clone(),
            });
        }

        match state.tool_catalogs.get(&fingerprint) {
            Some(tools) => Ok(tools.clone()),
            None => Err(ToolServerHostError::Unavailable(server.id().clone())),
        }
    }

    async fn invoke(
        &self,
        server: &McpServerDescriptor,
        tool_name: &str,
        arguments: &Map<String, Value>,
    ) -> ToolServerHostResult<Vec<ToolContent>> {
        let mut state = self.write_state()?;
        state.invocations.push(RecordedInvocation {
            server_name: server.name().to_owned(),
            tool_name: tool_name.to_owned(),
            arguments: arguments.clone(),
        });

        let key = (server.fingerprint(), tool_name.to_owned());
        match state.tool_results.get(&key) {
            Some(ScriptedResult::Content(content)) => Ok(content.clone()),
            Some(ScriptedResult::Failure(reason)) => Err(ToolServerHostError::Invocation {
                tool_name: tool_name.to_owned(),
                reason: reason.clone(),
            }),
            None => Err(ToolServerHostError::Invocation {
                tool_name: tool_name.to_owned(),
                reason: "no result scripted".to_owned(),
            }),
        }
    }
}
