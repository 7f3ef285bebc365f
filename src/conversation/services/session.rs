//! Session facade owning the registry, catalog cache and round loop.

use super::{ConversationOrchestrator, ProgressBus};
use crate::conversation::{
    config::SessionConfig,
    domain::{ConversationMessage, ConversationOutcome, MessageMetadata, TerminationReason},
    ports::{ModelCompletion, ProgressObserver},
};
use crate::tool_registry::{
    domain::{McpServerDescriptor, McpServerId},
    ports::{McpServerRegistry, McpServerRegistryError, ToolServerHost},
    services::{ToolCatalogCache, ToolDispatcher},
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Answer given when no enabled server is available.
pub const NO_SERVERS_MESSAGE: &str = "Sorry, no MCP servers are available to handle this request.";

/// Errors returned by [`ChatSession`].
#[derive(Debug, Error)]
pub enum ChatSessionError {
    /// The server registry rejected or failed the operation.
    #[error(transparent)]
    Registry(#[from] McpServerRegistryError),
}

/// Result type for session operations.
pub type ChatSessionResult<T> = Result<T, ChatSessionError>;

/// Per-turn overrides for [`ChatSession::chat`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChatOptions {
    /// Servers the turn may use; all registered servers when `None`.
    pub enabled_server_ids: Option<Vec<McpServerId>>,
    /// System prompt for the turn; the configured default when `None`.
    pub system_prompt: Option<String>,
    /// Round cap for the turn; the configured cap when `None`.
    pub max_iterations: Option<usize>,
}

impl ChatOptions {
    /// Restricts the turn to the given servers.
    #[must_use]
    pub fn with_enabled_servers(mut self, ids: impl IntoIterator<Item = McpServerId>) -> Self {
        self.enabled_server_ids = Some(ids.into_iter().collect());
        self
    }

    /// Overrides the system prompt.
    #[must_use]
    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }

    /// Overrides the round cap.
    #[must_use]
    #[expect(
        clippy::missing_const_for_fn,
        reason = "destructors of the owning struct prevent a const builder"
    )]
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = Some(max_iterations);
        self
    }
}

/// A self-contained chat session over a set of MCP servers.
///
/// Every collaborator is owned by the session, so independent sessions can
/// run side by side in one process.
pub struct ChatSession<R, H, M, C>
where
    R: McpServerRegistry,
    H: ToolServerHost,
    M: ModelCompletion,
    C: Clock + Send + Sync,
{
    registry: Arc<R>,
    cache: Arc<ToolCatalogCache<H, C>>,
    orchestrator: ConversationOrchestrator<R, H, M, C>,
}

impl<R, H, M, C> ChatSession<R, H, M, C>
where
    R: McpServerRegistry,
    H: ToolServerHost,
    M: ModelCompletion,
    C: Clock + Send + Sync,
{
    /// Creates a session with default settings.
    #[must_use]
    pub fn new(registry: Arc<R>, host: Arc<H>, completion: Arc<M>, clock: Arc<C>) -> Self {
        Self::with_config(registry, host, completion, clock, SessionConfig::default())
    }

    /// Creates a session from explicit settings.
    #[must_use]
    pub fn with_config(
        registry: Arc<R>,
        host: Arc<H>,
        completion: Arc<M>,
        clock: Arc<C>,
        config: SessionConfig,
    ) -> Self {
        let cache = Arc::new(ToolCatalogCache::with_config(
            Arc::clone(&host),
            clock,
            config.catalog,
        ));
        let dispatcher = ToolDispatcher::new(Arc::clone(&registry), host);
        let orchestrator = ConversationOrchestrator::new(
            Arc::clone(&cache),
            dispatcher,
            completion,
            config.conversation,
        );
        Self {
            registry,
            cache,
            orchestrator,
        }
    }

    /// Returns the progress bus of this session.
    #[must_use]
    pub const fn progress(&self) -> &Arc<ProgressBus> {
        self.orchestrator.progress()
    }

    /// Subscribes an observer to this session's progress events.
    pub fn subscribe(&self, observer: Arc<dyn ProgressObserver>) {
        self.orchestrator.progress().subscribe(observer);
    }

    /// Registers a server and warms its tool catalog.
    ///
    /// Returns the number of tools the server exposes after its disabled
    /// tools are removed. Discovery failures are logged and count as zero
    /// tools.
    ///
    /// # Errors
    ///
    /// Returns [`ChatSessionError::Registry`] when the id is already taken or
    /// the registry fails.
    pub async fn register_server(&self, server: &McpServerDescriptor) -> ChatSessionResult<usize> {
        self.registry.register(server).await?;
        let tools = self.cache.list_tools(server).await;
        info!(server = %server.id(), count = tools.len(), "registered MCP server");
        Ok(tools.len())
    }

    /// Lists registered servers in registration order.
    ///
    /// # Errors
    ///
    /// Returns [`ChatSessionError::Registry`] when the registry fails.
    pub async fn list_servers(&self) -> ChatSessionResult<Vec<McpServerDescriptor>> {
        Ok(self.registry.list_all().await?)
    }

    /// Answers `user_message`, calling tools as the model requests them.
    ///
    /// When no enabled server resolves, the model is not called and the
    /// outcome carries [`TerminationReason::NoServers`].
    ///
    /// # Errors
    ///
    /// Returns [`ChatSessionError::Registry`] when servers cannot be read
    /// from the registry.
    pub async fn chat(
        &self,
        user_message: &str,
        options: ChatOptions,
    ) -> ChatSessionResult<ConversationOutcome> {
        let config = self.orchestrator.config();
        let system_prompt = options
            .system_prompt
            .unwrap_or_else(|| config.default_system_prompt.clone());
        let transcript = vec![
            ConversationMessage::system(system_prompt),
            ConversationMessage::user(user_message),
        ];

        let servers = self.resolve_servers(options.enabled_server_ids).await?;
        if servers.is_empty() {
            warn!("no MCP servers available for chat");
            return Ok(no_servers_outcome(transcript));
        }

        let max_iterations = options.max_iterations.unwrap_or(config.max_iterations);
        Ok(self
            .orchestrator
            .run_bounded(transcript, &servers, max_iterations)
            .await)
    }

    async fn resolve_servers(
        &self,
        enabled: Option<Vec<McpServerId>>,
    ) -> ChatSessionResult<Vec<McpServerDescriptor>> {
        let Some(ids) = enabled else {
            return Ok(self.registry.list_all().await?);
        };

        let mut servers = Vec::with_capacity(ids.len());
        for id in ids {
            match self.registry.find_by_id(&id).await? {
                Some(server) => servers.push(server),
                None => debug!(server = %id, "skipping unknown enabled server"),
            }
        }
        Ok(servers)
    }
}

fn no_servers_outcome(transcript: Vec<ConversationMessage>) -> ConversationOutcome {
    let termination = TerminationReason::NoServers;
    ConversationOutcome {
        message: ConversationMessage::assistant(NO_SERVERS_MESSAGE)
            .with_metadata(MessageMetadata::empty().with_termination(termination)),
        transcript,
        tool_responses: Vec::new(),
        usage: None,
        completion_calls: 0,
        termination,
    }
}
