//! Resolution and execution of tool call intents.

use crate::tool_registry::{
    domain::{McpServerId, McpToolDescriptor, ToolCallIntent, ToolCallResponse},
    ports::{McpServerRegistry, McpServerRegistryError, ToolServerHost, ToolServerHostError},
};
use futures::future::join_all;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

/// Failures raised while dispatching a single intent.
///
/// These never reach callers of [`ToolDispatcher::call`]; they are rendered
/// into an error-flagged [`ToolCallResponse`].
#[derive(Debug, Error)]
pub enum DispatchError {
    /// No catalog entry carries the requested name.
    #[error("tool not found: {0}")]
    ToolNotFound(String),

    /// The owning server is not registered.
    #[error("server not found for tool {tool_name}: {server_id}")]
    ServerConfigNotFound {
        /// Requested tool name.
        tool_name: String,
        /// Server identifier recorded on the descriptor.
        server_id: McpServerId,
    },

    /// The host failed to run the tool.
    #[error("error calling tool {tool_name}: {source}")]
    ToolInvocationFailure {
        /// Requested tool name.
        tool_name: String,
        /// Host failure.
        #[source]
        source: ToolServerHostError,
    },

    /// The server registry could not be read.
    #[error(transparent)]
    Registry(#[from] McpServerRegistryError),
}

/// Executes tool call intents against registered tool servers.
#[derive(Clone)]
pub struct ToolDispatcher<R, H>
where
    R: McpServerRegistry,
    H: ToolServerHost,
{
    registry: Arc<R>,
    host: Arc<H>,
}

impl<R, H> ToolDispatcher<R, H>
where
    R: McpServerRegistry,
    H: ToolServerHost,
{
    /// Creates a dispatcher over a server registry and a tool-server host.
    #[must_use]
    pub const fn new(registry: Arc<R>, host: Arc<H>) -> Self {
        Self { registry, host }
    }

    /// Executes one intent and returns the normalised response.
    ///
    /// The first catalog entry whose name equals the intent's name wins.
    /// Every failure becomes an error-flagged response; this never fails.
    pub async fn call(
        &self,
        intent: &ToolCallIntent,
        catalog: &[McpToolDescriptor],
    ) -> ToolCallResponse {
        match self.try_call(intent, catalog).await {
            Ok(response) => {
                info!(tool = %intent.name, call = %intent.id, "tool call succeeded");
                response
            }
            Err(err) => {
                warn!(tool = %intent.name, call = %intent.id, error = %err, "tool call failed");
                ToolCallResponse::error(err.to_string())
            }
        }
    }

    /// Executes one intent, reporting failures as [`DispatchError`].
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::ToolNotFound`] when no catalog entry matches,
    /// [`DispatchError::ServerConfigNotFound`] when the owning server is not
    /// registered, and [`DispatchError::ToolInvocationFailure`] when the host
    /// fails.
    pub async fn try_call(
        &self,
        intent: &ToolCallIntent,
        catalog: &[McpToolDescriptor],
    ) -> Result<ToolCallResponse, DispatchError> {
        let tool = catalog
            .iter()
            .find(|tool| tool.name() == intent.name)
            .ok_or_else(|| DispatchError::ToolNotFound(intent.name.clone()))?;

        let server = self
            .registry
            .find_by_id(tool.server_id())
            .await?
            .ok_or_else(|| DispatchError::ServerConfigNotFound {
                tool_name: intent.name.clone(),
                server_id: tool.server_id().clone(),
            })?;

        let arguments = intent.cleaned_arguments();
        info!(
            tool = %intent.name,
            server = %server.id(),
            count = arguments.len(),
            "dispatching tool call"
        );
        let content = self
            .host
            .invoke(&server, tool.name(), &arguments)
            .await
            .map_err(|source| DispatchError::ToolInvocationFailure {
                tool_name: intent.name.clone(),
                source,
            })?;

        Ok(ToolCallResponse::success(content))
    }

    /// Executes every intent concurrently and returns responses in intent
    /// order.
    ///
    /// `on_complete` observes each response as soon as its call finishes,
    /// with the intent's position in `intents`. A failing intent does not
    /// affect its siblings.
    pub async fn execute_many<F>(
        &self,
        intents: &[ToolCallIntent],
        catalog: &[McpToolDescriptor],
        on_complete: F,
    ) -> Vec<ToolCallResponse>
    where
        F: Fn(usize, &ToolCallIntent, &ToolCallResponse) + Send + Sync,
    {
        let on_complete = &on_complete;
        join_all(intents.iter().enumerate().map(|(index, intent)| async move {
            let response = self.call(intent, catalog).await;
            on_complete(index, intent, &response);
            response
        }))
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tool_registry::{
        adapters::memory::InMemoryMcpServerRegistry,
        domain::{
            ContentItem, DiscoveredTool, LaunchSpec, McpServerDescriptor, ToolContent,
        },
        ports::MockToolServerHost,
    };
    use rstest::{fixture, rstest};
    use async_trait::async_trait;
    use serde_json::{Map, Value, json};
    use std::sync::Mutex;
    use std::time::Duration;
    use tokio::sync::Barrier;

    /// Host whose invocations only return once `parties` calls are in flight.
    struct RendezvousHost {
        barrier: Barrier,
    }

    #[async_trait]
    impl ToolServerHost for RendezvousHost {
        async fn discover(
            &self,
            _server: &McpServerDescriptor,
        ) -> Result<Vec<DiscoveredTool>, ToolServerHostError> {
            Ok(Vec::new())
        }

        async fn invoke(
            &self,
            _server: &McpServerDescriptor,
            tool_name: &str,
            _arguments: &Map<String, Value>,
        ) -> Result<Vec<ToolContent>, ToolServerHostError> {
            self.barrier.wait().await;
            Ok(vec![ToolContent::Text(format!("{tool_name} done"))])
        }
    }

    fn server(id: &str) -> McpServerDescriptor {
        McpServerDescriptor::new(
            McpServerId::new(id).expect("valid id"),
            id,
            LaunchSpec::new(format!("{id}-server")).expect("valid command"),
        )
        .expect("valid descriptor")
    }

    fn descriptor(name: &str, owner: &McpServerDescriptor) -> McpToolDescriptor {
        McpToolDescriptor::discovered(
            DiscoveredTool::new(name, "", json!({})).expect("valid tool"),
            owner,
        )
    }

    fn intent(name: &str, arguments: Value) -> ToolCallIntent {
        ToolCallIntent::new(
            "call_0",
            name,
            arguments.as_object().cloned().unwrap_or_default(),
        )
    }

    #[fixture]
    fn registry() -> Arc<InMemoryMcpServerRegistry> {
        Arc::new(InMemoryMcpServerRegistry::new())
    }

    async fn registered(registry: &InMemoryMcpServerRegistry, id: &str) -> McpServerDescriptor {
        let descriptor = server(id);
        registry
            .register(&descriptor)
            .await
            .expect("registration should succeed");
        descriptor
    }

    #[rstest]
    #[tokio::test]
    async fn unknown_tool_yields_error_response(registry: Arc<InMemoryMcpServerRegistry>) {
        let mut host = MockToolServerHost::new();
        host.expect_invoke().never();
        let dispatcher = ToolDispatcher::new(registry, Arc::new(host));

        let response = dispatcher.call(&intent("missing", json!({})), &[]).await;

        assert!(response.is_error());
        assert_eq!(response.text(), "tool not found: missing");
    }

    #[rstest]
    #[tokio::test]
    async fn unregistered_server_yields_error_response(registry: Arc<InMemoryMcpServerRegistry>) {
        let mut host = MockToolServerHost::new();
        host.expect_invoke().never();
        let dispatcher = ToolDispatcher::new(registry, Arc::new(host));
        let catalog = vec![descriptor("search", &server("ghost"))];

        let response = dispatcher.call(&intent("search", json!({})), &catalog).await;

        assert!(response.is_error());
        assert_eq!(response.text(), "server not found for tool search: ghost");
    }

    #[rstest]
    #[tokio::test]
    async fn first_catalog_match_wins(registry: Arc<InMemoryMcpServerRegistry>) {
        let first = registered(&registry, "first").await;
        let second = registered(&registry, "second").await;
        let mut host = MockToolServerHost::new();
        host.expect_invoke()
            .withf(|server, tool_name, _| server.id().as_str() == "first" && tool_name == "search")
            .times(1)
            .returning(|_, _, _| Ok(vec![ToolContent::Text("from first".to_owned())]));
        let dispatcher = ToolDispatcher::new(registry, Arc::new(host));
        let catalog = vec![descriptor("search", &first), descriptor("search", &second)];

        let response = dispatcher.call(&intent("search", json!({})), &catalog).await;

        assert!(!response.is_error());
        assert_eq!(response.text(), "from first");
    }

    #[rstest]
    #[tokio::test]
    async fn placeholder_arguments_are_not_forwarded(registry: Arc<InMemoryMcpServerRegistry>) {
        let owner = registered(&registry, "search").await;
        let mut host = MockToolServerHost::new();
        host.expect_invoke()
            .withf(|_, _, arguments: &Map<String, Value>| {
                arguments.len() == 2
                    && arguments.get("query") == Some(&json!("x"))
                    && arguments.get("limit") == Some(&json!(0))
            })
            .times(1)
            .returning(|_, _, _| Ok(Vec::new()));
        let dispatcher = ToolDispatcher::new(registry, Arc::new(host));
        let catalog = vec![descriptor("search", &owner)];
        let noisy = intent(
            "search",
            json!({"query": "x", "limit": 0, "site": "  ", "tags": [], "since": null}),
        );

        let response = dispatcher.call(&noisy, &catalog).await;

        assert!(!response.is_error());
    }

    #[rstest]
    #[tokio::test]
    async fn host_failure_is_captured(registry: Arc<InMemoryMcpServerRegistry>) {
        let owner = registered(&registry, "search").await;
        let mut host = MockToolServerHost::new();
        host.expect_invoke().returning(|_, tool_name, _| {
            Err(ToolServerHostError::Invocation {
                tool_name: tool_name.to_owned(),
                reason: "timeout".to_owned(),
            })
        });
        let dispatcher = ToolDispatcher::new(registry, Arc::new(host));
        let catalog = vec![descriptor("search", &owner)];

        let response = dispatcher.call(&intent("search", json!({})), &catalog).await;

        assert!(response.is_error());
        assert_eq!(
            response.text(),
            "error calling tool search: tool search failed: timeout"
        );
    }

    #[rstest]
    #[tokio::test]
    async fn execute_many_isolates_failures(registry: Arc<InMemoryMcpServerRegistry>) {
        let owner = registered(&registry, "media").await;
        let mut host = MockToolServerHost::new();
        host.expect_invoke().returning(|_, tool_name, _| match tool_name {
            "snapshot" => Ok(vec![ToolContent::Image {
                data: "AAAA".to_owned(),
                mime_type: None,
            }]),
            _ => Err(ToolServerHostError::Invocation {
                tool_name: tool_name.to_owned(),
                reason: "boom".to_owned(),
            }),
        });
        let dispatcher = ToolDispatcher::new(registry, Arc::new(host));
        let catalog = vec![descriptor("snapshot", &owner), descriptor("explode", &owner)];
        let intents = vec![
            intent("explode", json!({})),
            intent("snapshot", json!({})),
            intent("unknown", json!({})),
        ];
        let completed = Mutex::new(Vec::new());

        let responses = dispatcher
            .execute_many(&intents, &catalog, |index, _, _| {
                completed.lock().expect("lock should be free").push(index);
            })
            .await;

        let flags: Vec<bool> = responses.iter().map(ToolCallResponse::is_error).collect();
        assert_eq!(flags, vec![true, false, true]);
        assert_eq!(
            responses.get(1).map(ToolCallResponse::content),
            Some(
                [ContentItem::Image {
                    data: "AAAA".to_owned(),
                    mime_type: "image/png".to_owned(),
                }]
                .as_slice()
            )
        );
        let mut seen = completed.into_inner().expect("lock should be free");
        seen.sort_unstable();
        assert_eq!(seen, vec![0, 1, 2]);
    }

    #[rstest]
    #[tokio::test(flavor = "multi_thread")]
    async fn execute_many_runs_calls_concurrently(registry: Arc<InMemoryMcpServerRegistry>) {
        let owner = registered(&registry, "slow").await;
        let host = RendezvousHost {
            barrier: Barrier::new(2),
        };
        let dispatcher = ToolDispatcher::new(registry, Arc::new(host));
        let catalog = vec![descriptor("first", &owner), descriptor("second", &owner)];
        let intents = vec![intent("first", json!({})), intent("second", json!({}))];

        let responses = tokio::time::timeout(
            Duration::from_secs(5),
            dispatcher.execute_many(&intents, &catalog, |_, _, _| {}),
        )
        .await
        .expect("both calls should be in flight together");

        let texts: Vec<String> = responses.iter().map(ToolCallResponse::text).collect();
        assert_eq!(texts, vec!["first done", "second done"]);
    }
}
