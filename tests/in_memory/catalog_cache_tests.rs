//! Catalog cache behaviour over the in-memory tool-server host.

use std::sync::Arc;

use chat_mcp::tool_registry::{
    adapters::InMemoryToolServerHost,
    domain::McpToolDescriptor,
    services::{CatalogCacheConfig, ToolCatalogCache},
};
use chrono::TimeDelta;
use rstest::{fixture, rstest};
use std::time::Duration;

use super::helpers::{ManualClock, launch, server, string_tool};

struct CacheContext {
    host: Arc<InMemoryToolServerHost>,
    clock: Arc<ManualClock>,
    cache: ToolCatalogCache<InMemoryToolServerHost, ManualClock>,
}

#[fixture]
fn context() -> CacheContext {
    let host = Arc::new(InMemoryToolServerHost::new());
    let clock = Arc::new(ManualClock::new());
    let cache = ToolCatalogCache::new(host.clone(), clock.clone());
    CacheContext { host, clock, cache }
}

fn names(tools: &[McpToolDescriptor]) -> Vec<&str> {
    tools.iter().map(McpToolDescriptor::name).collect()
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn fresh_entry_is_served_without_rediscovery(context: CacheContext) {
    let spec = launch("fs-server", &["--root", "/tmp"]).expect("valid launch");
    context
        .host
        .set_tool_catalog(&spec, vec![string_tool("read_file", "path").expect("valid tool")])
        .expect("catalog should be stored");
    let fs = server("fs", spec.clone()).expect("valid server");

    let first = context.cache.list_tools(&fs).await;
    context.clock.advance(TimeDelta::minutes(4));
    let second = context.cache.list_tools(&fs).await;

    assert_eq!(names(&first), vec!["read_file"]);
    assert_eq!(names(&second), vec!["read_file"]);
    assert_eq!(context.host.discovery_count(&spec), 1);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn expired_entry_is_rediscovered(context: CacheContext) {
    let spec = launch("fs-server", &[]).expect("valid launch");
    context
        .host
        .set_tool_catalog(&spec, vec![string_tool("read_file", "path").expect("valid tool")])
        .expect("catalog should be stored");
    let fs = server("fs", spec.clone()).expect("valid server");

    context.cache.list_tools(&fs).await;
    context
        .host
        .set_tool_catalog(
            &spec,
            vec![
                string_tool("read_file", "path").expect("valid tool"),
                string_tool("stat", "path").expect("valid tool"),
            ],
        )
        .expect("catalog should be stored");
    context.clock.advance(TimeDelta::minutes(5) + TimeDelta::seconds(1));
    let refreshed = context.cache.list_tools(&fs).await;

    assert_eq!(names(&refreshed), vec!["read_file", "stat"]);
    assert_eq!(context.host.discovery_count(&spec), 2);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn identically_launched_servers_share_one_entry(context: CacheContext) {
    let spec = launch("web-server", &["--safe"]).expect("valid launch");
    context
        .host
        .set_tool_catalog(
            &spec,
            vec![
                string_tool("search", "query").expect("valid tool"),
                string_tool("fetch", "url").expect("valid tool"),
            ],
        )
        .expect("catalog should be stored");
    let open = server("web-open", spec.clone()).expect("valid server");
    let restricted = server("web-restricted", spec.clone())
        .expect("valid server")
        .with_disabled_tools(["fetch"]);

    context.cache.list_tools(&open).await;
    let combined = context.cache.get_all_tools(&[open, restricted]).await;

    assert_eq!(context.host.discovery_count(&spec), 1);
    assert_eq!(names(&combined), vec!["search", "fetch", "search"]);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn failing_server_contributes_nothing(context: CacheContext) {
    let healthy = launch("fs-server", &[]).expect("valid launch");
    let broken = launch("broken-server", &[]).expect("valid launch");
    context
        .host
        .set_tool_catalog(&healthy, vec![string_tool("read_file", "path").expect("valid tool")])
        .expect("catalog should be stored");
    context
        .host
        .fail_discovery(&broken, "process exited")
        .expect("failure should be scripted");

    let tools = context
        .cache
        .get_all_tools(&[
            server("broken", broken).expect("valid server"),
            server("fs", healthy).expect("valid server"),
        ])
        .await;

    assert_eq!(names(&tools), vec!["read_file"]);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn configured_ttl_is_honoured(context: CacheContext) {
    let spec = launch("fs-server", &[]).expect("valid launch");
    context
        .host
        .set_tool_catalog(&spec, vec![string_tool("read_file", "path").expect("valid tool")])
        .expect("catalog should be stored");
    let cache = ToolCatalogCache::with_config(
        context.host.clone(),
        context.clock.clone(),
        CatalogCacheConfig::default().with_ttl(Duration::from_secs(30)),
    );
    let fs = server("fs", spec.clone()).expect("valid server");

    cache.list_tools(&fs).await;
    context.clock.advance(TimeDelta::seconds(31));
    cache.list_tools(&fs).await;

    assert_eq!(context.host.discovery_count(&spec), 2);
}
