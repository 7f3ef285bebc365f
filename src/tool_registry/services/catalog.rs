//! TTL-bounded cache of discovered tool catalogs.

use crate::tool_registry::{
    domain::{CatalogFingerprint, McpServerDescriptor, McpToolDescriptor},
    ports::ToolServerHost,
};
use chrono::{DateTime, TimeDelta, Utc};
use futures::future::join_all;
use mockable::Clock;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Default freshness window for a cached catalog.
pub const DEFAULT_CATALOG_TTL: Duration = Duration::from_secs(5 * 60);

/// Configuration for [`ToolCatalogCache`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CatalogCacheConfig {
    /// How long a discovered catalog stays fresh.
    pub ttl: Duration,
}

impl Default for CatalogCacheConfig {
    fn default() -> Self {
        Self {
            ttl: DEFAULT_CATALOG_TTL,
        }
    }
}

impl CatalogCacheConfig {
    /// Overrides the freshness window.
    #[must_use]
    pub const fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }
}

#[derive(Debug, Clone)]
struct CachedCatalog {
    tools: Vec<McpToolDescriptor>,
    fetched_at: DateTime<Utc>,
}

/// Per-server tool catalog cache keyed by launch fingerprint.
///
/// Servers that share a command and argument list share one entry. Entries
/// expire after the configured TTL; there is no explicit invalidation.
/// Discovery failures never surface to callers: the failing server
/// contributes an empty catalog and the failure is logged.
pub struct ToolCatalogCache<H, C>
where
    H: ToolServerHost,
    C: Clock + Send + Sync,
{
    host: Arc<H>,
    clock: Arc<C>,
    ttl: TimeDelta,
    entries: RwLock<HashMap<CatalogFingerprint, CachedCatalog>>,
}

impl<H, C> ToolCatalogCache<H, C>
where
    H: ToolServerHost,
    C: Clock + Send + Sync,
{
    /// Creates a cache with the default TTL.
    #[must_use]
    pub fn new(host: Arc<H>, clock: Arc<C>) -> Self {
        Self::with_config(host, clock, CatalogCacheConfig::default())
    }

    /// Creates a cache from explicit configuration.
    #[must_use]
    pub fn with_config(host: Arc<H>, clock: Arc<C>, config: CatalogCacheConfig) -> Self {
        Self {
            host,
            clock,
            ttl: TimeDelta::from_std(config.ttl).unwrap_or(TimeDelta::MAX),
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Returns the tools exposed by `server`, minus its disabled tools.
    ///
    /// A fresh cache entry is served without contacting the host. On a miss
    /// the host is asked to discover the catalog, and the full result is
    /// stored with the current time. Never fails.
    ///
    /// Entries hold the unfiltered catalog, so servers sharing launch
    /// parameters each see their own disabled set applied, whichever of
    /// them discovered first.
    pub async fn list_tools(&self, server: &McpServerDescriptor) -> Vec<McpToolDescriptor> {
        let fingerprint = server.fingerprint();
        let now = self.clock.utc();

        if let Some(cached) = self.fresh_entry(&fingerprint, now) {
            debug!(server = %server.id(), count = cached.len(), "tool catalog cache hit");
            return visible_to(server, cached);
        }

        info!(server = %server.id(), "discovering tools");
        let discovered = match self.host.discover(server).await {
            Ok(discovered) => discovered,
            Err(err) => {
                warn!(server = %server.id(), error = %err, "tool discovery failed");
                return Vec::new();
            }
        };

        let catalog: Vec<McpToolDescriptor> = discovered
            .into_iter()
            .map(|tool| McpToolDescriptor::discovered(tool, server))
            .collect();
        info!(server = %server.id(), count = catalog.len(), "discovered tools");
        self.store(fingerprint, catalog.clone(), self.clock.utc());
        visible_to(server, catalog)
    }

    /// Returns the combined catalog of `servers`, in server order.
    ///
    /// Servers are queried concurrently; a failing server contributes
    /// nothing.
    pub async fn get_all_tools(&self, servers: &[McpServerDescriptor]) -> Vec<McpToolDescriptor> {
        let catalogs = join_all(servers.iter().map(|server| self.list_tools(server))).await;
        let tools: Vec<McpToolDescriptor> = catalogs.into_iter().flatten().collect();
        info!(count = tools.len(), servers = servers.len(), "assembled tool catalog");
        tools
    }

    fn fresh_entry(
        &self,
        fingerprint: &CatalogFingerprint,
        now: DateTime<Utc>,
    ) -> Option<Vec<McpToolDescriptor>> {
        let entries = match self.entries.read() {
            Ok(entries) => entries,
            Err(err) => {
                warn!(error = %err, "tool catalog cache lock poisoned");
                return None;
            }
        };
        entries
            .get(fingerprint)
            .filter(|entry| now.signed_duration_since(entry.fetched_at) < self.ttl)
            .map(|entry| entry.tools.clone())
    }

    fn store(
        &self,
        fingerprint: CatalogFingerprint,
        tools: Vec<McpToolDescriptor>,
        fetched_at: DateTime<Utc>,
    ) {
        match self.entries.write() {
            Ok(mut entries) => {
                entries.insert(fingerprint, CachedCatalog { tools, fetched_at });
            }
            Err(err) => warn!(error = %err, "tool catalog cache lock poisoned"),
        }
    }
}

fn visible_to(
    server: &McpServerDescriptor,
    catalog: Vec<McpToolDescriptor>,
) -> Vec<McpToolDescriptor> {
    let total = catalog.len();
    let tools: Vec<McpToolDescriptor> = catalog
        .into_iter()
        .filter(|tool| !server.is_tool_disabled(tool.name()))
        .collect();
    let disabled = total - tools.len();
    if disabled > 0 {
        info!(server = %server.id(), count = disabled, "filtered disabled tools");
    }
    tools
}
