//! Application services for tool catalog assembly and tool dispatch.

mod catalog;
mod dispatcher;

pub use catalog::{CatalogCacheConfig, DEFAULT_CATALOG_TTL, ToolCatalogCache};
pub use dispatcher::{DispatchError, ToolDispatcher};
