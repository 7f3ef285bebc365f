//! MCP server registration, tool discovery and tool dispatch.
//!
//! This context knows which tool servers exist, what tools they expose and
//! how to run a parsed tool call against the right server. It follows
//! hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Catalog caching and dispatch services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;
