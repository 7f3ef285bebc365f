//! Tool-using conversations driven over MCP servers.
//!
//! A turn alternates between the model and the tool servers: the model's
//! output is scanned for `<tool_use>` blocks, the requested tools run
//! concurrently, and their results are fed back as observations until the
//! model answers without tools or the round cap is reached. The module
//! follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Parsing, prompting and orchestration services in [`services`]

pub mod adapters;
mod config;
pub mod domain;
pub mod ports;
pub mod services;

pub use config::{
    ConversationConfig, DEFAULT_MAX_ITERATIONS, DEFAULT_MODEL, DEFAULT_SYSTEM_PROMPT,
    DEFAULT_TEMPERATURE, SessionConfig,
};

#[cfg(test)]
mod tests;
