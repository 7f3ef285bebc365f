//! Chat MCP: tool-using conversations over Model Context Protocol servers.
//!
//! This crate lets a language model call tools exposed by external MCP
//! servers through a text-embedded `<tool_use>` protocol. It parses tool
//! calls out of generated text, dispatches them concurrently to the right
//! server, caches tool catalogs per server launch, and drives a bounded
//! multi-round loop until the model answers without tools.
//!
//! # Architecture
//!
//! The crate follows hexagonal architecture principles:
//!
//! - **Domain**: Pure types with no infrastructure dependencies
//! - **Ports**: Trait interfaces for the model endpoint, tool servers and
//!   progress consumers
//! - **Adapters**: In-memory implementations of the ports
//!
//! # Modules
//!
//! - [`tool_registry`]: Server registration, catalog caching and tool dispatch
//! - [`conversation`]: Tool-call parsing, prompting and the round loop

pub mod conversation;
pub mod tool_registry;
