//! In-memory adapters for the tool registry ports.

mod repository;

pub use repository::InMemoryMcpServerRegistry;
