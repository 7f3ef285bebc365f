//! Adapter implementations for the tool registry ports.

pub mod memory;

mod runtime;

pub use runtime::{InMemoryToolServerHost, RecordedInvocation};
