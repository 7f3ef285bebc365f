//! Shared fixtures for the in-memory integration tests.

use std::sync::{Mutex, PoisonError};

use chat_mcp::tool_registry::domain::{
    DiscoveredTool, LaunchSpec, McpServerDescriptor, McpServerId, ToolRegistryDomainError,
};
use chrono::{DateTime, Local, TimeDelta, TimeZone, Utc};
use mockable::Clock;
use serde_json::{Map, json};

/// Clock that only moves when a test advances it.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    /// Creates a clock frozen at 2026-01-01T00:00:00Z.
    #[must_use]
    pub fn new() -> Self {
        let start = Utc
            .with_ymd_and_hms(2026, 1, 1, 0, 0, 0)
            .single()
            .unwrap_or_else(Utc::now);
        Self {
            now: Mutex::new(start),
        }
    }

    /// Moves the clock forward by `delta`.
    pub fn advance(&self, delta: TimeDelta) {
        let mut now = self.now.lock().unwrap_or_else(PoisonError::into_inner);
        *now += delta;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Builds a launch spec for `command` with the given arguments.
///
/// # Errors
///
/// Returns an error when the command is blank.
pub fn launch(command: &str, args: &[&str]) -> Result<LaunchSpec, ToolRegistryDomainError> {
    Ok(LaunchSpec::new(command)?.with_args(args.iter().copied()))
}

/// Builds a server descriptor whose display name equals its identifier.
///
/// # Errors
///
/// Returns an error when the identifier is invalid.
pub fn server(
    id: &str,
    launch: LaunchSpec,
) -> Result<McpServerDescriptor, ToolRegistryDomainError> {
    McpServerDescriptor::new(McpServerId::new(id)?, id, launch)
}

/// Builds a discovered tool taking one required string parameter.
///
/// # Errors
///
/// Returns an error when the tool name is blank.
pub fn string_tool(name: &str, parameter: &str) -> Result<DiscoveredTool, ToolRegistryDomainError> {
    let mut properties = Map::new();
    properties.insert(
        parameter.to_owned(),
        json!({"type": "string", "description": "input"}),
    );
    DiscoveredTool::new(
        name,
        format!("{name} tool"),
        json!({
            "type": "object",
            "properties": properties,
            "required": [parameter]
        }),
    )
}
