//! Messages making up a conversation transcript.

use super::{MessageId, MessageMetadata, Role};
use crate::tool_registry::domain::ToolCallIntent;
use serde::{Deserialize, Serialize};

/// A single message in a conversation transcript.
///
/// Transcripts are append-only: messages are never edited once pushed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationMessage {
    id: MessageId,
    role: Role,
    content: String,
    #[serde(default, skip_serializing_if = "MessageMetadata::is_empty")]
    metadata: MessageMetadata,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    tool_calls: Vec<ToolCallIntent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    correlation_id: Option<String>,
}

impl ConversationMessage {
    /// Creates a message with a fresh identifier and no metadata.
    #[must_use]
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            id: MessageId::new(),
            role,
            content: content.into(),
            metadata: MessageMetadata::empty(),
            tool_calls: Vec::new(),
            correlation_id: None,
        }
    }

    /// Creates a system message.
    #[must_use]
    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    /// Creates a user message.
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    /// Creates an assistant message.
    #[must_use]
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    /// Replaces the metadata.
    #[must_use]
    pub fn with_metadata(mut self, metadata: MessageMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Records the tool calls emitted by this message.
    #[must_use]
    pub fn with_tool_calls(mut self, tool_calls: Vec<ToolCallIntent>) -> Self {
        self.tool_calls = tool_calls;
        self
    }

    /// Links this message to the tool call that produced it.
    #[must_use]
    pub fn with_correlation_id(mut self, correlation_id: impl Into<String>) -> Self {
        self.correlation_id = Some(correlation_id.into());
        self
    }

    /// Returns the message identifier.
    #[must_use]
    pub const fn id(&self) -> MessageId {
        self.id
    }

    /// Returns the message role.
    #[must_use]
    pub const fn role(&self) -> Role {
        self.role
    }

    /// Returns the text content.
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Returns the metadata.
    #[must_use]
    pub const fn metadata(&self) -> &MessageMetadata {
        &self.metadata
    }

    /// Returns the tool calls emitted by this message.
    #[must_use]
    pub fn tool_calls(&self) -> &[ToolCallIntent] {
        &self.tool_calls
    }

    /// Returns the identifier of the triggering tool call, if any.
    #[must_use]
    pub fn correlation_id(&self) -> Option<&str> {
        self.correlation_id.as_deref()
    }
}
