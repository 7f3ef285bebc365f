//! Model-completion port.

use crate::conversation::domain::{CompletionUsage, ConversationMessage, Role};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One role-tagged plain-text message sent to the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionMessage {
    /// Message role.
    pub role: Role,
    /// Message text.
    pub content: String,
}

impl CompletionMessage {
    /// Creates a completion message.
    #[must_use]
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

impl From<&ConversationMessage> for CompletionMessage {
    fn from(message: &ConversationMessage) -> Self {
        Self::new(message.role(), message.content())
    }
}

/// Input of a completion call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionRequest {
    /// Ordered transcript, system message first.
    pub messages: Vec<CompletionMessage>,
    /// Model identifier.
    pub model: String,
    /// Sampling temperature.
    pub temperature: f64,
}

/// Output of a completion call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Completion {
    /// Generated assistant text.
    pub text: String,
    /// Token usage of the call.
    pub usage: CompletionUsage,
}

impl Completion {
    /// Creates a completion.
    #[must_use]
    pub fn new(text: impl Into<String>, usage: CompletionUsage) -> Self {
        Self {
            text: text.into(),
            usage,
        }
    }
}

/// Errors raised by completion backends.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelCompletionError {
    /// The backend rejected or failed the request.
    #[error("completion request failed: {0}")]
    Request(String),

    /// The backend had no completion to give.
    #[error("no completion available")]
    Unavailable,
}

/// Result type for completion calls.
pub type ModelCompletionResult<T> = Result<T, ModelCompletionError>;

/// Language-model completion endpoint.
#[async_trait]
pub trait ModelCompletion: Send + Sync {
    /// Generates the next assistant message for `request`.
    async fn complete(&self, request: &CompletionRequest) -> ModelCompletionResult<Completion>;
}
