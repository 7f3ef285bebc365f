//! Conversation participant roles.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The source of a conversation message.
///
/// Tool observations are carried as [`Role::User`] messages so that
/// completion backends without a dedicated tool-result role accept them;
/// [`Role::Tool`] exists for callers that build transcripts by hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Instructions framing the conversation.
    System,
    /// End-user input, including tool observations.
    User,
    /// Model output.
    Assistant,
    /// Tool output addressed to the model.
    Tool,
}

impl Role {
    /// Returns the lowercase wire name of the role.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::System => "system",
            Self::User => "user",
            Self::Assistant => "assistant",
            Self::Tool => "tool",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
