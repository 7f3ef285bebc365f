//! Final results of an orchestrated conversation turn.

use super::{CompletionUsage, ConversationMessage, ToolResponseRecord};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Why the round loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerminationReason {
    /// The last completion requested no tools.
    Completed,
    /// The round cap was reached while the model still requested tools.
    IterationLimit,
    /// The completion backend failed.
    CompletionFailed,
    /// No enabled tool server was available.
    NoServers,
}

impl TerminationReason {
    /// Returns the snake-case name stored in message metadata.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Completed => "completed",
            Self::IterationLimit => "iteration_limit",
            Self::CompletionFailed => "completion_failed",
            Self::NoServers => "no_servers",
        }
    }
}

impl fmt::Display for TerminationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of one orchestrated user turn.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConversationOutcome {
    /// Final assistant message returned to the user.
    pub message: ConversationMessage,
    /// Messages of the turn, starting with the seeded transcript. Assistant
    /// tool requests and their observations are included; a final answer
    /// that requested no tools is not.
    pub transcript: Vec<ConversationMessage>,
    /// Latest state of every tool call made during the turn.
    pub tool_responses: Vec<ToolResponseRecord>,
    /// Usage of the final completion call, when one succeeded.
    pub usage: Option<CompletionUsage>,
    /// Number of completion calls issued.
    pub completion_calls: usize,
    /// Why the loop stopped.
    pub termination: TerminationReason,
}

impl ConversationOutcome {
    /// Returns the final answer text.
    #[must_use]
    pub fn text(&self) -> &str {
        self.message.content()
    }
}
