//! Token accounting reported by completion backends.

use serde::{Deserialize, Serialize};

/// Token usage of one completion call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionUsage {
    /// Tokens consumed by the prompt.
    pub prompt_tokens: u64,
    /// Tokens produced by the completion.
    pub completion_tokens: u64,
    /// Total tokens billed for the call.
    pub total_tokens: u64,
}

impl CompletionUsage {
    /// Creates a usage record whose total is the sum of both parts.
    #[must_use]
    pub const fn new(prompt_tokens: u64, completion_tokens: u64) -> Self {
        Self {
            prompt_tokens,
            completion_tokens,
            total_tokens: prompt_tokens.saturating_add(completion_tokens),
        }
    }
}
