//! Configuration for the conversation round loop.

use crate::tool_registry::services::CatalogCacheConfig;
use serde::Deserialize;

/// Model used when none is configured.
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";
/// System prompt inserted when a transcript has none.
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful assistant.";
/// Round cap used when none is configured.
pub const DEFAULT_MAX_ITERATIONS: usize = 3;
/// Sampling temperature used when none is configured.
pub const DEFAULT_TEMPERATURE: f64 = 0.7;

/// Settings shared by every round of a conversation turn.
///
/// Missing fields fall back to their defaults when deserialised.
///
/// # Examples
///
/// ```
/// use chat_mcp::conversation::ConversationConfig;
///
/// let config = ConversationConfig::default()
///     .with_model("gpt-4o")
///     .with_max_iterations(5);
/// assert_eq!(config.model, "gpt-4o");
/// assert_eq!(config.max_iterations, 5);
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ConversationConfig {
    /// Model identifier passed to the completion backend.
    pub model: String,
    /// Sampling temperature passed to the completion backend.
    pub temperature: f64,
    /// Maximum number of completion calls per turn.
    pub max_iterations: usize,
    /// System prompt used when the transcript carries none.
    pub default_system_prompt: String,
}

impl Default for ConversationConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_owned(),
            temperature: DEFAULT_TEMPERATURE,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            default_system_prompt: DEFAULT_SYSTEM_PROMPT.to_owned(),
        }
    }
}

impl ConversationConfig {
    /// Sets the model identifier.
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Sets the sampling temperature.
    #[must_use]
    #[expect(
        clippy::missing_const_for_fn,
        reason = "destructors of the owning struct prevent a const builder"
    )]
    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }

    /// Sets the round cap.
    #[must_use]
    #[expect(
        clippy::missing_const_for_fn,
        reason = "destructors of the owning struct prevent a const builder"
    )]
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Sets the fallback system prompt.
    #[must_use]
    pub fn with_default_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.default_system_prompt = prompt.into();
        self
    }
}

/// Settings for a [`ChatSession`](super::services::ChatSession).
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Round loop settings.
    pub conversation: ConversationConfig,
    /// Tool catalog cache settings.
    pub catalog: CatalogCacheConfig,
}
