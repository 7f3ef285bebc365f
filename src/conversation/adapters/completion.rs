//! Scripted completion backend for deterministic sessions and tests.

use crate::conversation::{
    domain::CompletionUsage,
    ports::{Completion, CompletionRequest, ModelCompletion, ModelCompletionError, ModelCompletionResult},
};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Completion backend that replays queued outcomes in order.
///
/// Every request is recorded. Once the queue is empty each call fails with
/// [`ModelCompletionError::Unavailable`].
#[derive(Debug, Default)]
pub struct ScriptedModelCompletion {
    state: Mutex<ScriptState>,
}

#[derive(Debug, Default)]
struct ScriptState {
    outcomes: VecDeque<ModelCompletionResult<Completion>>,
    requests: Vec<CompletionRequest>,
}

impl ScriptedModelCompletion {
    /// Creates a backend with an empty script.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a backend that answers with `replies` in order.
    #[must_use]
    pub fn with_replies<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let backend = Self::new();
        for reply in replies {
            backend.push_reply(reply);
        }
        backend
    }

    fn lock(&self) -> MutexGuard<'_, ScriptState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Queues a text reply with zero usage.
    pub fn push_reply(&self, text: impl Into<String>) {
        self.push_completion(Completion::new(text, CompletionUsage::default()));
    }

    /// Queues a full completion.
    pub fn push_completion(&self, completion: Completion) {
        self.lock().outcomes.push_back(Ok(completion));
    }

    /// Queues a failure.
    pub fn push_failure(&self, error: ModelCompletionError) {
        self.lock().outcomes.push_back(Err(error));
    }

    /// Returns every request received so far.
    #[must_use]
    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.lock().requests.clone()
    }

    /// Returns how many completion calls were made.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.lock().requests.len()
    }
}

#[async_trait]
impl ModelCompletion for ScriptedModelCompletion {
    async fn complete(&self, request: &CompletionRequest) -> ModelCompletionResult<Completion> {
        let mut state = self.lock();
        state.requests.push(request.clone());
        state
            .outcomes
            .pop_front()
            .unwrap_or(Err(ModelCompletionError::Unavailable))
    }
}
