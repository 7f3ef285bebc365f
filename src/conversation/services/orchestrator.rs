//! Bounded multi-round loop between the model and the tool servers.

use super::{ProgressBus, ResponseRegistry, build_system_prompt, parse_tool_calls};
use crate::conversation::{
    config::ConversationConfig,
    domain::{
        CompletionUsage, ConversationMessage, ConversationOutcome, MessageMetadata,
        ProgressEvent, Role, TOOL_RESULT_MESSAGE_TYPE, TerminationReason, ToolResponseRecord,
    },
    ports::{CompletionMessage, CompletionRequest, ModelCompletion, ProgressObserver},
};
use crate::tool_registry::{
    domain::{McpServerDescriptor, McpToolDescriptor, ToolCallIntent, ToolCallResponse},
    ports::{McpServerRegistry, ToolServerHost},
    services::{ToolCatalogCache, ToolDispatcher},
};
use mockable::Clock;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{error, info, warn};

/// Drives one user turn: completion, tool dispatch and observation, until
/// the model stops requesting tools or the round cap is hit.
///
/// Rounds run strictly one after another. Within a round every parsed
/// intent is dispatched concurrently. Tool failures come back to the model
/// as observations; only a completion failure ends the turn early.
pub struct ConversationOrchestrator<R, H, M, C>
where
    R: McpServerRegistry,
    H: ToolServerHost,
    M: ModelCompletion,
    C: Clock + Send + Sync,
{
    cache: Arc<ToolCatalogCache<H, C>>,
    dispatcher: ToolDispatcher<R, H>,
    completion: Arc<M>,
    progress: Arc<ProgressBus>,
    config: ConversationConfig,
}

impl<R, H, M, C> ConversationOrchestrator<R, H, M, C>
where
    R: McpServerRegistry,
    H: ToolServerHost,
    M: ModelCompletion,
    C: Clock + Send + Sync,
{
    /// Creates an orchestrator with its own, unsubscribed progress bus.
    #[must_use]
    pub fn new(
        cache: Arc<ToolCatalogCache<H, C>>,
        dispatcher: ToolDispatcher<R, H>,
        completion: Arc<M>,
        config: ConversationConfig,
    ) -> Self {
        Self {
            cache,
            dispatcher,
            completion,
            progress: Arc::new(ProgressBus::new()),
            config,
        }
    }

    /// Publishes progress through `progress` instead of a private bus.
    #[must_use]
    pub fn with_progress(mut self, progress: Arc<ProgressBus>) -> Self {
        self.progress = progress;
        self
    }

    /// Returns the progress bus events are published on.
    #[must_use]
    pub const fn progress(&self) -> &Arc<ProgressBus> {
        &self.progress
    }

    /// Returns the loop configuration.
    #[must_use]
    pub const fn config(&self) -> &ConversationConfig {
        &self.config
    }

    /// Runs a turn with the configured round cap.
    pub async fn run(
        &self,
        transcript: Vec<ConversationMessage>,
        servers: &[McpServerDescriptor],
    ) -> ConversationOutcome {
        self.run_bounded(transcript, servers, self.config.max_iterations)
            .await
    }

    /// Runs a turn issuing at most `max_iterations` completion calls.
    ///
    /// A transcript without a system message gets the configured default
    /// one at the front. When the cap is reached while the model still
    /// requests tools, the last completion is returned with
    /// [`TerminationReason::IterationLimit`].
    pub async fn run_bounded(
        &self,
        transcript: Vec<ConversationMessage>,
        servers: &[McpServerDescriptor],
        max_iterations: usize,
    ) -> ConversationOutcome {
        let mut state = TurnState::new(self.with_system_message(transcript));

        for round in 0..max_iterations {
            info!(round, servers = servers.len(), "starting round");
            let catalog = self.cache.get_all_tools(servers).await;
            let request = self.completion_request(&state.transcript, &catalog);

            state.completion_calls += 1;
            let completion = match self.completion.complete(&request).await {
                Ok(completion) => completion,
                Err(err) => {
                    error!(round, error = %err, "completion failed");
                    let metadata = MessageMetadata {
                        model: Some(self.config.model.clone()),
                        round: Some(round),
                        ..MessageMetadata::default()
                    }
                    .with_error(err.to_string());
                    let message = ConversationMessage::assistant(format!(
                        "Sorry, the model call failed: {err}"
                    ))
                    .with_metadata(metadata);
                    return state.finish(message, None, TerminationReason::CompletionFailed);
                }
            };

            let intents = parse_tool_calls(&completion.text);
            let metadata =
                MessageMetadata::for_completion(&self.config.model, round, completion.usage)
                    .with_tool_calls_detected(intents.len());
            let message = ConversationMessage::assistant(completion.text)
                .with_metadata(metadata)
                .with_tool_calls(intents.clone());

            if intents.is_empty() {
                info!(round, "model answered without tool calls");
                return state.finish(
                    message,
                    Some(completion.usage),
                    TerminationReason::Completed,
                );
            }

            info!(round, count = intents.len(), "model requested tool calls");
            state.transcript.push(message.clone());
            let responses = self
                .dispatch_round(round, &intents, &catalog, &state.responses)
                .await;
            state.transcript.extend(intents.iter().zip(&responses).enumerate().map(
                |(index, (intent, response))| {
                    observation(intent, response, record_id(intent, round, index))
                },
            ));
            state.last = Some((message, completion.usage));
        }

        warn!(max_iterations, "iteration limit reached with tool calls pending");
        let (message, usage) = state.last.take().map_or_else(
            || (ConversationMessage::assistant(""), None),
            |(message, usage)| (message, Some(usage)),
        );
        state.finish(message, usage, TerminationReason::IterationLimit)
    }

    fn with_system_message(
        &self,
        mut transcript: Vec<ConversationMessage>,
    ) -> Vec<ConversationMessage> {
        if !transcript
            .iter()
            .any(|message| message.role() == Role::System)
        {
            transcript.insert(
                0,
                ConversationMessage::system(self.config.default_system_prompt.clone()),
            );
        }
        transcript
    }

    fn completion_request(
        &self,
        transcript: &[ConversationMessage],
        catalog: &[McpToolDescriptor],
    ) -> CompletionRequest {
        let mut augmented = false;
        let messages = transcript
            .iter()
            .map(|message| {
                if message.role() == Role::System && !augmented {
                    augmented = true;
                    CompletionMessage::new(Role::System, self.augment(message.content(), catalog))
                } else {
                    CompletionMessage::from(message)
                }
            })
            .collect();
        CompletionRequest {
            messages,
            model: self.config.model.clone(),
            temperature: self.config.temperature,
        }
    }

    fn augment(&self, base_prompt: &str, catalog: &[McpToolDescriptor]) -> String {
        build_system_prompt(base_prompt, catalog).unwrap_or_else(|err| {
            warn!(error = %err, model = %self.config.model, "using system prompt without tools");
            base_prompt.to_owned()
        })
    }

    async fn dispatch_round(
        &self,
        round: usize,
        intents: &[ToolCallIntent],
        catalog: &[McpToolDescriptor],
        registry: &Mutex<ResponseRegistry>,
    ) -> Vec<ToolCallResponse> {
        let sink: &dyn ProgressObserver = &*self.progress;
        {
            let mut records = lock(registry);
            for (index, intent) in intents.iter().enumerate() {
                records.upsert(
                    ToolResponseRecord::invoking(record_id(intent, round, index), intent.clone()),
                    Some(sink),
                );
            }
        }

        let images = Mutex::new(Vec::<String>::new());
        self.dispatcher
            .execute_many(intents, catalog, |index, intent, response| {
                lock(registry).upsert(
                    ToolResponseRecord::finished(
                        record_id(intent, round, index),
                        intent.clone(),
                        response,
                    ),
                    Some(sink),
                );

                let produced = response.image_data_uris();
                if !produced.is_empty() {
                    let mut accumulated = lock(&images);
                    accumulated.extend(produced);
                    sink.on_event(&ProgressEvent::generated_images(accumulated.clone()));
                }
            })
            .await
    }
}

struct TurnState {
    transcript: Vec<ConversationMessage>,
    responses: Mutex<ResponseRegistry>,
    completion_calls: usize,
    last: Option<(ConversationMessage, CompletionUsage)>,
}

impl TurnState {
    const fn new(transcript: Vec<ConversationMessage>) -> Self {
        Self {
            transcript,
            responses: Mutex::new(ResponseRegistry::new()),
            completion_calls: 0,
            last: None,
        }
    }

    fn finish(
        self,
        message: ConversationMessage,
        usage: Option<CompletionUsage>,
        termination: TerminationReason,
    ) -> ConversationOutcome {
        let metadata = message.metadata().clone().with_termination(termination);
        ConversationOutcome {
            message: message.with_metadata(metadata),
            transcript: self.transcript,
            tool_responses: self
                .responses
                .into_inner()
                .unwrap_or_else(PoisonError::into_inner)
                .into_records(),
            usage,
            completion_calls: self.completion_calls,
            termination,
        }
    }
}

fn record_id(intent: &ToolCallIntent, round: usize, index: usize) -> String {
    format!("{}-{round}-{index}", intent.id)
}

fn observation(
    intent: &ToolCallIntent,
    response: &ToolCallResponse,
    correlation_id: String,
) -> ConversationMessage {
    let status = if response.is_error() {
        "failed"
    } else {
        "success"
    };
    let content = format!(
        "Tool call result:\nTool name: {}\nExecution status: {status}\nResult content:\n{}",
        intent.name,
        response.text()
    );
    let metadata = MessageMetadata {
        tool_name: Some(intent.name.clone()),
        is_error: Some(response.is_error()),
        message_type: Some(TOOL_RESULT_MESSAGE_TYPE.to_owned()),
        tool_result: serde_json::to_value(response).ok(),
        ..MessageMetadata::default()
    };
    ConversationMessage::new(Role::User, content)
        .with_metadata(metadata)
        .with_correlation_id(correlation_id)
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
