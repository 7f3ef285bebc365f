//! Full chat turns through the session facade with in-memory adapters.

use std::sync::Arc;

use chat_mcp::conversation::{
    SessionConfig,
    adapters::{ChannelProgressObserver, ScriptedModelCompletion},
    domain::{ProgressPayload, Role, TerminationReason, ToolResponseStatus},
    services::{ChatOptions, ChatSession},
};
use chat_mcp::tool_registry::{
    adapters::{InMemoryToolServerHost, memory::InMemoryMcpServerRegistry},
    domain::{LaunchSpec, ToolContent},
};
use chrono::TimeDelta;
use rstest::{fixture, rstest};

use super::helpers::{ManualClock, launch, server, string_tool};

type TestSession = ChatSession<
    InMemoryMcpServerRegistry,
    InMemoryToolServerHost,
    ScriptedModelCompletion,
    ManualClock,
>;

struct ChatContext {
    host: Arc<InMemoryToolServerHost>,
    completion: Arc<ScriptedModelCompletion>,
    clock: Arc<ManualClock>,
    files: LaunchSpec,
    session: TestSession,
}

#[fixture]
fn context() -> ChatContext {
    let host = Arc::new(InMemoryToolServerHost::new());
    let files = launch("fs-server", &["--root", "/srv"]).expect("valid launch");
    host.set_tool_catalog(
        &files,
        vec![
            string_tool("read_file", "path").expect("valid tool"),
            string_tool("list_dir", "path").expect("valid tool"),
        ],
    )
    .expect("catalog should be stored");
    host.set_tool_result(
        &files,
        "read_file",
        vec![ToolContent::Text("fn main() {}".to_owned())],
    )
    .expect("result should be stored");
    host.set_tool_result(
        &files,
        "list_dir",
        vec![ToolContent::Text("main.rs\nlib.rs".to_owned())],
    )
    .expect("result should be stored");

    let completion = Arc::new(ScriptedModelCompletion::new());
    let clock = Arc::new(ManualClock::new());
    let session = ChatSession::with_config(
        Arc::new(InMemoryMcpServerRegistry::new()),
        host.clone(),
        completion.clone(),
        clock.clone(),
        SessionConfig::default(),
    );
    ChatContext {
        host,
        completion,
        clock,
        files,
        session,
    }
}

async fn register_files(context: &ChatContext) {
    let count = context
        .session
        .register_server(&server("fs", context.files.clone()).expect("valid server"))
        .await
        .expect("registration should succeed");
    assert_eq!(count, 2);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn turns_reuse_catalog_until_it_expires(context: ChatContext) {
    register_files(&context).await;
    context.completion.push_reply("Hi there.");
    context.completion.push_reply("Hello again.");

    context
        .session
        .chat("hello", ChatOptions::default())
        .await
        .expect("chat should succeed");
    assert_eq!(context.host.discovery_count(&context.files), 1);

    context.clock.advance(TimeDelta::minutes(6));
    let outcome = context
        .session
        .chat("hello again", ChatOptions::default())
        .await
        .expect("chat should succeed");

    assert_eq!(outcome.text(), "Hello again.");
    assert_eq!(context.host.discovery_count(&context.files), 2);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn parallel_calls_are_observed_in_intent_order(context: ChatContext) {
    register_files(&context).await;
    context.completion.push_reply(
        "Checking.\n\
         <tool_use><tool_name>list_dir</tool_name><parameters>{\"path\": \"src\"}</parameters></tool_use>\n\
         <tool_use><tool_name>read_file</tool_name><parameters>{\"path\": \"src/main.rs\"}</parameters></tool_use>",
    );
    context
        .completion
        .push_reply("src has main.rs and lib.rs; main is empty.");

    let outcome = context
        .session
        .chat("what is in src?", ChatOptions::default())
        .await
        .expect("chat should succeed");

    assert_eq!(outcome.termination, TerminationReason::Completed);
    assert_eq!(context.host.invocations().len(), 2);

    let observations: Vec<(Option<&str>, &str)> = outcome
        .transcript
        .iter()
        .filter(|message| message.metadata().message_type.is_some())
        .map(|message| (message.correlation_id(), message.content()))
        .collect();
    assert_eq!(
        observations,
        vec![
            (
                Some("call_0-0-0"),
                "Tool call result:\nTool name: list_dir\nExecution status: success\nResult content:\nmain.rs\nlib.rs"
            ),
            (
                Some("call_1-0-1"),
                "Tool call result:\nTool name: read_file\nExecution status: success\nResult content:\nfn main() {}"
            ),
        ]
    );

    let second_request = context
        .completion
        .requests()
        .into_iter()
        .nth(1)
        .expect("second completion issued");
    let roles: Vec<Role> = second_request
        .messages
        .iter()
        .map(|message| message.role)
        .collect();
    assert_eq!(
        roles,
        vec![Role::System, Role::User, Role::Assistant, Role::User, Role::User]
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn progress_stream_reports_each_call(context: ChatContext) {
    register_files(&context).await;
    let (observer, mut events) = ChannelProgressObserver::channel();
    context.session.subscribe(Arc::new(observer));
    context.completion.push_reply(
        "<tool_use><tool_name>read_file</tool_name><parameters>{\"path\": \"a\"}</parameters></tool_use>",
    );
    context.completion.push_reply("Done.");

    context
        .session
        .chat("read a", ChatOptions::default())
        .await
        .expect("chat should succeed");

    let mut statuses = Vec::new();
    while let Ok(event) = events.try_recv() {
        if let Some(ProgressPayload::ToolResponse { record }) = event.payload {
            statuses.push((record.id, record.status));
        }
    }
    assert_eq!(
        statuses,
        vec![
            ("call_0-0-0".to_owned(), ToolResponseStatus::Invoking),
            ("call_0-0-0".to_owned(), ToolResponseStatus::Done),
        ]
    );
}
