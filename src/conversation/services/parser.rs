//! Extraction of tool call intents from generated text.

use crate::tool_registry::domain::ToolCallIntent;
use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;
use tracing::{error, warn};

static TOOL_USE_BLOCK: LazyLock<Result<Regex, regex::Error>> = LazyLock::new(|| {
    Regex::new(
        r"(?s)<tool_use>\s*<tool_name>([^<]+)</tool_name>\s*<parameters>(.*?)</parameters>\s*</tool_use>",
    )
});

/// Parses every `<tool_use>` block in `text`, in document order.
///
/// Blocks may be interleaved with prose. The tool name and parameter text
/// are trimmed; the parameters must be a JSON object. A block whose
/// parameters are not a JSON object is dropped with a warning and its
/// siblings are still parsed. Intents are numbered `call_0`, `call_1`, ...
/// over the blocks that parsed. Tool names are not checked against any
/// catalog.
///
/// # Examples
///
/// ```
/// use chat_mcp::conversation::services::parse_tool_calls;
///
/// let text = "Let me look.\n<tool_use>\n<tool_name>search</tool_name>\n\
///             <parameters>\n{\"query\": \"x\"}\n</parameters>\n</tool_use>";
/// let intents = parse_tool_calls(text);
/// assert_eq!(intents.len(), 1);
/// assert_eq!(intents[0].id, "call_0");
/// assert_eq!(intents[0].name, "search");
/// ```
#[must_use]
pub fn parse_tool_calls(text: &str) -> Vec<ToolCallIntent> {
    let pattern = match TOOL_USE_BLOCK.as_ref() {
        Ok(pattern) => pattern,
        Err(err) => {
            error!(error = %err, "tool_use pattern failed to compile");
            return Vec::new();
        }
    };

    pattern
        .captures_iter(text)
        .filter_map(|block| {
            let name = block.get(1)?.as_str().trim();
            let parameters = block.get(2)?.as_str().trim();
            match serde_json::from_str::<Value>(parameters) {
                Ok(Value::Object(arguments)) => Some((name.to_owned(), arguments)),
                Ok(other) => {
                    warn!(tool = name, found = %json_kind(&other), "tool parameters are not an object; dropping block");
                    None
                }
                Err(err) => {
                    warn!(tool = name, error = %err, "malformed tool parameters; dropping block");
                    None
                }
            }
        })
        .enumerate()
        .map(|(index, (name, arguments))| ToolCallIntent::new(format!("call_{index}"), name, arguments))
        .collect()
}

const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
