//! System-prompt augmentation with the tool-use protocol and catalog.

use crate::tool_registry::domain::McpToolDescriptor;
use minijinja::{Environment, context};
use thiserror::Error;

const SYSTEM_PROMPT_TEMPLATE: &str =
    "{{ user_system_prompt }}\n\n{{ tool_use_protocol }}\n\n{{ available_tools }}";

/// Tag grammar and operating rules the model must follow to call tools.
pub const TOOL_USE_PROTOCOL: &str = r#"
You have access to tools that you can use to help answer questions. 
When using a tool, format your request using XML tags:

<tool_use>
<tool_name>tool_name_here</tool_name>
<parameters>
{
  "required_parameter": "value",
  "optional_parameter": "value_if_needed"
}
</parameters>
</tool_use>

IMPORTANT RULES:
1. Only call tools when you need additional information
2. After receiving tool results (success or error), provide your final answer directly
3. Do NOT retry failed tool calls or call the same tool multiple times
4. For optional parameters: ONLY include them if you have a specific value - 
   do NOT pass empty strings "", null, or placeholder values
5. When tool parameters are not mentioned or not needed, 
   simply omit them from the parameters object
"#;

/// Failure to render the augmented prompt.
#[derive(Debug, Error)]
#[error("failed to render system prompt: {0}")]
pub struct PromptRenderError(#[from] minijinja::Error);

/// Builds the system prompt that teaches the model the tool-use protocol.
///
/// # Errors
///
/// Returns [`PromptRenderError`] when the prompt template fails to render.
///
/// # Examples
///
/// ```
/// use chat_mcp::conversation::services::build_system_prompt;
///
/// let prompt = build_system_prompt("Be brief.", &[]).expect("prompt should render");
/// assert_eq!(prompt, "Be brief.");
/// ```
pub fn build_system_prompt(
    base_prompt: &str,
    catalog: &[McpToolDescriptor],
) -> Result<String, PromptRenderError> {
    if catalog.is_empty() {
        return Ok(base_prompt.to_owned());
    }

    let environment = Environment::new();
    let rendered = environment.render_str(
        SYSTEM_PROMPT_TEMPLATE,
        context! {
            user_system_prompt => base_prompt,
            tool_use_protocol => TOOL_USE_PROTOCOL,
            available_tools => render_tool_listing(catalog),
        },
    )?;
    Ok(rendered)
}

/// Renders the catalog as a markdown list with parameter details.
#[must_use]
pub fn render_tool_listing(catalog: &[McpToolDescriptor]) -> String {
    let mut listing = String::from("Available tools:\n\n");
    for tool in catalog {
        listing.push_str(&format!("- **{}**: {}\n", tool.name(), tool.description()));
        if let Some(parameters) = tool.parameters() {
            listing.push_str("  Parameters:\n");
            for parameter in parameters {
                let marker = if parameter.required { " (required)" } else { "" };
                listing.push_str(&format!(
                    "    - {} ({}){marker}: {}\n",
                    parameter.name, parameter.kind, parameter.description
                ));
            }
        }
        listing.push('\n');
    }
    listing
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tool_registry::domain::{
        DiscoveredTool, LaunchSpec, McpServerDescriptor, McpServerId,
    };
    use rstest::{fixture, rstest};
    use serde_json::json;

    #[fixture]
    fn catalog() -> Vec<McpToolDescriptor> {
        let server = McpServerDescriptor::new(
            McpServerId::new("web").expect("valid id"),
            "Web",
            LaunchSpec::new("web-server").expect("valid command"),
        )
        .expect("valid descriptor");
        let search = DiscoveredTool::new(
            "search",
            "Searches the web",
            json!({
                "type": "object",
                "properties": {
                    "query": {"type": "string", "description": "Search terms"},
                    "limit": {"type": "integer"},
                    "site": {"description": "Restrict to a domain"}
                },
                "required": ["query"]
            }),
        )
        .expect("valid tool");
        let now = DiscoveredTool::new("now", "Current time", json!({})).expect("valid tool");
        vec![
            McpToolDescriptor::discovered(search, &server),
            McpToolDescriptor::discovered(now, &server),
        ]
    }

    #[rstest]
    fn empty_catalog_leaves_prompt_unchanged() {
        let prompt = build_system_prompt("Be brief.", &[]).expect("prompt should render");

        assert_eq!(prompt, "Be brief.");
    }

    #[rstest]
    fn sections_appear_in_fixed_order(catalog: Vec<McpToolDescriptor>) {
        let prompt = build_system_prompt("Be brief.", &catalog).expect("prompt should render");

        let base = prompt.find("Be brief.");
        let rules = prompt.find("IMPORTANT RULES:");
        let tools = prompt.find("Available tools:");
        assert_eq!(base, Some(0));
        assert!(base < rules && rules < tools);
        assert!(prompt.contains("3. Do NOT retry failed tool calls or call the same tool multiple times"));
    }

    #[rstest]
    fn listing_describes_parameters(catalog: Vec<McpToolDescriptor>) {
        let listing = render_tool_listing(&catalog);

        assert_eq!(
            listing,
            concat!(
                "Available tools:\n\n",
                "- **search**: Searches the web\n",
                "  Parameters:\n",
                "    - query (string) (required): Search terms\n",
                "    - limit (integer): \n",
                "    - site (string): Restrict to a domain\n",
                "\n",
                "- **now**: Current time\n",
                "\n",
            )
        );
    }
}
