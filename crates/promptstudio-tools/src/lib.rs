//! Safe tool execution for prompt testing.
//!
//! Only read-only tools are provided; this is not an agent execution
//! platform. Every execution path returns a [`ToolOutcome`] - tools never
//! panic out of [`ToolExecutor::execute`] and every external call runs under
//! a hard deadline.

pub mod calc;
pub mod clock;
pub mod reader;
pub mod schema;
pub mod search;

use std::time::Duration;

use promptstudio_models::ToolOutcome;
use serde_json::Value;

pub use schema::{builtin_tool_schemas, tool_metadata, ToolMeta};

const SEARCH_TIMEOUT: Duration = Duration::from_secs(15);
const READER_TIMEOUT: Duration = Duration::from_secs(60);
const LOCAL_TIMEOUT: Duration = Duration::from_millis(7_500);

/// Credentials for the external tool backends
#[derive(Debug, Clone, Default)]
pub struct ToolsConfig {
    pub brave_api_key: Option<String>,
    pub jina_api_key: Option<String>,
}

/// Execute a named tool with JSON arguments under a per-tool deadline
pub struct ToolExecutor {
    config: ToolsConfig,
    client: reqwest::Client,
}

impl ToolExecutor {
    pub fn new(config: ToolsConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    pub fn tool_names() -> &'static [&'static str] {
        &["search_web", "read_url", "get_current_time", "calculate"]
    }

    fn timeout_for(name: &str) -> Duration {
        match name {
            "search_web" => SEARCH_TIMEOUT,
            "read_url" => READER_TIMEOUT,
            _ => LOCAL_TIMEOUT,
        }
    }

    /// Execute a tool; the result envelope is the only way out.
    ///
    /// Unknown names, invalid arguments, timeouts and tool-level error
    /// payloads all come back as failed outcomes.
    pub async fn execute(&self, name: &str, arguments: Value) -> ToolOutcome {
        if !Self::tool_names().contains(&name) {
            return ToolOutcome::error(format!(
                "Unknown tool: {name}. Available tools: {}",
                Self::tool_names().join(", ")
            ));
        }

        let timeout = Self::timeout_for(name);
        match tokio::time::timeout(timeout, self.dispatch(name, arguments)).await {
            Ok(outcome) => outcome,
            Err(_) => ToolOutcome::error(format!(
                "Tool '{name}' timed out after {}s",
                timeout.as_secs_f64()
            )),
        }
    }

    async fn dispatch(&self, name: &str, arguments: Value) -> ToolOutcome {
        let payload = match name {
            "search_web" => {
                let Some(api_key) = self.config.brave_api_key.as_deref() else {
                    return ToolOutcome::error("search API key not configured");
                };
                match parse_args::<search::SearchArgs>(name, arguments) {
                    Ok(args) => search::search_web(&self.client, api_key, &args).await,
                    Err(outcome) => return outcome,
                }
            }
            "read_url" => match parse_args::<reader::ReadUrlArgs>(name, arguments) {
                Ok(args) => {
                    reader::read_url(&self.client, self.config.jina_api_key.as_deref(), args).await
                }
                Err(outcome) => return outcome,
            },
            "get_current_time" => match parse_args::<clock::CurrentTimeArgs>(name, arguments) {
                Ok(args) => clock::get_current_time(&args),
                Err(outcome) => return outcome,
            },
            "calculate" => match parse_args::<CalculateArgs>(name, arguments) {
                Ok(args) => calc::calculate(&args.expression),
                Err(outcome) => return outcome,
            },
            _ => unreachable!("dispatch called with unregistered tool"),
        };

        envelope(payload)
    }
}

#[derive(Debug, serde::Deserialize)]
struct CalculateArgs {
    expression: String,
}

fn parse_args<T: serde::de::DeserializeOwned>(name: &str, arguments: Value) -> Result<T, ToolOutcome> {
    serde_json::from_value(arguments)
        .map_err(|e| ToolOutcome::error(format!("Invalid arguments for '{name}': {e}")))
}

/// A payload carrying an `error` key is surfaced as a failure so the UI can
/// show a clear state; the original payload rides along.
fn envelope(payload: Value) -> ToolOutcome {
    match payload.get("error").filter(|e| !e.is_null()) {
        Some(error) => {
            let message = error
                .as_str()
                .map(str::to_string)
                .unwrap_or_else(|| error.to_string());
            ToolOutcome::error_with_payload(message, payload)
        }
        None => ToolOutcome::success(payload),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn envelope_surfaces_error_payloads() {
        let outcome = envelope(json!({"error": "Query cannot be empty"}));
        assert!(!outcome.success);
        assert_eq!(outcome.error.as_deref(), Some("Query cannot be empty"));
        assert!(outcome.result.is_some());

        let outcome = envelope(json!({"result": 4.0}));
        assert!(outcome.success);
        assert!(outcome.error.is_none());
    }

    #[test]
    fn envelope_ignores_null_error() {
        let outcome = envelope(json!({"error": null, "value": 1}));
        assert!(outcome.success);
    }
}
