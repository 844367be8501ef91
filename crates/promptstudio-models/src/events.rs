use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Normalized event parsed from the upstream streaming response
#[derive(Debug, Clone, PartialEq)]
pub enum UpstreamEvent {
    ContentDelta {
        text: String,
    },
    ReasoningDelta {
        text: String,
    },
    ToolCallDelta {
        index: u32,
        id: Option<String>,
        name: Option<String>,
        arguments: Option<String>,
    },
    Done,
}

/// Uniform result envelope produced by tool execution.
///
/// Exactly one of `result`/`error` is meaningful; a failed tool that still
/// produced a payload keeps it in `result` alongside the error.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ToolOutcome {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub error: Option<String>,
}

impl ToolOutcome {
    pub fn success(result: Value) -> Self {
        Self {
            success: true,
            result: Some(result),
            error: None,
        }
    }

    pub fn error(error: impl Into<String>) -> Self {
        Self {
            success: false,
            result: None,
            error: Some(error.into()),
        }
    }

    pub fn error_with_payload(error: impl Into<String>, payload: Value) -> Self {
        Self {
            success: false,
            result: Some(payload),
            error: Some(error.into()),
        }
    }

    /// JSON-encoded content for the tool message fed back to the model
    pub fn tool_message_content(&self) -> String {
        if self.success {
            serde_json::to_string(self.result.as_ref().unwrap_or(&Value::Object(Default::default())))
                .unwrap_or_else(|_| "{}".to_string())
        } else {
            let error = self.error.as_deref().unwrap_or("Tool execution failed");
            serde_json::json!({"error": error}).to_string()
        }
    }
}

/// Completed tool call as surfaced to the client
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ToolCallSummary {
    pub id: String,
    pub name: String,
    pub arguments: String,
}

/// Event emitted on the downstream SSE channel
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DownstreamEvent {
    Reasoning {
        content: String,
    },
    Content {
        content: String,
    },
    ToolCalls {
        calls: Vec<ToolCallSummary>,
    },
    ToolExecuting {
        id: String,
        name: String,
        category: String,
        visibility: String,
    },
    ToolResult {
        id: String,
        name: String,
        result: ToolOutcome,
        category: String,
        visibility: String,
    },
    Warning {
        message: String,
        #[serde(skip_serializing_if = "Option::is_none", default)]
        code: Option<String>,
    },
    Error {
        error: String,
    },
    Debug {
        message: String,
    },
    Done {
        done: bool,
    },
}

impl DownstreamEvent {
    pub fn content(text: impl Into<String>) -> Self {
        DownstreamEvent::Content {
            content: text.into(),
        }
    }

    pub fn reasoning(text: impl Into<String>) -> Self {
        DownstreamEvent::Reasoning {
            content: text.into(),
        }
    }

    pub fn warning(message: impl Into<String>, code: Option<&str>) -> Self {
        DownstreamEvent::Warning {
            message: message.into(),
            code: code.map(str::to_string),
        }
    }

    pub fn error(error: impl Into<String>) -> Self {
        DownstreamEvent::Error {
            error: error.into(),
        }
    }

    pub fn done() -> Self {
        DownstreamEvent::Done { done: true }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn downstream_events_carry_type_discriminator() {
        let event = DownstreamEvent::content("hi");
        assert_eq!(
            serde_json::to_value(&event).unwrap(),
            json!({"type": "content", "content": "hi"})
        );

        let event = DownstreamEvent::done();
        assert_eq!(
            serde_json::to_value(&event).unwrap(),
            json!({"type": "done", "done": true})
        );
    }

    #[test]
    fn warning_omits_missing_code() {
        let value = serde_json::to_value(DownstreamEvent::warning("careful", None)).unwrap();
        assert!(value.get("code").is_none());
        let value =
            serde_json::to_value(DownstreamEvent::warning("trimmed", Some("TOOL_CLAMP"))).unwrap();
        assert_eq!(value["code"], "TOOL_CLAMP");
    }

    #[test]
    fn tool_outcome_message_content() {
        let ok = ToolOutcome::success(json!({"answer": 42}));
        assert_eq!(ok.tool_message_content(), r#"{"answer":42}"#);

        let failed = ToolOutcome::error("boom");
        assert_eq!(failed.tool_message_content(), r#"{"error":"boom"}"#);
    }

    #[test]
    fn failed_outcome_may_keep_payload() {
        let outcome =
            ToolOutcome::error_with_payload("Search failed", json!({"error": "Search failed", "query": "x"}));
        assert!(!outcome.success);
        assert!(outcome.result.is_some());
        assert_eq!(outcome.error.as_deref(), Some("Search failed"));
    }
}
