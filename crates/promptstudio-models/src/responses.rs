use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::types::ToolCall;

/// Non-streaming chat completions response
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct ChatResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub usage: Option<Usage>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Choice {
    #[serde(default)]
    pub message: ResponseMessage,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub finish_reason: Option<String>,
}

/// Assistant message as returned by the upstream.
///
/// `content` stays a raw value: providers return either a string or a list of
/// content blocks; use `content_to_text` to flatten it.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct ResponseMessage {
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub content: Value,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub tool_calls: Option<Vec<ToolCall>>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub reasoning: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub reasoning_content: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Usage {
    #[serde(default)]
    pub prompt_tokens: u64,
    #[serde(default)]
    pub completion_tokens: u64,
    #[serde(default)]
    pub total_tokens: u64,
}

/// One SSE chunk of a streaming chat completion
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct StreamChunk {
    #[serde(default)]
    pub choices: Vec<StreamChoice>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub usage: Option<Usage>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct StreamChoice {
    #[serde(default)]
    pub delta: Delta,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub finish_reason: Option<String>,
    // Some providers attach reasoning to a final `message` instead of the delta
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub message: Option<ResponseMessage>,
}

/// Incremental delta within a streaming choice.
///
/// Reasoning arrives under different keys (and shapes) per provider, so the
/// reasoning-ish fields are kept as raw values.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Delta {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub reasoning: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub reasoning_content: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub thinking: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub tool_calls: Option<Vec<ToolCallDelta>>,
}

/// Streamed fragment of a tool call, merged by `index`
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct ToolCallDelta {
    #[serde(default)]
    pub index: u32,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub id: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none", default)]
    pub tool_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub function: Option<FunctionDelta>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct FunctionDelta {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub arguments: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stream_chunk_parses_tool_call_delta() {
        let raw = r#"{"choices":[{"delta":{"tool_calls":[{"index":0,"id":"c1","type":"function","function":{"name":"search_web","arguments":"{\"qu"}}]}}]}"#;
        let chunk: StreamChunk = serde_json::from_str(raw).unwrap();
        let delta = &chunk.choices[0].delta;
        let call = &delta.tool_calls.as_ref().unwrap()[0];
        assert_eq!(call.index, 0);
        assert_eq!(call.id.as_deref(), Some("c1"));
        let function = call.function.as_ref().unwrap();
        assert_eq!(function.name.as_deref(), Some("search_web"));
        assert_eq!(function.arguments.as_deref(), Some("{\"qu"));
    }

    #[test]
    fn stream_chunk_tolerates_unknown_fields() {
        let raw = r#"{"id":"gen-1","object":"chat.completion.chunk","choices":[{"delta":{"content":"hi"},"finish_reason":null}]}"#;
        let chunk: StreamChunk = serde_json::from_str(raw).unwrap();
        assert_eq!(chunk.choices[0].delta.content.as_deref(), Some("hi"));
    }

    #[test]
    fn response_message_content_may_be_blocks() {
        let raw = r#"{"choices":[{"message":{"role":"assistant","content":[{"type":"text","text":"done"}]}}]}"#;
        let resp: ChatResponse = serde_json::from_str(raw).unwrap();
        let text = crate::content_to_text(&resp.choices[0].message.content);
        assert_eq!(text, "done");
    }
}
