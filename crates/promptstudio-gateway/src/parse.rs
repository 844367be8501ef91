use promptstudio_models::{StreamChunk, UpstreamEvent};
use serde_json::Value;

/// Incremental buffer over the upstream `text/event-stream` body.
///
/// Frames are separated by a blank line; only `data: ` lines carry payloads.
#[derive(Debug, Default)]
pub struct SseFrameBuffer {
    buffer: String,
}

impl SseFrameBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append raw body bytes and drain every complete `data: ` payload
    pub fn push(&mut self, chunk: &str) -> Vec<String> {
        self.buffer.push_str(chunk);

        let mut payloads = Vec::new();
        while let Some(frame_end) = self.buffer.find("\n\n") {
            let frame = self.buffer[..frame_end].to_string();
            self.buffer.drain(..frame_end + 2);

            for line in frame.lines() {
                if let Some(data) = line.strip_prefix("data: ") {
                    if !data.trim().is_empty() {
                        payloads.push(data.to_string());
                    }
                }
            }
        }
        payloads
    }
}

/// Parse one `data: ` payload into normalized events.
///
/// A payload that fails to parse as a chunk is surfaced verbatim as a content
/// delta so diagnostic information is not lost. The `[DONE]` sentinel is
/// handled by the caller, not here.
pub fn parse_stream_data(data: &str) -> Vec<UpstreamEvent> {
    let chunk: StreamChunk = match serde_json::from_str(data) {
        Ok(chunk) => chunk,
        Err(_) => {
            return vec![UpstreamEvent::ContentDelta {
                text: data.to_string(),
            }]
        }
    };

    let mut events = Vec::new();
    let Some(choice) = chunk.choices.first() else {
        return events;
    };

    let delta = &choice.delta;
    for value in [&delta.reasoning, &delta.reasoning_content, &delta.thinking]
        .into_iter()
        .flatten()
    {
        if let Some(text) = reasoning_text(value) {
            events.push(UpstreamEvent::ReasoningDelta { text });
        }
    }

    // Some providers only attach reasoning to the final chunk's message
    if let Some(message) = &choice.message {
        for text in [&message.reasoning, &message.reasoning_content]
            .into_iter()
            .flatten()
        {
            if !text.trim().is_empty() {
                events.push(UpstreamEvent::ReasoningDelta { text: text.clone() });
            }
        }
    }

    if let Some(content) = &delta.content {
        if !content.is_empty() {
            events.push(UpstreamEvent::ContentDelta {
                text: content.clone(),
            });
        }
    }

    if let Some(tool_calls) = &delta.tool_calls {
        for call in tool_calls {
            events.push(UpstreamEvent::ToolCallDelta {
                index: call.index,
                id: call.id.clone(),
                name: call.function.as_ref().and_then(|f| f.name.clone()),
                arguments: call.function.as_ref().and_then(|f| f.arguments.clone()),
            });
        }
    }

    events
}

/// Reasoning deltas arrive as plain strings or as objects with a
/// `content`/`text` field depending on the provider.
fn reasoning_text(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s.clone(),
        Value::Object(map) => map
            .get("content")
            .or_else(|| map.get("text"))
            .and_then(|v| v.as_str())
            .map(str::to_string)?,
        _ => return None,
    };
    if text.trim().is_empty() {
        None
    } else {
        Some(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_buffer_splits_on_blank_lines() {
        let mut buffer = SseFrameBuffer::new();
        assert!(buffer.push("data: {\"a\":1}").is_empty());
        let payloads = buffer.push("\n\ndata: {\"b\":2}\n\n");
        assert_eq!(payloads, vec!["{\"a\":1}", "{\"b\":2}"]);
    }

    #[test]
    fn frame_buffer_ignores_comments_and_event_lines() {
        let mut buffer = SseFrameBuffer::new();
        let payloads = buffer.push(": keepalive\n\nevent: ping\ndata: {\"c\":3}\n\n");
        assert_eq!(payloads, vec!["{\"c\":3}"]);
    }

    #[test]
    fn content_delta_extracted() {
        let events = parse_stream_data(r#"{"choices":[{"delta":{"content":"Hel"}}]}"#);
        assert_eq!(
            events,
            vec![UpstreamEvent::ContentDelta {
                text: "Hel".to_string()
            }]
        );
    }

    #[test]
    fn reasoning_variants_extracted() {
        let events = parse_stream_data(r#"{"choices":[{"delta":{"reasoning":"think"}}]}"#);
        assert_eq!(
            events,
            vec![UpstreamEvent::ReasoningDelta {
                text: "think".to_string()
            }]
        );

        let events = parse_stream_data(r#"{"choices":[{"delta":{"thinking":{"content":"deep"}}}]}"#);
        assert_eq!(
            events,
            vec![UpstreamEvent::ReasoningDelta {
                text: "deep".to_string()
            }]
        );
    }

    #[test]
    fn final_chunk_message_reasoning_surfaced() {
        let events = parse_stream_data(
            r#"{"choices":[{"delta":{},"message":{"role":"assistant","content":"","reasoning":"post-hoc"},"finish_reason":"stop"}]}"#,
        );
        assert_eq!(
            events,
            vec![UpstreamEvent::ReasoningDelta {
                text: "post-hoc".to_string()
            }]
        );
    }

    #[test]
    fn tool_call_deltas_keep_index_and_fragments() {
        let events = parse_stream_data(
            r#"{"choices":[{"delta":{"tool_calls":[{"index":0,"id":"c1","function":{"name":"search_web","arguments":"{\"qu"}},{"index":1,"function":{"arguments":"ery\""}}]}}]}"#,
        );
        assert_eq!(events.len(), 2);
        assert_eq!(
            events[0],
            UpstreamEvent::ToolCallDelta {
                index: 0,
                id: Some("c1".to_string()),
                name: Some("search_web".to_string()),
                arguments: Some("{\"qu".to_string()),
            }
        );
        assert_eq!(
            events[1],
            UpstreamEvent::ToolCallDelta {
                index: 1,
                id: None,
                name: None,
                arguments: Some("ery\"".to_string()),
            }
        );
    }

    #[test]
    fn malformed_chunk_preserved_as_content() {
        let events = parse_stream_data("OPENROUTER PROCESSING");
        assert_eq!(
            events,
            vec![UpstreamEvent::ContentDelta {
                text: "OPENROUTER PROCESSING".to_string()
            }]
        );
    }
}
