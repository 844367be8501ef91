use promptstudio_models::DownstreamEvent;

/// Frame a downstream event for the SSE channel: `data: <JSON>\n\n`
pub fn encode_sse(event: &DownstreamEvent) -> String {
    match serde_json::to_string(event) {
        Ok(json) => format!("data: {json}\n\n"),
        Err(_) => "data: {\"type\":\"error\",\"error\":\"event serialization failed\"}\n\n".to_string(),
    }
}
