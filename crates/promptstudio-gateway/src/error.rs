use serde_json::Value;

/// Errors surfaced by the gateway client
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("upstream returned {status}: {detail}")]
    Upstream { status: u16, detail: String },

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("invalid upstream response: {0}")]
    InvalidResponse(String),
}

impl GatewayError {
    /// Build an upstream error from a non-2xx response body, preferring the
    /// JSON `error` field over raw body text.
    pub fn from_error_body(status: u16, body: &str) -> Self {
        let detail = serde_json::from_str::<Value>(body)
            .ok()
            .and_then(|value| value.get("error").cloned())
            .map(|error| match error {
                Value::String(s) => s,
                other => other
                    .get("message")
                    .and_then(|m| m.as_str())
                    .map(str::to_string)
                    .unwrap_or_else(|| other.to_string()),
            })
            .unwrap_or_else(|| body.to_string());
        GatewayError::Upstream { status, detail }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefers_upstream_error_field() {
        let err = GatewayError::from_error_body(402, r#"{"error":{"message":"Insufficient credits","code":402}}"#);
        assert!(err.to_string().contains("Insufficient credits"));

        let err = GatewayError::from_error_body(400, r#"{"error":"bad model"}"#);
        assert!(err.to_string().contains("bad model"));
    }

    #[test]
    fn falls_back_to_body_text() {
        let err = GatewayError::from_error_body(502, "Bad Gateway");
        assert!(err.to_string().contains("Bad Gateway"));
        assert!(err.to_string().contains("502"));
    }
}
