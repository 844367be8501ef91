use std::pin::Pin;
use std::time::Duration;

use async_trait::async_trait;
use futures_util::{Stream, StreamExt};
use promptstudio_models::{ChatRequest, ChatResponse, UpstreamEvent};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde_json::Value;

use crate::error::GatewayError;
use crate::parse::{parse_stream_data, SseFrameBuffer};

pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

pub type EventStream = Pin<Box<dyn Stream<Item = Result<UpstreamEvent, GatewayError>> + Send>>;

/// Seam between the chat loop and the upstream service; scripted in tests
#[async_trait]
pub trait Gateway: Send + Sync {
    async fn completion(&self, request: ChatRequest) -> Result<ChatResponse, GatewayError>;

    async fn stream_events(&self, request: ChatRequest) -> Result<EventStream, GatewayError>;
}

/// Gateway connection settings, read once at startup
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub base_url: String,
    pub api_key: String,
    pub timeout: Duration,
    /// Optional attribution headers forwarded to OpenRouter
    pub http_referer: Option<String>,
    pub x_title: Option<String>,
    /// Correlation id echoed to the upstream as `X-Request-Id`
    pub request_id: Option<String>,
}

impl GatewayConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.into(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            http_referer: None,
            x_title: None,
            request_id: None,
        }
    }

    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }
}

/// OpenRouter client over one configured `reqwest::Client`
pub struct OpenRouterClient {
    base_url: String,
    client: reqwest::Client,
}

impl OpenRouterClient {
    pub fn new(config: &GatewayConfig) -> Result<Self, GatewayError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Ok(value) = HeaderValue::from_str(&format!("Bearer {}", config.api_key)) {
            headers.insert(AUTHORIZATION, value);
        }
        if let Some(referer) = &config.http_referer {
            if let Ok(value) = HeaderValue::from_str(referer) {
                headers.insert("HTTP-Referer", value);
            }
        }
        if let Some(title) = &config.x_title {
            if let Ok(value) = HeaderValue::from_str(title) {
                headers.insert("X-Title", value);
            }
        }
        if let Some(request_id) = &config.request_id {
            if let Ok(value) = HeaderValue::from_str(request_id) {
                headers.insert("X-Request-Id", value);
            }
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// GET /models, raw payload
    pub async fn list_models(&self) -> Result<Value, GatewayError> {
        let response = self.client.get(self.url("/models")).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GatewayError::from_error_body(status.as_u16(), &body));
        }
        Ok(response.json().await?)
    }
}

#[async_trait]
impl Gateway for OpenRouterClient {
    async fn completion(&self, mut request: ChatRequest) -> Result<ChatResponse, GatewayError> {
        request.stream = None;
        tracing::debug!(model = %request.model, messages = request.messages.len(), "completion request");

        let response = self
            .client
            .post(self.url("/chat/completions"))
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GatewayError::from_error_body(status.as_u16(), &body));
        }

        let body = response.text().await?;
        serde_json::from_str(&body)
            .map_err(|e| GatewayError::InvalidResponse(format!("{e}: {body}")))
    }

    async fn stream_events(&self, mut request: ChatRequest) -> Result<EventStream, GatewayError> {
        request.stream = Some(true);
        tracing::debug!(model = %request.model, messages = request.messages.len(), "streaming request");

        let response = self
            .client
            .post(self.url("/chat/completions"))
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GatewayError::from_error_body(status.as_u16(), &body));
        }

        let mut body = response.bytes_stream();
        let stream = async_stream::try_stream! {
            let mut buffer = SseFrameBuffer::new();
            'outer: while let Some(chunk) = body.next().await {
                let bytes = chunk?;
                for data in buffer.push(&String::from_utf8_lossy(&bytes)) {
                    if data.trim() == "[DONE]" {
                        yield UpstreamEvent::Done;
                        break 'outer;
                    }
                    for event in parse_stream_data(&data) {
                        yield event;
                    }
                }
            }
        };

        Ok(Box::pin(stream))
    }
}
