use std::sync::Arc;

use axum::body::Body;
use axum::extract::{Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Extension;
use futures_util::StreamExt;
use promptstudio_chat::{
    encode_sse, ChatOrchestrator, ChatTurn, DownstreamStream, DEFAULT_MAX_TOOL_CALLS,
    MAX_TOOL_CALL_CEILING,
};
use promptstudio_gateway::OpenRouterClient;
use promptstudio_models::{DownstreamEvent, Tool};
use promptstudio_policy::{ProviderPolicy, RawParams};
use promptstudio_tools::{builtin_tool_schemas, ToolExecutor};
use serde::Deserialize;

use crate::middleware::RequestId;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct StreamChatQuery {
    pub model: String,
    #[serde(default)]
    pub prompt: String,
    pub system: Option<String>,
    pub temperature: Option<f64>,
    pub top_p: Option<f64>,
    pub max_tokens: Option<u32>,
    pub top_k: Option<u32>,
    pub frequency_penalty: Option<f64>,
    pub presence_penalty: Option<f64>,
    pub repetition_penalty: Option<f64>,
    pub min_p: Option<f64>,
    pub top_a: Option<f64>,
    pub seed: Option<i64>,
    pub reasoning_effort: Option<String>,
    pub response_format: Option<String>,
    pub stop: Option<String>,
    pub logprobs: Option<bool>,
    pub top_logprobs: Option<i64>,
    pub logit_bias: Option<String>,
    /// JSON-encoded array of tool schemas (OpenAI format); the built-in
    /// registry is used when absent
    pub tools: Option<String>,
    pub tool_choice: Option<String>,
    pub max_tool_calls: Option<u32>,
}

/// GET /api/chat/stream - stream a chat completion with tool calling
pub async fn stream_chat(
    State(state): State<AppState>,
    Extension(RequestId(request_id)): Extension<RequestId>,
    Query(query): Query<StreamChatQuery>,
) -> Response {
    // Config errors never contact the upstream
    if !state.settings.has_api_key() {
        return sse_response(canned(vec![
            DownstreamEvent::warning("Set OPENROUTER_API_KEY to enable streaming.", None),
            DownstreamEvent::done(),
        ]));
    }

    let tools = match query.tools.as_deref() {
        None => builtin_tool_schemas(),
        Some(raw) => match serde_json::from_str::<Vec<Tool>>(raw) {
            Ok(tools) => tools,
            Err(e) => {
                return sse_response(canned(vec![
                    DownstreamEvent::error(format!("Invalid tools JSON: {e}")),
                    DownstreamEvent::done(),
                ]))
            }
        },
    };

    let policy = ProviderPolicy::for_model(&query.model);
    let fallback_max_tokens = state.catalog.max_completion_tokens(&query.model).await;
    let raw = RawParams {
        temperature: query.temperature.or(Some(0.7)),
        top_p: query.top_p.or(Some(1.0)),
        max_tokens: query.max_tokens,
        top_k: query.top_k,
        frequency_penalty: query.frequency_penalty,
        presence_penalty: query.presence_penalty,
        repetition_penalty: query.repetition_penalty,
        min_p: query.min_p,
        top_a: query.top_a,
        seed: query.seed,
        reasoning_effort: query.reasoning_effort.clone(),
        response_format: query.response_format.clone(),
        stop: query.stop.clone(),
        logprobs: query.logprobs,
        top_logprobs: query.top_logprobs,
        logit_bias: query.logit_bias.clone(),
    };
    let params = raw.normalize(&policy, fallback_max_tokens);

    let turn = ChatTurn {
        model: query.model,
        prompt: query.prompt,
        system: query.system,
        params,
        tool_choice: query.tool_choice,
        max_tool_calls: query
            .max_tool_calls
            .unwrap_or(DEFAULT_MAX_TOOL_CALLS)
            .clamp(1, MAX_TOOL_CALL_CEILING),
        tools,
    };

    // Request-scoped clients; the request id correlates gateway calls
    let gateway_config = state.settings.gateway_config().with_request_id(request_id);
    let gateway = match OpenRouterClient::new(&gateway_config) {
        Ok(client) => client,
        Err(e) => {
            return sse_response(canned(vec![
                DownstreamEvent::error(e.to_string()),
                DownstreamEvent::done(),
            ]))
        }
    };
    let runner = ToolExecutor::new(state.settings.tools_config());

    let orchestrator = ChatOrchestrator::new(Arc::new(gateway), Arc::new(runner));
    sse_response(orchestrator.run(turn))
}

fn canned(events: Vec<DownstreamEvent>) -> DownstreamStream {
    Box::pin(futures_util::stream::iter(events))
}

fn sse_response(events: DownstreamStream) -> Response {
    let frames = events.map(|event| Ok::<String, std::convert::Infallible>(encode_sse(&event)));
    let response = Response::builder()
        .header(header::CONTENT_TYPE, "text/event-stream")
        .header(header::CACHE_CONTROL, "no-cache")
        .body(Body::from_stream(frames));
    match response {
        Ok(response) => response,
        Err(_) => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
    }
}
