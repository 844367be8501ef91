//! OpenRouter gateway client.
//!
//! Speaks the OpenAI-compatible chat completions API, both non-streaming and
//! streaming, and exposes the streaming side as a normalized
//! [`UpstreamEvent`](promptstudio_models::UpstreamEvent) stream.

pub mod client;
pub mod error;
mod parse;

pub use client::{
    EventStream, Gateway, GatewayConfig, OpenRouterClient, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS,
};
pub use error::GatewayError;
pub use parse::{parse_stream_data, SseFrameBuffer};
