use promptstudio_models::{ChatRequest, Reasoning};
use serde_json::Value;

use crate::provider::ProviderPolicy;

/// Raw sampling/format parameters as received from the client
#[derive(Debug, Clone, Default)]
pub struct RawParams {
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
}

/// Parameters after one-shot validation and shaping
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedParams {
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
    pub reasoning: Option<Reasoning>,
    pub response_format: Option<Value>,
    pub stop: Option<Vec<String>>,
    pub logprobs: Option<bool>,
    pub top_logprobs: Option<u8>,
    pub logit_bias: Option<Value>,
}

impl RawParams {
    /// Validate and shape the parameters for the given provider.
    ///
    /// `fallback_max_tokens` is the catalog's per-model completion limit,
    /// used only when the client did not set `max_tokens`.
    pub fn normalize(
        &self,
        policy: &ProviderPolicy,
        fallback_max_tokens: Option<u32>,
    ) -> NormalizedParams {
        let mut params = NormalizedParams {
            temperature: self.temperature.map(|t| t.clamp(0.0, 2.0)),
            top_p: self.top_p.map(|p| p.clamp(0.0, 1.0)),
            max_tokens: self.max_tokens.map(|m| m.max(1)).or(fallback_max_tokens),
            top_k: self.top_k,
            frequency_penalty: self.frequency_penalty,
            presence_penalty: self.presence_penalty,
            repetition_penalty: self.repetition_penalty,
            min_p: self.min_p,
            top_a: self.top_a,
            seed: self.seed,
            reasoning: parse_reasoning_effort(self.reasoning_effort.as_deref()),
            response_format: parse_response_format(self.response_format.as_deref(), policy),
            stop: parse_stop_sequences(self.stop.as_deref()),
            logprobs: self.logprobs,
            top_logprobs: None,
            logit_bias: parse_logit_bias(self.logit_bias.as_deref()),
        };

        if let Some(top) = self.top_logprobs {
            params.top_logprobs = Some(top.clamp(1, 5) as u8);
            params.logprobs = Some(true);
        }

        params
    }
}

impl NormalizedParams {
    /// Copy the shaped parameters onto an outgoing request
    pub fn apply_to(&self, request: &mut ChatRequest) {
        request.temperature = self.temperature;
        request.top_p = self.top_p;
        request.max_tokens = self.max_tokens;
        request.top_k = self.top_k;
        request.frequency_penalty = self.frequency_penalty;
        request.presence_penalty = self.presence_penalty;
        request.repetition_penalty = self.repetition_penalty;
        request.min_p = self.min_p;
        request.top_a = self.top_a;
        request.seed = self.seed;
        request.reasoning = self.reasoning.clone();
        request.response_format = self.response_format.clone();
        request.stop = self.stop.clone();
        request.logprobs = self.logprobs;
        request.top_logprobs = self.top_logprobs;
        request.logit_bias = self.logit_bias.clone();
    }
}

/// `low|medium|high` map to a reasoning config; the literal `auto` is dropped
fn parse_reasoning_effort(effort: Option<&str>) -> Option<Reasoning> {
    let effort = effort?.trim().to_lowercase();
    match effort.as_str() {
        "low" | "medium" | "high" => Some(Reasoning { effort }),
        _ => None,
    }
}

/// Parse the response-format input: a JSON object passes through, the
/// shorthands `json`/`json_object` become `{"type":"json_object"}`, and
/// providers that reject the field get nothing.
fn parse_response_format(input: Option<&str>, policy: &ProviderPolicy) -> Option<Value> {
    let text = input?.trim();
    if text.is_empty() || policy.strip_response_format {
        return None;
    }

    if let Ok(value) = serde_json::from_str::<Value>(text) {
        if value.is_object() {
            return Some(value);
        }
    }

    match text.to_lowercase().as_str() {
        "json" | "json_object" | "jsonobject" => Some(serde_json::json!({"type": "json_object"})),
        _ => None,
    }
}

/// Split stop sequences on commas and newlines, trimming and dropping empties
fn parse_stop_sequences(stop: Option<&str>) -> Option<Vec<String>> {
    let stop = stop?;
    let list: Vec<String> = stop
        .split([',', '\n'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();
    if list.is_empty() {
        None
    } else {
        Some(list)
    }
}

/// Logit bias must parse as a JSON object; anything else is ignored
fn parse_logit_bias(input: Option<&str>) -> Option<Value> {
    let value = serde_json::from_str::<Value>(input?).ok()?;
    value.is_object().then_some(value)
}
