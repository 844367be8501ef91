use axum::extract::State;
use axum::response::Json;
use promptstudio_gateway::{Gateway, OpenRouterClient};
use promptstudio_models::{content_to_text, ChatRequest, Message};
use serde::{Deserialize, Serialize};

use super::AppError;
use crate::optimize_prompts::{provider_hint, META_PROMPT};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct OptimizeRequest {
    pub model: String,
    pub provider: Option<String>,
    /// 'system' | 'user'
    pub kind: String,
    pub prompt: String,
    pub system: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct OptimizeResponse {
    pub optimized: String,
    pub changes: Vec<String>,
    pub notes: Vec<String>,
}

/// POST /api/optimize - one upstream call with the meta-prompt
pub async fn optimize_prompt(
    State(state): State<AppState>,
    Json(req): Json<OptimizeRequest>,
) -> Result<Json<OptimizeResponse>, AppError> {
    if !state.settings.has_api_key() {
        return Err(AppError::BadRequest("OPENROUTER_API_KEY not set".to_string()));
    }

    let provider_id = req.provider.clone().unwrap_or_default().to_lowercase();

    let mut user_parts: Vec<String> = Vec::new();
    if let Some(hint) = provider_hint(&provider_id) {
        user_parts.push(format!(
            "Provider context: This prompt will be used with {} ({provider_id}). {hint}",
            req.model
        ));
        user_parts.push(String::new());
    }
    if let (Some(system), "user") = (&req.system, req.kind.as_str()) {
        user_parts.push("System prompt context (for reference only, do not optimize this):".to_string());
        user_parts.push(system.clone());
        user_parts.push(String::new());
    }
    user_parts.push(req.prompt.clone());
    let user_msg = user_parts.join("\n");

    // The target model optimizes for itself
    let client = OpenRouterClient::new(&state.settings.gateway_config())?;
    let request = ChatRequest {
        model: req.model.clone(),
        messages: vec![Message::system(META_PROMPT), Message::user(user_msg)],
        temperature: Some(0.5),
        ..Default::default()
    };
    let response = client.completion(request).await?;

    let optimized = response
        .choices
        .first()
        .map(|c| content_to_text(&c.message.content))
        .unwrap_or_default()
        .trim()
        .to_string();

    if optimized.is_empty() {
        return Ok(Json(OptimizeResponse {
            optimized: req.prompt,
            changes: vec![],
            notes: vec!["Optimization failed: empty response from model".to_string()],
        }));
    }

    Ok(Json(describe_optimization(&req.prompt, optimized, &provider_id)))
}

/// Heuristic change/note extraction from the before/after pair
fn describe_optimization(original: &str, optimized: String, provider_id: &str) -> OptimizeResponse {
    let mut changes = Vec::new();
    let mut notes = Vec::new();

    if optimized.len() as f64 > original.len() as f64 * 1.2 {
        changes.push("Expanded prompt with additional structure and clarity".to_string());
    } else if (optimized.len() as f64) < original.len() as f64 * 0.8 {
        changes.push("Condensed prompt for clarity".to_string());
    } else {
        changes.push("Refined prompt structure and wording".to_string());
    }

    match provider_id {
        "anthropic" if optimized.contains('<') && optimized.contains('>') => {
            notes.push("Added XML-style tags for better structure".to_string());
        }
        "openai" if optimized.contains("```") || optimized.contains("<<<") => {
            notes.push("Added delimiters for clear input/output separation".to_string());
        }
        "deepseek" if optimized.to_lowercase().contains("<think>") => {
            notes.push("Added thinking blocks for reasoning tasks".to_string());
        }
        _ => {}
    }

    if optimized.contains("# ") || optimized.contains("## ") {
        notes.push("Added section headers for organization".to_string());
    }

    OptimizeResponse {
        optimized,
        changes,
        notes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expansion_is_detected() {
        let response = describe_optimization("short", "a much longer optimized prompt".to_string(), "");
        assert_eq!(
            response.changes,
            vec!["Expanded prompt with additional structure and clarity"]
        );
    }

    #[test]
    fn provider_patterns_produce_notes() {
        let response = describe_optimization(
            "prompt",
            "<instructions>do it</instructions>".to_string(),
            "anthropic",
        );
        assert!(response
            .notes
            .contains(&"Added XML-style tags for better structure".to_string()));

        let response =
            describe_optimization("prompt", "# Task\nuse <think> blocks".to_string(), "deepseek");
        assert!(response
            .notes
            .contains(&"Added thinking blocks for reasoning tasks".to_string()));
        assert!(response
            .notes
            .contains(&"Added section headers for organization".to_string()));
    }
}
