use axum::extract::{Path, Query, State};
use axum::response::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use super::AppError;
use crate::state::AppState;

/// GET /api/providers - supported providers with their model counts
pub async fn list_providers(State(state): State<AppState>) -> Json<Value> {
    let counts = state.catalog.provider_model_counts().await;
    let providers: Vec<Value> = state
        .content
        .provider_ids()
        .iter()
        .map(|id| {
            json!({
                "id": id,
                "name": title_case(id),
                "model_count": counts.get(*id).copied().unwrap_or(0),
            })
        })
        .collect();

    Json(json!({"data": providers}))
}

/// GET /api/providers/:provider_id/guide - optimization guide
pub async fn provider_guide(
    State(state): State<AppState>,
    Path(provider_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    state
        .content
        .optimization_guide(&provider_id)
        .cloned()
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Provider guide not found".to_string()))
}

#[derive(Debug, Deserialize)]
pub struct GuidesQuery {
    pub model_id: Option<String>,
}

/// GET /api/providers/:provider_id/prompting-guides
pub async fn prompting_guides(
    State(state): State<AppState>,
    Path(provider_id): Path<String>,
    Query(query): Query<GuidesQuery>,
) -> Result<Json<Value>, AppError> {
    state
        .content
        .prompting_guides(&provider_id, query.model_id.as_deref())
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Provider prompting guides not found".to_string()))
}

fn title_case(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_case_capitalizes_first_letter() {
        assert_eq!(title_case("openai"), "Openai");
        assert_eq!(title_case(""), "");
    }
}
