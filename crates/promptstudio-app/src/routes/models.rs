use axum::extract::{Path, State};
use axum::response::Json;
use promptstudio_gateway::OpenRouterClient;
use serde_json::{json, Value};

use super::AppError;
use crate::state::AppState;

/// GET /api/models - cached model catalog
pub async fn list_models(State(state): State<AppState>) -> Json<Value> {
    Json(json!({"data": state.catalog.list().await}))
}

/// GET /api/models/*rest - model metadata; the model id itself contains
/// slashes, so the route captures `<model_id>/info`.
pub async fn model_info(
    State(state): State<AppState>,
    Path(rest): Path<String>,
) -> Result<Json<Value>, AppError> {
    let model_id = rest
        .strip_suffix("/info")
        .ok_or_else(|| AppError::NotFound("Not found".to_string()))?;

    state
        .catalog
        .get(model_id)
        .await
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Model not found".to_string()))
}

/// POST /api/models/refresh - pull the catalog from the gateway and upsert
pub async fn refresh_models(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    if !state.settings.has_api_key() {
        return Err(AppError::BadRequest("OPENROUTER_API_KEY not set".to_string()));
    }

    let client = OpenRouterClient::new(&state.settings.gateway_config())?;
    let payload = client.list_models().await?;
    let stats = state.catalog.refresh_from(&payload).await?;

    tracing::info!(inserted = stats.inserted, updated = stats.updated, "model catalog refreshed");
    Ok(Json(json!({
        "ok": true,
        "inserted": stats.inserted,
        "updated": stats.updated,
    })))
}
