use axum::extract::{Path, State};
use axum::response::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use super::AppError;
use crate::state::AppState;
use crate::store::SnapshotMeta;

#[derive(Debug, Deserialize)]
pub struct SaveRequest {
    pub title: Option<String>,
    /// 'system' | 'user' | 'prompt' | 'state'
    pub kind: Option<String>,
    pub provider: Option<String>,
    pub model: Option<String>,
    /// Arbitrary payload: prompts, response, parameters, notes
    pub data: Option<Value>,
}

/// POST /api/saves - store a snapshot
pub async fn create_save(
    State(state): State<AppState>,
    Json(payload): Json<SaveRequest>,
) -> Result<Json<SnapshotMeta>, AppError> {
    let snapshot = state.snapshots.create(
        payload.title,
        payload.kind,
        payload.provider,
        payload.model,
        payload.data.unwrap_or_else(|| json!({})),
    )?;
    Ok(Json(SnapshotMeta::from(&snapshot)))
}

/// GET /api/saves - list snapshots, newest first
pub async fn list_saves(State(state): State<AppState>) -> Result<Json<Vec<SnapshotMeta>>, AppError> {
    Ok(Json(state.snapshots.list()?))
}

/// GET /api/saves/:id - full snapshot payload
pub async fn get_save(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let snapshot = state
        .snapshots
        .get(&id)?
        .ok_or_else(|| AppError::NotFound("Not found".to_string()))?;

    Ok(Json(json!({
        "id": snapshot.id,
        "title": snapshot.title,
        "kind": snapshot.kind,
        "provider": snapshot.provider,
        "model": snapshot.model,
        "created_at": snapshot.created_at.to_rfc3339(),
        "data": snapshot.data,
    })))
}
