pub mod chat;
pub mod models;
pub mod optimize;
pub mod providers;
pub mod saves;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{get, post};
use axum::Router;
use promptstudio_gateway::GatewayError;
use serde_json::json;

use crate::state::AppState;

/// Create router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/chat/stream", get(chat::stream_chat))
        .route("/api/models", get(models::list_models))
        .route("/api/models/refresh", post(models::refresh_models))
        .route("/api/models/*rest", get(models::model_info))
        .route("/api/providers", get(providers::list_providers))
        .route(
            "/api/providers/:provider_id/guide",
            get(providers::provider_guide),
        )
        .route(
            "/api/providers/:provider_id/prompting-guides",
            get(providers::prompting_guides),
        )
        .route("/api/optimize", post(optimize::optimize_prompt))
        .route("/api/saves", post(saves::create_save).get(saves::list_saves))
        .route("/api/saves/:id", get(saves::get_save))
        .layer(axum::middleware::from_fn(crate::middleware::request_id))
        .with_state(state)
}

/// GET /health
async fn health(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(json!({
        "status": "healthy",
        "store": state.settings.data_dir.exists(),
    }))
}

/// Error handling
#[derive(Debug)]
pub enum AppError {
    Anyhow(anyhow::Error),
    NotFound(String),
    BadRequest(String),
    Upstream(GatewayError),
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Anyhow(err)
    }
}

impl From<GatewayError> for AppError {
    fn from(err: GatewayError) -> Self {
        AppError::Upstream(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::Anyhow(err) => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Upstream(err) => (StatusCode::BAD_GATEWAY, err.to_string()),
        };

        let body = Json(json!({
            "error": message,
            "status": status.as_u16(),
        }));

        (status, body).into_response()
    }
}
