use axum::{Json, response::IntoResponse};
use chrono::Utc;
use serde_json::json;
use tracing::info;

use super::error_responses::AppError;

pub const SERVICE_NAME: &str = "miniapp-backend";

pub async fn not_found() -> impl IntoResponse {
    info!("router: not_found handler invoked");
    AppError::RouteNotFound
}

pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "timestamp": Utc::now().to_rfc3339(),
        "service": SERVICE_NAME,
    }))
}
