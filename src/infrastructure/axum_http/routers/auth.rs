use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::{HeaderMap, header::AUTHORIZATION},
    routing::post,
};
use chrono::Utc;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{info, warn};

use crate::{
    auth::{
        login_widget::{LoginWidgetUser, verify_login_widget},
        session::{bearer_token, issue_session_token, validate_session_token},
    },
    config::config_model::Telegram,
    infrastructure::axum_http::error_responses::AppError,
};

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub success: bool,
    pub token: String,
    pub user: LoginWidgetUser,
}

#[derive(Debug, Serialize)]
pub struct VerifyResponse {
    pub success: bool,
    pub user: LoginWidgetUser,
}

pub fn routes(telegram: Arc<Telegram>) -> Router {
    Router::new()
        .route("/telegram-login", post(telegram_login))
        .route("/verify", post(verify))
        .with_state(telegram)
}

pub async fn telegram_login(
    State(telegram): State<Arc<Telegram>>,
    payload: Result<Json<Map<String, Value>>, JsonRejection>,
) -> Result<Json<LoginResponse>, AppError> {
    let Json(payload) = payload.map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
    let now = Utc::now().timestamp();

    let user = verify_login_widget(&payload, &telegram.bot_token, now)?;
    let token = issue_session_token(&user, &telegram.jwt_secret, now)?;

    info!(telegram_id = user.id, "auth: login widget session issued");

    Ok(Json(LoginResponse {
        success: true,
        token,
        user,
    }))
}

pub async fn verify(
    State(telegram): State<Arc<Telegram>>,
    headers: HeaderMap,
) -> Result<Json<VerifyResponse>, AppError> {
    let token = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(bearer_token)
        .ok_or(AppError::MissingToken)?;

    let claims = validate_session_token(token, &telegram.jwt_secret).map_err(|err| {
        warn!(error = %err, "auth: session token rejected");
        AppError::InvalidToken
    })?;

    Ok(Json(VerifyResponse {
        success: true,
        user: claims.user(),
    }))
}
