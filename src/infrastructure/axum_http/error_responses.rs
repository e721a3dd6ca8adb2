use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;
use tracing::{error, warn};

use crate::{
    application::errors::MiniAppError,
    auth::{init_data::InitDataError, login_widget::LoginWidgetError},
};

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub code: u16,
    pub error: String,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("authorization data is missing")]
    MissingAuth,

    #[error("authorization data is invalid: {0}")]
    InvalidAuth(String),

    #[error("session token is missing")]
    MissingToken,

    #[error("session token is invalid")]
    InvalidToken,

    #[error("user not found")]
    UserNotFound,

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("route not found")]
    RouteNotFound,

    #[error("internal server error")]
    Internal(#[from] anyhow::Error),
}

impl From<InitDataError> for AppError {
    fn from(err: InitDataError) -> Self {
        match err {
            InitDataError::Missing => AppError::MissingAuth,
            other => AppError::InvalidAuth(other.to_string()),
        }
    }
}

impl From<LoginWidgetError> for AppError {
    fn from(err: LoginWidgetError) -> Self {
        match err {
            LoginWidgetError::MissingField(field) => {
                AppError::BadRequest(format!("login payload lacks `{field}`"))
            }
            other => AppError::InvalidAuth(other.to_string()),
        }
    }
}

impl From<MiniAppError> for AppError {
    fn from(err: MiniAppError) -> Self {
        match err {
            MiniAppError::UserNotFound { .. } => AppError::UserNotFound,
            MiniAppError::Schema(err) => AppError::Internal(err.into()),
            MiniAppError::Database(err) => AppError::Internal(err),
        }
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::MissingAuth
            | AppError::InvalidAuth(_)
            | AppError::MissingToken
            | AppError::InvalidToken => StatusCode::UNAUTHORIZED,
            AppError::UserNotFound | AppError::RouteNotFound => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message shown to the Mini App; the reason behind an auth or server
    /// failure only goes to the log.
    pub fn public_message(&self) -> &'static str {
        match self {
            AppError::MissingAuth => "Отсутствуют данные авторизации",
            AppError::InvalidAuth(_) => "Неверные данные авторизации",
            AppError::MissingToken => "Отсутствует токен авторизации",
            AppError::InvalidToken => "Невалидный токен",
            AppError::UserNotFound => "Пользователь не найден",
            AppError::BadRequest(_) => "Некорректный запрос",
            AppError::RouteNotFound => "Маршрут не найден",
            AppError::Internal(_) => "Внутренняя ошибка сервера",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        match &self {
            AppError::Internal(err) => error!(error = ?err, "http: request failed"),
            AppError::MissingAuth
            | AppError::InvalidAuth(_)
            | AppError::MissingToken
            | AppError::InvalidToken => warn!(reason = %self, "http: request rejected"),
            AppError::BadRequest(reason) => warn!(reason = %reason, "http: bad request"),
            AppError::UserNotFound | AppError::RouteNotFound => {}
        }

        let body = Json(ErrorResponse {
            success: false,
            code: status.as_u16(),
            error: self.public_message().to_string(),
        });

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::column_mapping::SchemaError;

    #[test]
    fn auth_failures_share_a_generic_message() {
        for err in [
            InitDataError::MissingHash,
            InitDataError::InvalidSignature,
            InitDataError::StaleAuth { auth_date: 0 },
            InitDataError::MissingUser,
        ] {
            let app_error = AppError::from(err);
            assert_eq!(app_error.status(), StatusCode::UNAUTHORIZED);
            assert_eq!(app_error.public_message(), "Неверные данные авторизации");
        }

        let missing = AppError::from(InitDataError::Missing);
        assert_eq!(missing.public_message(), "Отсутствуют данные авторизации");
    }

    #[test]
    fn use_case_errors_map_to_status_codes() {
        let not_found = AppError::from(MiniAppError::UserNotFound { telegram_id: 1 });
        assert_eq!(not_found.status(), StatusCode::NOT_FOUND);
        assert_eq!(not_found.public_message(), "Пользователь не найден");

        let schema = AppError::from(MiniAppError::Schema(SchemaError::TableNotFound {
            table: "users".to_string(),
        }));
        assert_eq!(schema.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(schema.public_message(), "Внутренняя ошибка сервера");
    }

    #[test]
    fn missing_login_fields_are_bad_requests() {
        let err = AppError::from(LoginWidgetError::MissingField("hash"));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);

        let err = AppError::from(LoginWidgetError::InvalidSignature);
        assert_eq!(err.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn body_carries_success_flag_and_code() {
        let response = AppError::InvalidToken.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(body["success"], false);
        assert_eq!(body["code"], 401);
        assert_eq!(body["error"], "Невалидный токен");
    }
}
