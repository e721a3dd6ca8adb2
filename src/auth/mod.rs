pub mod init_data;
pub mod login_widget;
pub mod session;

use std::sync::Arc;

use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, Request},
    http::HeaderMap,
};
use chrono::Utc;
use serde::{Deserialize, de::DeserializeOwned};
use serde_json::Value;
use tracing::{debug, warn};

use crate::{
    config::auth_mode::AuthMode,
    domain::value_objects::telegram_users::TelegramUser,
    infrastructure::axum_http::error_responses::AppError,
};
use init_data::{InitDataError, verify_init_data};

pub const INIT_DATA_HEADER: &str = "x-telegram-init-data";
const INIT_DATA_FIELD: &str = "initData";

/// Decides who is calling. Shared by every handler through an `Extension`.
#[derive(Debug, Clone)]
pub struct AuthGate {
    bot_token: String,
    mode: AuthMode,
}

impl AuthGate {
    pub fn new(bot_token: impl Into<String>, mode: AuthMode) -> Self {
        Self {
            bot_token: bot_token.into(),
            mode,
        }
    }

    pub fn mode(&self) -> AuthMode {
        self.mode
    }

    pub fn authenticate(
        &self,
        raw_init_data: Option<&str>,
        now_unix: i64,
    ) -> Result<TelegramUser, InitDataError> {
        if self.mode.is_bypass() {
            warn!(
                auth_mode = %self.mode,
                "auth: initData verification skipped, injecting test identity"
            );
            return Ok(TelegramUser::dev_bypass_identity());
        }

        let raw = raw_init_data.ok_or(InitDataError::Missing)?;
        let user = verify_init_data(raw, &self.bot_token, now_unix)?;

        debug!(telegram_id = user.id, "auth: initData verified");

        Ok(user)
    }
}

/// Empty request payload for endpoints that only need the caller identity.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NoPayload {}

/// Verified caller plus the rest of the JSON body.
///
/// `initData` is taken from the body first and from the
/// `X-Telegram-Init-Data` header otherwise. An empty body reads as `{}`.
#[derive(Debug, Clone)]
pub struct TelegramAuth<T>(pub TelegramUser, pub T);

#[async_trait]
impl<S, T> FromRequest<S> for TelegramAuth<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let gate = req
            .extensions()
            .get::<Arc<AuthGate>>()
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("AuthGate extension is not installed"))?;
        let header_init_data = init_data_from_headers(req.headers());

        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
        let body = parse_body(&bytes)?;

        let raw_init_data = body
            .get(INIT_DATA_FIELD)
            .and_then(Value::as_str)
            .filter(|raw| !raw.is_empty())
            .map(str::to_string)
            .or(header_init_data);

        let user = gate.authenticate(raw_init_data.as_deref(), Utc::now().timestamp())?;

        let payload = serde_json::from_value(body)
            .map_err(|err| AppError::BadRequest(format!("invalid request body: {err}")))?;

        Ok(TelegramAuth(user, payload))
    }
}

fn init_data_from_headers(headers: &HeaderMap) -> Option<String> {
    headers
        .get(INIT_DATA_HEADER)
        .and_then(|value| value.to_str().ok())
        .filter(|raw| !raw.is_empty())
        .map(str::to_string)
}

fn parse_body(bytes: &[u8]) -> Result<Value, AppError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Object(Default::default()));
    }

    serde_json::from_slice(bytes)
        .map_err(|err| AppError::BadRequest(format!("malformed JSON body: {err}")))
}

#[cfg(test)]
mod tests;
