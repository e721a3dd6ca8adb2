use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};
use thiserror::Error;

use super::init_data::MAX_AUTH_AGE_SECS;

type HmacSha256 = Hmac<Sha256>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoginWidgetError {
    #[error("login payload lacks `{0}`")]
    MissingField(&'static str),

    #[error("login payload signature does not match")]
    InvalidSignature,

    #[error("login payload auth_date {auth_date} is older than {MAX_AUTH_AGE_SECS}s")]
    StaleAuth { auth_date: i64 },
}

/// Identity confirmed by the Telegram Login Widget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginWidgetUser {
    pub id: i64,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub photo_url: Option<String>,
}

/// Checks a widget callback payload. The signing key is `SHA256(bot_token)`
/// and every field except `hash` takes part in the check string.
pub fn verify_login_widget(
    payload: &Map<String, Value>,
    bot_token: &str,
    now_unix: i64,
) -> Result<LoginWidgetUser, LoginWidgetError> {
    let id = payload
        .get("id")
        .and_then(as_i64)
        .ok_or(LoginWidgetError::MissingField("id"))?;
    let hash = payload
        .get("hash")
        .and_then(Value::as_str)
        .filter(|hash| !hash.is_empty())
        .ok_or(LoginWidgetError::MissingField("hash"))?;
    let auth_date = payload
        .get("auth_date")
        .filter(|value| !value.is_null())
        .ok_or(LoginWidgetError::MissingField("auth_date"))?;
    let auth_date = as_i64(auth_date).unwrap_or(0);

    let supplied = hex::decode(hash).map_err(|_| LoginWidgetError::InvalidSignature)?;

    let mut mac = HmacSha256::new_from_slice(&Sha256::digest(bot_token.as_bytes()))
        .map_err(|_| LoginWidgetError::InvalidSignature)?;
    mac.update(check_string(payload).as_bytes());
    mac.verify_slice(&supplied)
        .map_err(|_| LoginWidgetError::InvalidSignature)?;

    if now_unix.saturating_sub(auth_date) > MAX_AUTH_AGE_SECS {
        return Err(LoginWidgetError::StaleAuth { auth_date });
    }

    Ok(LoginWidgetUser {
        id,
        first_name: text_field(payload, "first_name"),
        last_name: text_field(payload, "last_name"),
        username: text_field(payload, "username"),
        photo_url: text_field(payload, "photo_url"),
    })
}

pub fn check_string(payload: &Map<String, Value>) -> String {
    let mut keys: Vec<&String> = payload.keys().filter(|key| *key != "hash").collect();
    keys.sort();

    keys.iter()
        .map(|key| format!("{key}={}", plain_value(&payload[key.as_str()])))
        .collect::<Vec<_>>()
        .join("\n")
}

// Strings go in unquoted; everything else in its JSON form.
fn plain_value(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

fn as_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(number) => number.as_i64(),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}

fn text_field(payload: &Map<String, Value>, key: &str) -> Option<String> {
    payload
        .get(key)
        .and_then(Value::as_str)
        .map(str::to_string)
}
