use hmac::{Hmac, Mac};
use sha2::Sha256;
use thiserror::Error;
use url::form_urlencoded;

use crate::domain::value_objects::telegram_users::TelegramUser;

type HmacSha256 = Hmac<Sha256>;

const WEB_APP_DATA_KEY: &[u8] = b"WebAppData";
pub const MAX_AUTH_AGE_SECS: i64 = 24 * 60 * 60;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InitDataError {
    #[error("initData is missing")]
    Missing,

    #[error("initData carries no hash")]
    MissingHash,

    #[error("initData signature does not match")]
    InvalidSignature,

    #[error("initData auth_date {auth_date} is older than {MAX_AUTH_AGE_SECS}s")]
    StaleAuth { auth_date: i64 },

    #[error("initData carries no valid user")]
    MissingUser,
}

/// Decoded `initData` pairs in wire order. Every `hash` pair is left out of
/// the signed data; the first one is the supplied signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitDataPayload {
    pairs: Vec<(String, String)>,
    hash: Option<String>,
}

impl InitDataPayload {
    pub fn parse(raw: &str) -> Self {
        let mut hash = None;
        let mut pairs = Vec::new();

        for (key, value) in form_urlencoded::parse(raw.as_bytes()) {
            if key == "hash" {
                hash.get_or_insert_with(|| value.into_owned());
            } else {
                pairs.push((key.into_owned(), value.into_owned()));
            }
        }

        Self { pairs, hash }
    }

    pub fn hash(&self) -> Option<&str> {
        self.hash.as_deref()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// `key=value` lines sorted by key, joined with `\n`.
    pub fn data_check_string(&self) -> String {
        let mut sorted: Vec<&(String, String)> = self.pairs.iter().collect();
        sorted.sort_by(|a, b| a.0.as_bytes().cmp(b.0.as_bytes()));

        sorted
            .iter()
            .map(|(key, value)| format!("{key}={value}"))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Unparsable or absent values count as the epoch.
    pub fn auth_date(&self) -> i64 {
        self.get("auth_date")
            .and_then(|raw| raw.trim().parse().ok())
            .unwrap_or(0)
    }
}

fn web_app_secret(bot_token: &str) -> Result<HmacSha256, InitDataError> {
    let mut secret = HmacSha256::new_from_slice(WEB_APP_DATA_KEY)
        .map_err(|_| InitDataError::InvalidSignature)?;
    secret.update(bot_token.as_bytes());
    let key = secret.finalize().into_bytes();

    HmacSha256::new_from_slice(&key).map_err(|_| InitDataError::InvalidSignature)
}

pub fn verify_init_data(
    raw: &str,
    bot_token: &str,
    now_unix: i64,
) -> Result<TelegramUser, InitDataError> {
    if raw.trim().is_empty() {
        return Err(InitDataError::Missing);
    }

    let payload = InitDataPayload::parse(raw);
    let supplied = payload.hash().ok_or(InitDataError::MissingHash)?;
    let supplied = hex::decode(supplied).map_err(|_| InitDataError::InvalidSignature)?;

    let mut mac = web_app_secret(bot_token)?;
    mac.update(payload.data_check_string().as_bytes());
    mac.verify_slice(&supplied)
        .map_err(|_| InitDataError::InvalidSignature)?;

    let auth_date = payload.auth_date();
    if now_unix.saturating_sub(auth_date) > MAX_AUTH_AGE_SECS {
        return Err(InitDataError::StaleAuth { auth_date });
    }

    payload
        .get("user")
        .and_then(|user| serde_json::from_str::<TelegramUser>(user).ok())
        .ok_or(InitDataError::MissingUser)
}

/// Hex signature a Telegram client would attach to `pairs`.
pub fn sign_init_data(pairs: &[(&str, &str)], bot_token: &str) -> Result<String, InitDataError> {
    let payload = InitDataPayload {
        pairs: pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
        hash: None,
    };

    let mut mac = web_app_secret(bot_token)?;
    mac.update(payload.data_check_string().as_bytes());

    Ok(hex::encode(mac.finalize().into_bytes()))
}
