use serde::{Deserialize, Serialize};

/// Identity carried inside a signed Telegram WebApp `initData` payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TelegramUser {
    pub id: i64,
    pub first_name: String,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub language_code: Option<String>,
    #[serde(default)]
    pub is_premium: Option<bool>,
}

impl TelegramUser {
    /// Identity injected by the insecure development bypass.
    pub fn dev_bypass_identity() -> Self {
        Self {
            id: 402_695_709,
            first_name: "Test".to_string(),
            last_name: Some("User".to_string()),
            username: Some("Legacyyy777".to_string()),
            language_code: Some("ru".to_string()),
            is_premium: Some(false),
        }
    }
}
