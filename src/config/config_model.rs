use super::{auth_mode::AuthMode, stage::Stage};

#[derive(Debug, Clone)]
pub struct DotEnvyConfig {
    pub server: Server,
    pub database: Database,
    pub telegram: Telegram,
    pub stage: Stage,
}

#[derive(Debug, Clone)]
pub struct Server {
    pub port: u16,
    /// Request body limit in MiB.
    pub body_limit: u64,
    /// Request timeout in seconds.
    pub timeout: u64,
    /// Empty means any origin.
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct Database {
    pub url: String,
    pub max_connections: u32,
    pub connection_timeout_ms: u64,
    pub idle_timeout_ms: u64,
}

#[derive(Clone)]
pub struct Telegram {
    pub bot_token: String,
    pub jwt_secret: String,
    pub auth_mode: AuthMode,
}

// Secrets stay out of logs.
impl std::fmt::Debug for Telegram {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Telegram")
            .field("bot_token", &"<redacted>")
            .field("jwt_secret", &"<redacted>")
            .field("auth_mode", &self.auth_mode)
            .finish()
    }
}
