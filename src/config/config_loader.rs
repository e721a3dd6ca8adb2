use std::str::FromStr;

use anyhow::{Context, Result, bail};
use url::Url;

use super::{
    auth_mode::AuthMode,
    config_model::{Database, DotEnvyConfig, Server, Telegram},
    stage::Stage,
};

const DEFAULT_PORT: u16 = 3001;
const DEFAULT_BODY_LIMIT_MB: u64 = 1;
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_MAX_CONNECTIONS: u32 = 20;
const DEFAULT_CONNECTION_TIMEOUT_MS: u64 = 2_000;
const DEFAULT_IDLE_TIMEOUT_MS: u64 = 30_000;

/// Reads the process environment; `.env` is expected to be applied by the
/// caller beforehand.
pub fn load() -> Result<DotEnvyConfig> {
    load_from(|key| std::env::var(key).ok())
}

/// Builds the configuration from an arbitrary key lookup so the parsing
/// rules can be exercised without touching the process environment.
pub fn load_from<F>(lookup: F) -> Result<DotEnvyConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

    let stage = match var("STAGE") {
        Some(raw) => Stage::try_from(raw.as_str())?,
        None => Stage::default(),
    };

    let port = match var("SERVER_PORT").or_else(|| var("PORT")) {
        Some(raw) => raw.parse().context("SERVER_PORT is invalid")?,
        None => DEFAULT_PORT,
    };

    let server = Server {
        port,
        body_limit: parse_or(var("SERVER_BODY_LIMIT"), DEFAULT_BODY_LIMIT_MB, "SERVER_BODY_LIMIT")?,
        timeout: parse_or(var("SERVER_TIMEOUT"), DEFAULT_TIMEOUT_SECS, "SERVER_TIMEOUT")?,
        allowed_origins: var("ALLOWED_ORIGINS")
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|origin| !origin.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default(),
    };

    let database_url = match var("DATABASE_URL") {
        Some(url) => url,
        None => database_url_from_parts(&var)?,
    };

    let database = Database {
        url: database_url,
        max_connections: parse_or(
            var("DATABASE_MAX_CONNECTIONS"),
            DEFAULT_MAX_CONNECTIONS,
            "DATABASE_MAX_CONNECTIONS",
        )?,
        connection_timeout_ms: parse_or(
            var("DATABASE_CONNECTION_TIMEOUT_MS"),
            DEFAULT_CONNECTION_TIMEOUT_MS,
            "DATABASE_CONNECTION_TIMEOUT_MS",
        )?,
        idle_timeout_ms: parse_or(
            var("DATABASE_IDLE_TIMEOUT_MS"),
            DEFAULT_IDLE_TIMEOUT_MS,
            "DATABASE_IDLE_TIMEOUT_MS",
        )?,
    };

    let bot_token = var("BOT_TOKEN").context("BOT_TOKEN is invalid")?;

    let auth_mode = match var("MINIAPP_AUTH_MODE") {
        Some(raw) => AuthMode::try_from(raw.as_str())?,
        None => AuthMode::default(),
    };

    if auth_mode.is_bypass() && stage == Stage::Production {
        bail!("MINIAPP_AUTH_MODE=insecure-dev-bypass is refused when STAGE=production");
    }

    let telegram = Telegram {
        jwt_secret: var("JWT_SECRET").unwrap_or_else(|| bot_token.clone()),
        bot_token,
        auth_mode,
    };

    Ok(DotEnvyConfig {
        server,
        database,
        telegram,
        stage,
    })
}

fn parse_or<T>(raw: Option<String>, default: T, key: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match raw {
        Some(raw) => raw.parse().with_context(|| format!("{key} is invalid")),
        None => Ok(default),
    }
}

fn database_url_from_parts<F>(var: &F) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    let host = var("POSTGRES_HOST").unwrap_or_else(|| "localhost".to_string());
    let port: u16 = parse_or(var("POSTGRES_PORT"), 5432, "POSTGRES_PORT")?;
    let database = var("POSTGRES_DB").unwrap_or_else(|| "remnawave_bot".to_string());
    let user = var("POSTGRES_USER").unwrap_or_else(|| "miniapp_readonly".to_string());
    let password = var("POSTGRES_PASSWORD");

    let mut url = Url::parse(&format!("postgres://{host}:{port}/{database}"))
        .context("POSTGRES_HOST / POSTGRES_DB do not form a valid URL")?;
    url.set_username(&user)
        .map_err(|_| anyhow::anyhow!("POSTGRES_USER is invalid"))?;
    url.set_password(password.as_deref())
        .map_err(|_| anyhow::anyhow!("POSTGRES_PASSWORD is invalid"))?;

    Ok(url.to_string())
}
