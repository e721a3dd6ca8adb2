use std::fmt::Display;

use anyhow::{Result, bail};

/// How incoming requests prove the caller's Telegram identity.
///
/// `InsecureDevBypass` skips initData verification entirely and injects a
/// fixed test identity. It is only reachable through the exact value
/// `insecure-dev-bypass`; no stage or generic "dev" label turns it on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AuthMode {
    #[default]
    Telegram,
    InsecureDevBypass,
}

impl AuthMode {
    pub fn is_bypass(&self) -> bool {
        matches!(self, AuthMode::InsecureDevBypass)
    }
}

impl Display for AuthMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mode = match self {
            AuthMode::Telegram => "telegram",
            AuthMode::InsecureDevBypass => "insecure-dev-bypass",
        };

        write!(f, "{}", mode)
    }
}

impl TryFrom<&str> for AuthMode {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self> {
        match value.trim() {
            "telegram" => Ok(AuthMode::Telegram),
            "insecure-dev-bypass" => Ok(AuthMode::InsecureDevBypass),
            other => bail!(
                "unknown MINIAPP_AUTH_MODE value: {other} (expected `telegram` or `insecure-dev-bypass`)"
            ),
        }
    }
}
