use std::env;

/// Connection settings for the hosted backend. Injected through the
/// environment at deploy time; nothing in the binary carries credentials.
#[derive(Debug, Clone)]
pub struct RemoteConfig {
    pub base_url: String,
    pub api_key: String,
}

pub const URL_VAR: &str = "SCOUTDESK_API_URL";
pub const KEY_VAR: &str = "SCOUTDESK_API_KEY";

impl RemoteConfig {
    /// Reads the remote endpoint from the environment (a `.env` file is
    /// honored when present). Returns `None` when either variable is
    /// missing or empty, which selects local-only mode.
    pub fn from_env() -> Option<Self> {
        let _ = dotenvy::dotenv();
        let base_url = env::var(URL_VAR).ok().filter(|v| !v.trim().is_empty())?;
        let api_key = env::var(KEY_VAR).ok().filter(|v| !v.trim().is_empty())?;
        Some(Self { base_url, api_key })
    }
}
