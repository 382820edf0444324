use anyhow::{Context, Result};

const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com";
const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Application configuration loaded from environment variables.
/// Fails at startup if the API key is missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub gemini_api_key: String,
    pub gemini_api_base: String,
    pub request_timeout_secs: u64,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            gemini_api_key: require_any_env(&["GEMINI_API_KEY", "API_KEY"])?,
            gemini_api_base: std::env::var("GEMINI_API_BASE")
                .unwrap_or_else(|_| DEFAULT_API_BASE.to_string()),
            request_timeout_secs: match std::env::var("REQUEST_TIMEOUT_SECS") {
                Ok(raw) => parse_timeout(&raw)?,
                Err(_) => DEFAULT_TIMEOUT_SECS,
            },
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".to_string()),
        })
    }
}

/// Returns the first non-empty variable among `keys`.
fn require_any_env(keys: &[&str]) -> Result<String> {
    keys.iter()
        .find_map(|key| std::env::var(key).ok().filter(|v| !v.trim().is_empty()))
        .with_context(|| {
            format!(
                "Required environment variable '{}' is not set",
                keys.join("' or '")
            )
        })
}

fn parse_timeout(raw: &str) -> Result<u64> {
    let secs = raw
        .trim()
        .parse::<u64>()
        .context("REQUEST_TIMEOUT_SECS must be a whole number of seconds")?;
    anyhow::ensure!(secs > 0, "REQUEST_TIMEOUT_SECS must be greater than zero");
    Ok(secs)
}
