use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub redis_url: String,
    pub optimizer_url: String,
    pub optimizer_api_key: String,
    pub credits_url: String,
    pub port: u16,
    pub rust_log: String,
    pub draft_debounce_ms: u64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            redis_url: require_env("REDIS_URL")?,
            optimizer_url: require_env("OPTIMIZER_URL")?,
            optimizer_api_key: require_env("OPTIMIZER_API_KEY")?,
            credits_url: require_env("CREDITS_URL")?,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            draft_debounce_ms: std::env::var("DRAFT_DEBOUNCE_MS")
                .unwrap_or_else(|_| "2000".to_string())
                .parse::<u64>()
                .context("DRAFT_DEBOUNCE_MS must be a duration in milliseconds")?,
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}
