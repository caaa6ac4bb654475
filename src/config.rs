use anyhow::{Context, Result};
use std::env;
use std::fmt;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://api.hunter.io/v2";
pub const DEFAULT_MAX_INPUT_LENGTH: usize = 200;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

/// Hunter API credential. Debug output is redacted so the key can never end up in logs.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    // Server
    pub host: String,
    pub port: u16,
    pub cors_origins: Vec<String>,

    // Hunter API
    pub api_key: ApiKey,
    pub base_url: String,
    pub request_timeout: Duration,

    // Forms
    pub max_input_length: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the config from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup("API_KEY")
            .filter(|key| !key.trim().is_empty())
            .context("API_KEY must be set")?;

        Ok(Config {
            host: lookup("HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            port: lookup("PORT")
                .unwrap_or_else(|| "5000".to_string())
                .parse()
                .context("PORT must be a valid u16")?,
            cors_origins: lookup("CORS_ORIGINS")
                .unwrap_or_default()
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),

            api_key: ApiKey::new(api_key),
            base_url: lookup("HUNTER_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            request_timeout: Duration::from_secs(
                lookup("REQUEST_TIMEOUT_SECS")
                    .map(|v| v.parse())
                    .transpose()
                    .context("REQUEST_TIMEOUT_SECS must be a whole number of seconds")?
                    .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
            ),

            max_input_length: lookup("MAX_INPUT_LENGTH")
                .map(|v| v.parse())
                .transpose()
                .context("MAX_INPUT_LENGTH must be a positive integer")?
                .unwrap_or(DEFAULT_MAX_INPUT_LENGTH),
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
