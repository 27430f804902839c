use anyhow::{Context, Result, anyhow};
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub jwt_secret: String,
    pub api_base_url: String,
    pub api_timeout: Duration,
    pub permission_cache_ttl: Duration,
    pub redis_url: Option<String>,
    pub secure_cookies: bool,
    pub otel_endpoint: String,
    pub test_mode: bool,
}

impl Config {
    pub fn init() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let require = |key: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .with_context(|| format!("Missing environment variable: {key}"))
        };

        let port = require("PORT")?
            .parse::<u16>()
            .context("PORT must be a valid u16 integer")?;

        let jwt_secret = require("JWT_SECRET")?;

        let api_base_url = require("API_BASE_URL")?
            .trim_end_matches('/')
            .to_string();

        let api_timeout = match lookup("API_TIMEOUT_SECS") {
            Some(v) => Duration::from_secs(
                v.parse::<u64>()
                    .context("API_TIMEOUT_SECS must be a whole number of seconds")?,
            ),
            None => Duration::from_secs(10),
        };

        let permission_cache_ttl = match lookup("PERMISSION_CACHE_TTL_SECS") {
            Some(v) => Duration::from_secs(
                v.parse::<u64>()
                    .context("PERMISSION_CACHE_TTL_SECS must be a whole number of seconds")?,
            ),
            None => Duration::from_secs(300),
        };

        let redis_url = lookup("REDIS_URL").filter(|v| !v.trim().is_empty());

        let secure_cookies = match lookup("SECURE_COOKIES").as_deref() {
            None | Some("false") => false,
            Some("true") => true,
            Some(other) => {
                return Err(anyhow!(
                    "SECURE_COOKIES must be 'true' or 'false', got '{}'",
                    other
                ));
            }
        };

        let otel_endpoint =
            lookup("OTEL_ENDPOINT").unwrap_or_else(|| "http://otel-collector:4317".to_string());

        let test_mode = Self::test_mode(lookup("CONSOLE_TEST_MODE").as_deref());

        Ok(Self {
            port,
            jwt_secret,
            api_base_url,
            api_timeout,
            permission_cache_ttl,
            redis_url,
            secure_cookies,
            otel_endpoint,
            test_mode,
        })
    }

    #[cfg(feature = "test-mode")]
    fn test_mode(value: Option<&str>) -> bool {
        matches!(value, Some("true") | Some("1"))
    }

    #[cfg(not(feature = "test-mode"))]
    fn test_mode(value: Option<&str>) -> bool {
        if value.is_some() {
            tracing::warn!("CONSOLE_TEST_MODE is ignored: built without the test-mode feature");
        }
        false
    }
}
