//! Settings for the outbound match-execution service client.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::config::db::must_var;
use crate::error::AppError;

pub const DEFAULT_TIMEOUT_MS: u64 = 5_000;
pub const DEFAULT_MAX_ATTEMPTS: u32 = 2;
pub const DEFAULT_RETRY_INTERVAL_MS: u64 = 250;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchServiceConfig {
    /// Base URL without trailing slash, e.g. `http://matches:8080`
    pub base_url: String,
    /// Upper bound for one announcement, retries included
    pub timeout: Duration,
    /// Total tries per announcement for transient failures (>= 1)
    pub max_attempts: u32,
    pub retry_interval: Duration,
}

impl MatchServiceConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            retry_interval: Duration::from_millis(DEFAULT_RETRY_INTERVAL_MS),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    pub fn with_retry_interval(mut self, interval: Duration) -> Self {
        self.retry_interval = interval;
        self
    }

    /// Read `MATCH_SERVICE_URL` (required) and the optional tuning variables.
    pub fn from_env() -> Result<Self, AppError> {
        let base_url = must_var("MATCH_SERVICE_URL")?;
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(AppError::config(format!(
                "MATCH_SERVICE_URL must be an http(s) URL, got '{base_url}'"
            )));
        }

        let timeout_ms = parse_var("MATCH_SERVICE_TIMEOUT_MS", DEFAULT_TIMEOUT_MS)?;
        if timeout_ms == 0 {
            return Err(AppError::config("MATCH_SERVICE_TIMEOUT_MS must be positive"));
        }
        let max_attempts = parse_var("MATCH_SERVICE_MAX_ATTEMPTS", DEFAULT_MAX_ATTEMPTS)?;
        let retry_ms = parse_var("MATCH_SERVICE_RETRY_INTERVAL_MS", DEFAULT_RETRY_INTERVAL_MS)?;

        Ok(Self::new(base_url)
            .with_timeout(Duration::from_millis(timeout_ms))
            .with_max_attempts(max_attempts)
            .with_retry_interval(Duration::from_millis(retry_ms)))
    }

    pub fn matches_url(&self) -> String {
        format!("{}/matches", self.base_url)
    }
}

fn parse_var<T: FromStr>(name: &str, default: T) -> Result<T, AppError> {
    match env::var(name) {
        Ok(raw) => raw.trim().parse::<T>().map_err(|_| {
            AppError::config(format!("{name} must be a non-negative integer, got '{raw}'"))
        }),
        Err(_) => Ok(default),
    }
}
