//! Runtime configuration loaded from the environment (and an optional `.env`).

use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, warn};

use crate::analysis::{HttpProgressSource, DEFAULT_LOOKBACK_DAYS};
use crate::error::Result;

const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressConfig {
    /// Base URL of the portfolio API, without a trailing slash
    pub api_base: String,
    /// Owner used when a target names only a repository
    pub github_username: Option<String>,
    pub lookback_days: u32,
    pub http_timeout_secs: u64,
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self {
            api_base: String::new(),
            github_username: None,
            lookback_days: DEFAULT_LOOKBACK_DAYS,
            http_timeout_secs: DEFAULT_HTTP_TIMEOUT_SECS,
        }
    }
}

fn env_var_or<T>(key: &str, default: T) -> T
where
    T: FromStr,
{
    match std::env::var(key) {
        Ok(val) => match val.trim().parse::<T>() {
            Ok(parsed) => {
                debug!(key, value = val.trim(), "config from environment");
                parsed
            }
            Err(_) => {
                warn!(key, value = %val, "config value failed to parse, using default");
                default
            }
        },
        Err(_) => default,
    }
}

fn env_string(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl ProgressConfig {
    /// Read `PROGRESS_*` variables, loading `.env` first if present.
    pub fn from_env() -> Self {
        if dotenvy::dotenv().is_err() {
            debug!(".env file not found, using environment variables and defaults");
        }

        let defaults = Self::default();
        Self {
            api_base: env_string("PROGRESS_API_BASE")
                .map(|base| base.trim_end_matches('/').to_string())
                .unwrap_or(defaults.api_base),
            github_username: env_string("PROGRESS_GITHUB_USERNAME"),
            lookback_days: env_var_or("PROGRESS_LOOKBACK_DAYS", defaults.lookback_days),
            http_timeout_secs: env_var_or("PROGRESS_HTTP_TIMEOUT_SECS", defaults.http_timeout_secs),
        }
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    /// HTTP client for the configured API
    pub fn http_source(&self) -> Result<HttpProgressSource> {
        HttpProgressSource::new(&self.api_base, self.http_timeout())
    }
}
