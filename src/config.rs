//! Configuration types.

use std::path::PathBuf;
use std::time::Duration;

use crate::error::ConfigError;

/// Default toast lifetime when the caller does not pass one.
pub const DEFAULT_TOAST_DURATION: Duration = Duration::from_millis(5000);

/// Client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the WorkNow REST API, without a trailing slash.
    pub api_base_url: String,
    /// Per-request timeout.
    pub request_timeout: Duration,
    /// Default lifetime of a toast notification.
    pub toast_duration: Duration,
    /// Where the file-backed session store keeps its data.
    pub session_path: PathBuf,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:3000/api".to_string(),
            request_timeout: Duration::from_secs(30),
            toast_duration: DEFAULT_TOAST_DURATION,
            session_path: PathBuf::from("./data/session.json"),
        }
    }
}

impl ClientConfig {
    /// Build a config from `WORKNOW_*` environment variables, falling back to
    /// defaults for anything unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`ClientConfig::from_env`] but with an injectable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup("WORKNOW_API_URL") {
            let url = url.trim().trim_end_matches('/').to_string();
            if url.is_empty() {
                return Err(ConfigError::InvalidValue {
                    key: "WORKNOW_API_URL".into(),
                    message: "must not be empty".into(),
                });
            }
            config.api_base_url = url;
        }

        if let Some(ms) = lookup("WORKNOW_TOAST_MS") {
            config.toast_duration = Duration::from_millis(parse_u64("WORKNOW_TOAST_MS", &ms)?);
        }

        if let Some(secs) = lookup("WORKNOW_TIMEOUT_SECS") {
            config.request_timeout =
                Duration::from_secs(parse_u64("WORKNOW_TIMEOUT_SECS", &secs)?);
        }

        if let Some(path) = lookup("WORKNOW_SESSION_PATH") {
            config.session_path = PathBuf::from(path);
        }

        Ok(config)
    }
}

fn parse_u64(key: &str, value: &str) -> Result<u64, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|e: std::num::ParseIntError| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })
}
