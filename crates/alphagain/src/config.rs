//! Application configuration from the environment.
//!
//! [`AppConfig::from_env`] loads a `.env` file if one exists, then reads
//! the process environment. The API credential is required; everything
//! else has a default. A missing credential is reported once, at startup,
//! before any UI or pipeline is created.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use tracing::debug;

use crate::api::RetryConfig;
use crate::api::gemini::{DEFAULT_MODEL, DEFAULT_TEMPERATURE, DEFAULT_TIMEOUT, GEMINI_BASE_URL};

/// Environment variable holding the Gemini API key.
pub const API_KEY_VAR: &str = "GOOGLE_API_KEY";
pub const MODEL_VAR: &str = "ALPHAGAIN_MODEL";
pub const TEMPERATURE_VAR: &str = "ALPHAGAIN_TEMPERATURE";
pub const BASE_URL_VAR: &str = "ALPHAGAIN_BASE_URL";
pub const TIMEOUT_VAR: &str = "ALPHAGAIN_TIMEOUT_SECS";
pub const MAX_RETRIES_VAR: &str = "ALPHAGAIN_MAX_RETRIES";
pub const LOG_FILE_VAR: &str = "ALPHAGAIN_LOG_FILE";

/// Default log file, relative to the working directory.
pub const DEFAULT_LOG_FILE: &str = "app.log";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{var} is missing. Add it to your environment or a .env file.")]
    MissingCredential { var: &'static str },
    #[error("invalid {var}=`{value}`: {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

/// Runtime settings shared by the CLI and the TUI.
#[derive(Clone)]
pub struct AppConfig {
    pub api_key: String,
    pub model: String,
    /// Sampling temperature, 0.0 – 2.0. Default: `0.7`.
    pub temperature: f32,
    pub base_url: String,
    /// Per-request timeout. Default: 120 s.
    pub request_timeout: Duration,
    pub retry: RetryConfig,
    pub log_file: PathBuf,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("base_url", &self.base_url)
            .field("request_timeout", &self.request_timeout)
            .field("retry", &self.retry)
            .field("log_file", &self.log_file)
            .finish()
    }
}

fn parse_var<T: std::str::FromStr>(
    var: &'static str,
    value: &str,
    valid: impl Fn(&T) -> bool,
    reason: &str,
) -> Result<T, ConfigError> {
    value
        .trim()
        .parse::<T>()
        .ok()
        .filter(|v| valid(v))
        .ok_or_else(|| ConfigError::Invalid {
            var,
            value: value.to_string(),
            reason: reason.to_string(),
        })
}

impl AppConfig {
    /// Load `.env` (if present) and read the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        match dotenvy::dotenv() {
            Ok(path) => debug!("Loaded environment from {}", path.display()),
            Err(e) => debug!("No .env file loaded: {e}"),
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_key = get(API_KEY_VAR)
            .map(|k| k.trim().to_string())
            .ok_or(ConfigError::MissingCredential { var: API_KEY_VAR })?;

        let temperature = match get(TEMPERATURE_VAR) {
            Some(v) => parse_var(
                TEMPERATURE_VAR,
                &v,
                |t: &f32| (0.0..=2.0).contains(t),
                "expected a number between 0.0 and 2.0",
            )?,
            None => DEFAULT_TEMPERATURE,
        };

        let request_timeout = match get(TIMEOUT_VAR) {
            Some(v) => Duration::from_secs(parse_var(
                TIMEOUT_VAR,
                &v,
                |s: &u64| *s > 0,
                "expected a positive number of seconds",
            )?),
            None => DEFAULT_TIMEOUT,
        };

        let retry = match get(MAX_RETRIES_VAR) {
            Some(v) => RetryConfig::with_retries(parse_var(
                MAX_RETRIES_VAR,
                &v,
                |n: &u32| *n <= 10,
                "expected a whole number from 0 to 10",
            )?),
            None => RetryConfig::default(),
        };

        Ok(Self {
            api_key,
            model: get(MODEL_VAR).unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            temperature,
            base_url: get(BASE_URL_VAR)
                .map(|u| u.trim_end_matches('/').to_string())
                .unwrap_or_else(|| GEMINI_BASE_URL.to_string()),
            request_timeout,
            retry,
            log_file: get(LOG_FILE_VAR)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_FILE)),
        })
    }
}
