// * Settings document: panel location, credentials, webhook target and cached session cookies

use crate::config::constants::{CONNECT_TIMEOUT_SECS, MAX_RETRIES, REQUEST_TIMEOUT_SECS};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;
use url::Url;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Config file {path} is not valid JSON: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Config is missing required key `{0}`")]
    MissingField(&'static str),

    #[error("Config key `{field}` is not a usable URL: {reason}")]
    InvalidUrl { field: &'static str, reason: String },
}

// * Shape of the file as written by users; every key may be absent or null
#[derive(Debug, Default, Deserialize)]
struct RawSettings {
    #[serde(default)]
    base_url: Option<String>,
    #[serde(default)]
    username: Option<String>,
    #[serde(default)]
    password: Option<String>,
    #[serde(default)]
    dingtalk_webhook: Option<String>,
    #[serde(default)]
    cookies: Option<BTreeMap<String, String>>,
    #[serde(default)]
    cookie_timestamp: Option<f64>,
    #[serde(default)]
    verify_ssl: Option<bool>,
}

/// Validated configuration for one run.
///
/// Read once per run by [`ConfigStore::load`](crate::config::ConfigStore::load);
/// the four required fields are guaranteed non-blank.
#[derive(Clone)]
pub struct Settings {
    /// Panel root, without a trailing slash
    pub base_url: String,
    pub username: String,
    pub password: String,
    /// Chat webhook target (`dingtalk_webhook` in the file)
    pub webhook_url: String,
    /// Cookies captured by the last successful login, if any
    pub cookies: BTreeMap<String, String>,
    /// Capture time of `cookies`, epoch seconds
    pub cookie_timestamp: Option<f64>,
    pub verify_ssl: bool,
}

// * Password and cookie values stay out of logs
impl std::fmt::Debug for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settings")
            .field("base_url", &self.base_url)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("webhook_url", &self.webhook_url)
            .field("cookie_names", &self.cookies.keys().collect::<Vec<_>>())
            .field("cookie_timestamp", &self.cookie_timestamp)
            .field("verify_ssl", &self.verify_ssl)
            .finish()
    }
}

impl Settings {
    fn from_raw(raw: RawSettings) -> Result<Self, ConfigError> {
        let base_url = required("base_url", raw.base_url)?;
        let username = required("username", raw.username)?;
        let password = required("password", raw.password)?;
        let webhook_url = required("dingtalk_webhook", raw.dingtalk_webhook)?;

        let base_url = base_url.trim().trim_end_matches('/').to_string();
        check_http_url("base_url", &base_url)?;
        let webhook_url = webhook_url.trim().to_string();
        check_http_url("dingtalk_webhook", &webhook_url)?;

        Ok(Self {
            base_url,
            username,
            password,
            webhook_url,
            cookies: raw.cookies.unwrap_or_default(),
            cookie_timestamp: raw.cookie_timestamp,
            verify_ssl: raw.verify_ssl.unwrap_or(false),
        })
    }

    /// Parses and validates a config document.
    pub fn from_json(raw: &str, path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let raw: RawSettings = serde_json::from_str(raw).map_err(|source| ConfigError::Parse {
            path: path.into(),
            source,
        })?;
        Self::from_raw(raw)
    }

    /// True when a previous login left cookies behind
    pub fn has_cookies(&self) -> bool {
        !self.cookies.is_empty()
    }

    /// Age of the cached cookies relative to `now` (epoch seconds).
    pub fn cookie_age(&self, now: f64) -> Option<Duration> {
        let captured = self.cookie_timestamp?;
        Duration::try_from_secs_f64(now - captured).ok()
    }

    pub fn transport(&self) -> TransportOptions {
        TransportOptions {
            verify_ssl: self.verify_ssl,
            ..TransportOptions::default()
        }
    }
}

fn required(field: &'static str, value: Option<String>) -> Result<String, ConfigError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ConfigError::MissingField(field)),
    }
}

fn check_http_url(field: &'static str, value: &str) -> Result<(), ConfigError> {
    let url = Url::parse(value).map_err(|e| ConfigError::InvalidUrl {
        field,
        reason: e.to_string(),
    })?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidUrl {
            field,
            reason: format!("unsupported scheme `{}`", url.scheme()),
        });
    }
    if url.host_str().is_none() {
        return Err(ConfigError::InvalidUrl {
            field,
            reason: "missing host".to_string(),
        });
    }
    Ok(())
}

/// Timeouts, retry count and TLS policy shared by every HTTP client in a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransportOptions {
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub max_retries: u32,
    pub verify_ssl: bool,
}

impl Default for TransportOptions {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(CONNECT_TIMEOUT_SECS),
            request_timeout: Duration::from_secs(REQUEST_TIMEOUT_SECS),
            max_retries: MAX_RETRIES,
            // * Panels are usually behind self-signed certificates
            verify_ssl: false,
        }
    }
}
