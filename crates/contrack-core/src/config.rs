//! Configuration module
//!
//! Environment-driven configuration for the contract-store client and the
//! workflows built on it. Every knob has a named default; `from_env` only
//! overrides what is set.

use std::env;

use anyhow::{Context, Result};

// Common constants
const DEFAULT_API_URL: &str = "http://localhost:8000";
const EXPIRY_WARNING_DAYS: i64 = 60;
const CONNECT_TIMEOUT_SECS: u64 = 10;
const REQUEST_TIMEOUT_SECS: u64 = 30;
const REPORT_TIMEOUT_SECS: u64 = 60;
const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Client configuration.
///
/// `expiry_warning_days` defaults to 60, matching the store's
/// `EXPIRY_WARNING_DAYS`. Product has historically also shown 30-day warnings
/// in some views; the value is configurable rather than hard-coded so the
/// discrepancy can be settled without a release.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    pub api_base_url: String,
    pub expiry_warning_days: i64,
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
    /// Report generation is an AI call with unbounded latency risk; it gets
    /// its own, longer timeout.
    pub report_timeout_secs: u64,
    pub max_upload_bytes: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_URL.to_string(),
            expiry_warning_days: EXPIRY_WARNING_DAYS,
            connect_timeout_secs: CONNECT_TIMEOUT_SECS,
            request_timeout_secs: REQUEST_TIMEOUT_SECS,
            report_timeout_secs: REPORT_TIMEOUT_SECS,
            max_upload_bytes: MAX_UPLOAD_BYTES,
        }
    }
}

impl ClientConfig {
    /// Build configuration from the environment.
    ///
    /// Recognized variables: `CONTRACK_API_URL`, `CONTRACK_EXPIRY_WARNING_DAYS`,
    /// `CONTRACK_CONNECT_TIMEOUT_SECS`, `CONTRACK_REQUEST_TIMEOUT_SECS`,
    /// `CONTRACK_REPORT_TIMEOUT_SECS`, `CONTRACK_MAX_UPLOAD_BYTES`.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(url) = env::var("CONTRACK_API_URL") {
            config.api_base_url = url;
        }
        if let Some(days) = parse_env("CONTRACK_EXPIRY_WARNING_DAYS")? {
            config.expiry_warning_days = days;
        }
        if let Some(secs) = parse_env("CONTRACK_CONNECT_TIMEOUT_SECS")? {
            config.connect_timeout_secs = secs;
        }
        if let Some(secs) = parse_env("CONTRACK_REQUEST_TIMEOUT_SECS")? {
            config.request_timeout_secs = secs;
        }
        if let Some(secs) = parse_env("CONTRACK_REPORT_TIMEOUT_SECS")? {
            config.report_timeout_secs = secs;
        }
        if let Some(bytes) = parse_env("CONTRACK_MAX_UPLOAD_BYTES")? {
            config.max_upload_bytes = bytes;
        }

        if config.expiry_warning_days < 0 {
            anyhow::bail!("CONTRACK_EXPIRY_WARNING_DAYS must be non-negative");
        }

        Ok(config)
    }
}

fn parse_env<T: std::str::FromStr>(key: &str) -> Result<Option<T>>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(value) => {
            let parsed = value
                .parse::<T>()
                .with_context(|| format!("Invalid value for {}: {}", key, value))?;
            Ok(Some(parsed))
        }
        Err(_) => Ok(None),
    }
}
