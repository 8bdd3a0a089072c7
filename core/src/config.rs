//! Client configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::case::Case;
use crate::error::ApiError;

pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";
pub const DEFAULT_TIMEOUT_MS: u64 = 5_000;
pub const JSON_CONTENT_TYPE: &str = "application/json; charset=UTF-8";

/// Settings shared by every call made through one `ApiClient`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub base_url: String,
    /// Per-request timeout, in milliseconds.
    pub timeout_ms: u64,
    /// Headers sent with every request unless a call overrides them.
    pub default_headers: Vec<(String, String)>,
    /// Keep and send cookies across calls.
    pub include_credentials: bool,
    /// Key convention for outgoing bodies.
    pub request_case: Case,
    /// Key convention for incoming bodies.
    pub response_case: Case,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            default_headers: vec![
                ("Content-Type".to_string(), JSON_CONTENT_TYPE.to_string()),
                ("Accept".to_string(), "application/json".to_string()),
            ],
            include_credentials: true,
            request_case: Case::Camel,
            response_case: Case::Camel,
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.to_string(),
            ..Self::default()
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_ms = timeout.as_millis() as u64;
        self
    }

    pub fn with_request_case(mut self, case: Case) -> Self {
        self.request_case = case;
        self
    }

    /// Build a config from `STOREFRONT_API_URL`, `STOREFRONT_API_TIMEOUT_MS`
    /// and `STOREFRONT_REQUEST_CASE`, falling back to defaults.
    pub fn from_env() -> Result<Self, ApiError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ApiError> {
        let mut config = Self::default();
        if let Some(url) = lookup("STOREFRONT_API_URL") {
            config.base_url = url;
        }
        if let Some(ms) = lookup("STOREFRONT_API_TIMEOUT_MS") {
            config.timeout_ms = ms
                .parse()
                .map_err(|_| ApiError::Config(format!("STOREFRONT_API_TIMEOUT_MS: not a number: {ms}")))?;
        }
        if let Some(case) = lookup("STOREFRONT_REQUEST_CASE") {
            config.request_case = case
                .parse()
                .map_err(|e| ApiError::Config(format!("STOREFRONT_REQUEST_CASE: {e}")))?;
        }
        Ok(config)
    }
}
