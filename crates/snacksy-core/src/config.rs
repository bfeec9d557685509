//! Client configuration model.

use reqwest::Url;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SnacksyError};

/// Backend used when nothing else is configured.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";

/// Redirect URI registered for the frontend origin.
pub const DEFAULT_REDIRECT_URI: &str = "http://localhost:5173";

pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Resolved client configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Base URL of the Snacksy backend, without trailing slash.
    pub api_base_url: String,
    /// OAuth client id. Sign-in is unavailable without it.
    pub google_client_id: Option<String>,
    /// Redirect URI sent with the authorization request; must match the one
    /// the backend uses for the code exchange.
    pub google_redirect_uri: String,
    /// Per-request timeout. `None` keeps the transport default.
    pub request_timeout_secs: Option<u64>,
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            google_client_id: None,
            google_redirect_uri: DEFAULT_REDIRECT_URI.to_string(),
            request_timeout_secs: None,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl AppConfig {
    /// Client id, if one is configured and non-blank.
    pub fn client_id(&self) -> Option<&str> {
        self.google_client_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
    }

    /// Checks the base URL and strips trailing slashes from it. A zero
    /// request timeout is rejected.
    pub fn normalize(mut self) -> Result<Self> {
        if self.request_timeout_secs == Some(0) {
            return Err(SnacksyError::config(
                "request_timeout_secs must be at least 1 (omit it for no timeout)",
            ));
        }
        let trimmed = self.api_base_url.trim().trim_end_matches('/').to_string();
        let url = Url::parse(&trimmed).map_err(|e| {
            SnacksyError::config(format!("invalid api_base_url '{}': {}", trimmed, e))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(SnacksyError::config(format!(
                "api_base_url must be http or https, got '{}'",
                url.scheme()
            )));
        }
        self.api_base_url = trimmed;
        Ok(self)
    }
}
