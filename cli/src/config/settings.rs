//! Application configuration settings.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::client::origin;

/// Base URL used when none is configured or the configured one is malformed.
pub const DEFAULT_API_URL: &str = "http://localhost:8000/api";

/// Main configuration for bufete.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BufeteConfig {
    /// API client settings.
    pub api: ApiConfig,
}

/// API client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Backend API base URL, e.g. `https://back.example.com/api`.
    ///
    /// Kept as a raw string: a malformed value degrades to [`DEFAULT_API_URL`]
    /// instead of failing to load the whole file.
    pub base_url: String,
    /// Explicit origin that storage paths are resolved against.
    pub api_origin: Option<String>,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            api_origin: None,
            timeout_secs: 30,
        }
    }
}

impl ApiConfig {
    /// Creates a configuration pointing at the given base URL.
    #[must_use]
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Parsed base URL, always ending in `/` so relative endpoints join under it.
    pub fn endpoint_base(&self) -> Result<Url, url::ParseError> {
        let mut url = match Url::parse(self.base_url.trim()) {
            Ok(url) if url.has_host() => url,
            _ => {
                tracing::debug!(base_url = %self.base_url, "Invalid API base URL, using default");
                Url::parse(DEFAULT_API_URL)?
            }
        };

        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }
        Ok(url)
    }

    /// Origin that relative asset paths are resolved against.
    #[must_use]
    pub fn asset_origin(&self) -> String {
        origin::resolve_origin(self.api_origin.as_deref(), Some(&self.base_url))
    }
}

/// Environment variables that can override configuration.
pub mod env {
    pub const API_URL: &str = "BUFETE_API_URL";
    pub const API_ORIGIN: &str = "BUFETE_API_ORIGIN";
    pub const LOG_LEVEL: &str = "BUFETE_LOG";
}

impl BufeteConfig {
    /// Apply environment variable overrides to the configuration.
    #[must_use]
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(url) = std::env::var(env::API_URL) {
            if !url.trim().is_empty() {
                self.api.base_url = url;
            }
        }

        if let Ok(origin) = std::env::var(env::API_ORIGIN) {
            if !origin.trim().is_empty() {
                self.api.api_origin = Some(origin);
            }
        }

        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_points_at_localhost() {
        let config = ApiConfig::default();
        assert_eq!(config.endpoint_base().unwrap().as_str(), "http://localhost:8000/api/");
        assert_eq!(config.asset_origin(), "http://localhost:8000");
    }

    #[test]
    fn endpoint_base_gets_trailing_slash() {
        let config = ApiConfig::with_base_url("https://back.example.com/api");
        let base = config.endpoint_base().unwrap();
        assert_eq!(base.as_str(), "https://back.example.com/api/");
        assert_eq!(
            base.join("team-members").unwrap().as_str(),
            "https://back.example.com/api/team-members"
        );
    }

    #[test]
    fn malformed_base_url_degrades_to_default() {
        let config = ApiConfig::with_base_url("not-a-url");
        assert_eq!(config.endpoint_base().unwrap().as_str(), "http://localhost:8000/api/");
        assert_eq!(config.asset_origin(), "http://localhost:8000");
    }

    #[test]
    fn explicit_origin_wins_over_base_url() {
        let config = ApiConfig {
            api_origin: Some("https://cdn.example.com".to_string()),
            ..ApiConfig::with_base_url("https://back.example.com/api")
        };
        assert_eq!(config.asset_origin(), "https://cdn.example.com");
    }

    #[test]
    fn parses_partial_toml() {
        let config: BufeteConfig =
            toml::from_str("[api]\nbase_url = \"https://back.example.com/api\"\n").unwrap();
        assert_eq!(config.api.base_url, "https://back.example.com/api");
        assert_eq!(config.api.timeout_secs, 30);
        assert!(config.api.api_origin.is_none());
    }
}
