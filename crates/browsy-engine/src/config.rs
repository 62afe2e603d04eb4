//! Engine configuration

use crate::search::DEFAULT_SEARCH_URL;
use serde::{Deserialize, Serialize};

/// Reference engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// User-Agent header sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Viewport width used for element bounds
    #[serde(default = "default_viewport_width")]
    pub viewport_width: u32,

    /// Viewport height
    #[serde(default = "default_viewport_height")]
    pub viewport_height: u32,

    /// Maximum accepted response body size
    #[serde(default = "default_max_response_bytes")]
    pub max_response_bytes: usize,

    /// Maximum redirects followed per request
    #[serde(default = "default_max_redirects")]
    pub max_redirects: usize,

    /// Search endpoint queried with `?q=<query>`
    #[serde(default = "default_search_url")]
    pub search_url: String,

    /// Allow schemes other than http/https
    #[serde(default)]
    pub allow_non_http: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            timeout_secs: default_timeout_secs(),
            viewport_width: default_viewport_width(),
            viewport_height: default_viewport_height(),
            max_response_bytes: default_max_response_bytes(),
            max_redirects: default_max_redirects(),
            search_url: default_search_url(),
            allow_non_http: false,
        }
    }
}

fn default_user_agent() -> String {
    concat!("browsy/", env!("CARGO_PKG_VERSION")).to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_viewport_width() -> u32 {
    1920
}

fn default_viewport_height() -> u32 {
    1080
}

fn default_max_response_bytes() -> usize {
    5 * 1024 * 1024
}

fn default_max_redirects() -> usize {
    10
}

fn default_search_url() -> String {
    DEFAULT_SEARCH_URL.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: EngineConfig = serde_json::from_str(r#"{"timeout_secs": 5}"#).unwrap();
        assert_eq!(config.timeout_secs, 5);
        assert_eq!(config.viewport_width, 1920);
        assert_eq!(config.search_url, DEFAULT_SEARCH_URL);
        assert!(!config.allow_non_http);
    }
}
