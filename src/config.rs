//! Client configuration: runtime mode, base URL resolution, and defaults.
//!
//! The base URL depends on where the process runs: a production deployment
//! talks to its own origin directly, while everything else goes through a
//! local reverse proxy that maps `/api/*` to the upstream host.

use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use std::env;
use std::time::Duration;

/// Request timeout applied to every request, in milliseconds.
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

/// Path segment prepended to every request path. The development proxy
/// strips it before forwarding upstream.
pub const PROXY_SEGMENT: &str = "/api";

/// Environment variable selecting the runtime mode.
pub const ENV_MODE: &str = "APIRELAY_ENV";

/// Where the process runs. Anything that is not explicitly production is
/// treated as development.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Production,
    Development,
}

impl Mode {
    /// Parses a mode value. Only the exact string "production" selects
    /// production; any other value falls back to development.
    pub fn parse(value: &str) -> Self {
        if value == "production" {
            Mode::Production
        } else {
            Mode::Development
        }
    }

    /// Resolves the mode from the `APIRELAY_ENV` environment variable.
    /// An unset variable means development.
    pub fn from_env() -> Self {
        env::var(ENV_MODE)
            .map(|value| Self::parse(&value))
            .unwrap_or(Mode::Development)
    }
}

/// Immutable configuration for an [`ApiClient`](crate::http::ApiClient).
///
/// Constructed once and handed to the client; there is no process-wide
/// instance to mutate.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    base_url: String,
    timeout: Duration,
    default_headers: HeaderMap,
}

impl ClientConfig {
    /// Creates a configuration with the default timeout and headers.
    ///
    /// A trailing slash on the base URL is dropped so that path joining
    /// never produces a double separator.
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut default_headers = HeaderMap::new();
        default_headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            default_headers,
        }
    }

    /// Resolves the base URL from the runtime mode: production uses the
    /// deployment origin, development uses the local proxy address.
    pub fn resolve(mode: Mode, origin: &str, proxy_addr: &str) -> Self {
        match mode {
            Mode::Production => Self::new(origin),
            Mode::Development => Self::new(proxy_addr),
        }
    }

    /// Overrides the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn default_headers(&self) -> &HeaderMap {
        &self.default_headers
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_parse_production() {
        assert_eq!(Mode::parse("production"), Mode::Production);
    }

    #[test]
    fn test_mode_parse_anything_else_is_development() {
        assert_eq!(Mode::parse("development"), Mode::Development);
        assert_eq!(Mode::parse("staging"), Mode::Development);
        assert_eq!(Mode::parse(""), Mode::Development);
        assert_eq!(Mode::parse("Production"), Mode::Development);
    }

    #[test]
    fn test_config_defaults() {
        let config = ClientConfig::new("http://127.0.0.1:8080");
        assert_eq!(config.base_url(), "http://127.0.0.1:8080");
        assert_eq!(config.timeout(), Duration::from_millis(10_000));
        assert_eq!(
            config.default_headers().get(CONTENT_TYPE).unwrap(),
            "application/json"
        );
    }

    #[test]
    fn test_config_trims_trailing_slash() {
        let config = ClientConfig::new("https://example.com/");
        assert_eq!(config.base_url(), "https://example.com");
    }

    #[test]
    fn test_config_with_timeout() {
        let config =
            ClientConfig::new("https://example.com").with_timeout(Duration::from_secs(1));
        assert_eq!(config.timeout(), Duration::from_secs(1));
    }

    #[test]
    fn test_resolve_production_uses_origin() {
        let config = ClientConfig::resolve(
            Mode::Production,
            "https://www.example.com",
            "http://127.0.0.1:8080",
        );
        assert_eq!(config.base_url(), "https://www.example.com");
    }

    #[test]
    fn test_resolve_development_uses_proxy() {
        let config = ClientConfig::resolve(
            Mode::Development,
            "https://www.example.com",
            "http://127.0.0.1:8080",
        );
        assert_eq!(config.base_url(), "http://127.0.0.1:8080");
    }
}
