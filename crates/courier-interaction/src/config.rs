//! Backend connection configuration.
//!
//! Supports overriding the backend base URL via the `COURIER_BACKEND_URL`
//! environment variable.

use std::env;
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Connection settings for the chat backend.
#[derive(Debug, Clone)]
pub struct BackendConfig {
    /// Base URL all endpoint paths are joined onto, without a trailing slash.
    pub base_url: String,
    /// Per-request timeout. The observed design had none; a stalled call
    /// would leave the session unable to send until reload, so one is
    /// applied here and a timed-out request resolves as a transport
    /// failure.
    pub timeout: Duration,
}

impl BackendConfig {
    /// Creates a configuration for an explicit base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            base_url,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Loads configuration from the environment.
    ///
    /// `COURIER_BACKEND_URL` overrides the default local backend address.
    pub fn from_env() -> Self {
        let base_url =
            env::var("COURIER_BACKEND_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        Self::new(base_url)
    }

    /// Overrides the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_points_at_local_backend() {
        let config = BackendConfig::default();
        assert_eq!(config.base_url, "http://127.0.0.1:8000");
        assert_eq!(config.timeout, Duration::from_secs(30));
    }

    #[test]
    fn trailing_slashes_are_stripped() {
        let config = BackendConfig::new("http://backend.local:8000//");
        assert_eq!(config.base_url, "http://backend.local:8000");
    }
}
