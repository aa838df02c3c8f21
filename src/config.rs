//! Client configuration
//!
//! Centralized configuration management with environment variable support
//! and sensible defaults.

use std::env;
use std::time::Duration;

/// Client configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the orchestration service (no trailing slash)
    pub base_url: String,
    /// Per-attempt request timeout
    pub request_timeout: Duration,
    /// Maximum number of attempts per retried operation (at least 1)
    pub retry_attempts: u32,
    /// Base delay between attempts; attempt `k` waits `retry_delay * k`
    pub retry_delay: Duration,
    /// When true, the client fabricates responses instead of contacting
    /// the remote service
    pub mock_mode: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            request_timeout: Duration::from_millis(5000),
            retry_attempts: 3,
            retry_delay: Duration::from_millis(2000),
            mock_mode: false,
        }
    }
}

impl Config {
    /// Load configuration from environment variables with defaults
    ///
    /// Unparseable values silently fall back to the default.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            base_url: env::var("API_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.base_url),
            request_timeout: env::var("API_TIMEOUT_MS")
                .ok()
                .and_then(|t| t.parse().ok())
                .map(Duration::from_millis)
                .unwrap_or(defaults.request_timeout),
            retry_attempts: env::var("API_RETRY_ATTEMPTS")
                .ok()
                .and_then(|n| n.parse().ok())
                .map(|n: u32| n.max(1))
                .unwrap_or(defaults.retry_attempts),
            retry_delay: env::var("API_RETRY_DELAY_MS")
                .ok()
                .and_then(|d| d.parse().ok())
                .map(Duration::from_millis)
                .unwrap_or(defaults.retry_delay),
            mock_mode: env::var("MOCK_MODE")
                .map(|v| matches!(v.to_lowercase().as_str(), "1" | "true" | "yes"))
                .unwrap_or(defaults.mock_mode),
        }
    }
}
