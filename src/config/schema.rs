//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the client.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the API client.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL prepended to relative endpoints (e.g., "https://api.bazaar.example").
    ///
    /// Empty by default, in which case endpoints must be absolute URLs.
    pub base_url: String,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Retry configuration.
    pub retries: RetryConfig,

    /// Response cache settings.
    pub cache: CacheConfig,

    /// Upload settings.
    pub upload: UploadConfig,

    /// Log level used by the logging init helper (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Timeout configuration for outgoing requests.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Connection establishment timeout in milliseconds.
    pub connect_ms: u64,

    /// Deadline for a whole call (all attempts and backoff waits) in milliseconds.
    pub request_ms: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            connect_ms: 5_000,
            request_ms: 30_000,
        }
    }
}

/// Retry configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Maximum number of retry attempts after the initial one.
    pub max_retries: u32,

    /// Base delay for linear backoff in milliseconds.
    ///
    /// The wait before retry `n` is `base_delay_ms * n`.
    pub base_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay_ms: 1_000,
        }
    }
}

/// Response cache settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Enable the response cache for idempotent reads.
    pub enabled: bool,

    /// Time-to-live for cache entries in milliseconds.
    pub ttl_ms: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            ttl_ms: 5 * 60 * 1000, // 5 minutes
        }
    }
}

/// Upload settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UploadConfig {
    /// Chunk size for streamed multipart bodies in bytes.
    ///
    /// Progress is reported once per chunk handed to the transport.
    pub chunk_bytes: usize,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            chunk_bytes: 64 * 1024,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, "");
        assert_eq!(config.timeouts.request_ms, 30_000);
        assert_eq!(config.retries.max_retries, 3);
        assert_eq!(config.retries.base_delay_ms, 1_000);
        assert!(config.cache.enabled);
        assert_eq!(config.cache.ttl_ms, 300_000);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_partial_toml() {
        let config: ClientConfig = toml::from_str(
            r#"
            base_url = "https://api.bazaar.example"

            [retries]
            max_retries = 5
            "#,
        )
        .unwrap();

        assert_eq!(config.base_url, "https://api.bazaar.example");
        assert_eq!(config.retries.max_retries, 5);
        // Unspecified sections keep their defaults
        assert_eq!(config.retries.base_delay_ms, 1_000);
        assert_eq!(config.timeouts.request_ms, 30_000);
    }
}
