//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, sane retry counts)
//! - Check the base URL parses when present
//!
//! # Design Decisions
//! - Returns all validation errors, not just the first
//! - Validation is a pure function: ClientConfig → Result<(), Vec<ValidationError>>
//! - Runs before a config is accepted into the client

use thiserror::Error;
use url::Url;

use crate::config::schema::ClientConfig;

/// A single semantic problem found in a configuration.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("invalid base URL '{0}': {1}")]
    BaseUrl(String, String),

    #[error("request timeout must be greater than zero")]
    ZeroRequestTimeout,

    #[error("connect timeout must be greater than zero")]
    ZeroConnectTimeout,

    #[error("max_retries {0} exceeds the allowed maximum of {1}")]
    TooManyRetries(u32, u32),

    #[error("cache TTL must be greater than zero when the cache is enabled")]
    ZeroCacheTtl,

    #[error("upload chunk size must be greater than zero")]
    ZeroChunkSize,
}

/// Upper bound on configured retries; beyond this a single call could
/// outlive any reasonable deadline.
const MAX_RETRIES: u32 = 10;

/// Validate a configuration, collecting every problem found.
pub fn validate_config(config: &ClientConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if !config.base_url.is_empty() {
        if let Err(e) = Url::parse(&config.base_url) {
            errors.push(ValidationError::BaseUrl(
                config.base_url.clone(),
                e.to_string(),
            ));
        }
    }

    if config.timeouts.request_ms == 0 {
        errors.push(ValidationError::ZeroRequestTimeout);
    }
    if config.timeouts.connect_ms == 0 {
        errors.push(ValidationError::ZeroConnectTimeout);
    }

    if config.retries.max_retries > MAX_RETRIES {
        errors.push(ValidationError::TooManyRetries(
            config.retries.max_retries,
            MAX_RETRIES,
        ));
    }

    if config.cache.enabled && config.cache.ttl_ms == 0 {
        errors.push(ValidationError::ZeroCacheTtl);
    }

    if config.upload.chunk_bytes == 0 {
        errors.push(ValidationError::ZeroChunkSize);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
