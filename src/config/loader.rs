//! Configuration loading from disk and environment.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::ClientConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Environment variable holding the API base URL.
pub const ENV_BASE_URL: &str = "BAZAAR_API_URL";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("HTTP client build error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Validation failed: {}", format_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn format_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from a TOML file.
///
/// The `BAZAAR_API_URL` environment variable, when set, overrides the
/// file's base URL.
pub fn load_config(path: &Path) -> Result<ClientConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let mut config: ClientConfig = toml::from_str(&content)?;

    apply_env(&mut config);
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Build a configuration from defaults plus environment overrides.
pub fn from_env() -> ClientConfig {
    let mut config = ClientConfig::default();
    apply_env(&mut config);
    config
}

/// Apply environment overrides onto an existing configuration.
pub fn apply_env(config: &mut ClientConfig) {
    if let Ok(base_url) = std::env::var(ENV_BASE_URL) {
        config.base_url = base_url;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_override() {
        std::env::set_var(ENV_BASE_URL, "https://env.bazaar.example");
        let config = from_env();
        assert_eq!(config.base_url, "https://env.bazaar.example");
        std::env::remove_var(ENV_BASE_URL);
    }

    #[test]
    fn test_load_rejects_invalid_file() {
        let dir = std::env::temp_dir();
        let path = dir.join("bazaar_client_bad_config.toml");
        std::fs::write(&path, "[timeouts]\nrequest_ms = 0").unwrap();

        let result = load_config(&path);
        assert!(matches!(result, Err(ConfigError::Validation(_))));

        std::fs::remove_file(&path).unwrap_or_default();
    }
}
