//! Client configuration subsystem.
//!
//! # Data Flow
//! ```text
//! Defaults (schema.rs)
//!     → optional TOML file (loader.rs)
//!     → environment overrides (loader.rs, BAZAAR_API_URL)
//!     → semantic validation (validation.rs)
//!     → ClientConfig handed to ApiClient::new
//! ```

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{CacheConfig, ClientConfig, RetryConfig, TimeoutConfig, UploadConfig};
