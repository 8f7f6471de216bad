//! Resilient HTTP API client for the Bazaar storefront backend.
//!
//! # Architecture Overview
//!
//! ```text
//! request(endpoint, options)
//!     → config   (base URL, defaults)
//!     → cache    (TTL lookup: GET hits skip the network entirely)
//!     → auth     (bearer token read from the shared session store)
//!     → resilience (whole-call deadline, cancellation handle,
//!                   retry state machine with linear backoff)
//!     → http     (dispatch, decode by content type)
//!     → events   (401/403 published to subscribers)
//! ```

// Core subsystems
pub mod client;
pub mod config;
pub mod http;

// Supporting state
pub mod auth;
pub mod cache;
pub mod events;

// Cross-cutting concerns
pub mod error;
pub mod observability;
pub mod resilience;

// Typed storefront surface
pub mod endpoints;

pub use auth::TokenStore;
pub use cache::ResponseCache;
pub use client::upload::{UploadHandle, UploadProgress};
pub use client::ApiClient;
pub use config::ClientConfig;
pub use error::{ApiError, ApiResult};
pub use events::AuthEvent;
pub use http::{RequestOptions, ResponseData};
