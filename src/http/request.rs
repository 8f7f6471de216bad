//! Per-call request descriptor.
//!
//! # Responsibilities
//! - Carry everything one call can override: method, body, headers,
//!   timeout, retry budget, cache and auth flags
//! - Generate the per-request diagnostic ID
//!
//! # Design Decisions
//! - Unset fields resolve against the client configuration at dispatch
//!   time, so a descriptor stays small and reusable
//! - The request ID is attached as early as possible for tracing

use std::collections::HashMap;

use reqwest::Method;
use serde_json::Value;
use uuid::Uuid;

/// Diagnostic header carrying the per-call UUID.
pub const HEADER_REQUEST_ID: &str = "x-request-id";

/// Diagnostic header carrying the attempt number on retries.
pub const HEADER_RETRY_ATTEMPT: &str = "x-retry-attempt";

/// Options for a single API call.
///
/// Every field is optional; unset fields fall back to the client's
/// configuration (method defaults to GET, caching defaults to GET-only,
/// auth defaults to on).
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    pub method: Option<Method>,
    pub body: Option<Value>,
    pub headers: HashMap<String, String>,
    pub timeout_ms: Option<u64>,
    pub retries: Option<u32>,
    pub retry_delay_ms: Option<u64>,
    pub use_cache: Option<bool>,
    pub use_auth: Option<bool>,
}

impl RequestOptions {
    /// Empty options; everything resolves to defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the HTTP method.
    pub fn method(mut self, method: Method) -> Self {
        self.method = Some(method);
        self
    }

    /// Set a JSON-serializable body. Ignored on GET dispatch, but still
    /// part of the cache key.
    pub fn body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Add a header, overriding the `Content-Type: application/json`
    /// default when the same name is given.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Override the whole-call deadline in milliseconds.
    pub fn timeout_ms(mut self, ms: u64) -> Self {
        self.timeout_ms = Some(ms);
        self
    }

    /// Override the retry count.
    pub fn retries(mut self, retries: u32) -> Self {
        self.retries = Some(retries);
        self
    }

    /// Override the linear backoff base delay in milliseconds.
    pub fn retry_delay_ms(mut self, ms: u64) -> Self {
        self.retry_delay_ms = Some(ms);
        self
    }

    /// Force cache usage on or off for this call.
    pub fn use_cache(mut self, use_cache: bool) -> Self {
        self.use_cache = Some(use_cache);
        self
    }

    /// Enable or disable bearer token injection for this call.
    pub fn use_auth(mut self, use_auth: bool) -> Self {
        self.use_auth = Some(use_auth);
        self
    }
}

/// Generate the diagnostic ID for one call.
pub fn new_request_id() -> String {
    Uuid::new_v4().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_builder_chain() {
        let options = RequestOptions::new()
            .method(Method::POST)
            .body(json!({ "qty": 2 }))
            .header("x-locale", "fa-IR")
            .timeout_ms(5_000)
            .retries(1)
            .use_auth(false);

        assert_eq!(options.method, Some(Method::POST));
        assert_eq!(options.headers.get("x-locale").unwrap(), "fa-IR");
        assert_eq!(options.timeout_ms, Some(5_000));
        assert_eq!(options.retries, Some(1));
        assert_eq!(options.use_auth, Some(false));
        assert!(options.use_cache.is_none());
    }

    #[test]
    fn test_request_ids_are_unique() {
        assert_ne!(new_request_id(), new_request_id());
    }
}
