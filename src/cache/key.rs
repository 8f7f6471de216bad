//! Deterministic cache key derivation.

use reqwest::Method;

/// Build the cache key for a request.
///
/// The key is `method:endpoint:serialized-body`, with an empty body segment
/// when the request has no body. Identical (method, endpoint, body)
/// combinations always map to the same key.
pub fn cache_key(method: &Method, endpoint: &str, body: Option<&str>) -> String {
    format!("{}:{}:{}", method, endpoint, body.unwrap_or(""))
}
