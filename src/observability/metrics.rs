//! Metric recording.
//!
//! # Metrics
//! - `api_requests_total` (counter): finished calls by method, status
//! - `api_request_duration_seconds` (histogram): whole-call latency
//! - `api_retries_total` (counter): retry attempts by method
//! - `api_cache_hits_total` / `api_cache_misses_total` (counters)
//! - `api_cache_entries` (gauge): current cache size
//! - `api_auth_events_total` (counter): 401/403 signals by kind
//!
//! All functions are cheap no-ops until the embedding application installs
//! a recorder.

use std::time::Instant;

use metrics::{counter, gauge, histogram};

/// Record a finished call with its final status.
pub fn record_request(method: &str, status: u16, start: Instant) {
    counter!(
        "api_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string(),
    )
    .increment(1);
    histogram!("api_request_duration_seconds").record(start.elapsed().as_secs_f64());
}

/// Record one retry attempt.
pub fn record_retry(method: &str) {
    counter!("api_retries_total", "method" => method.to_string()).increment(1);
}

/// Record a cache lookup that returned a live entry.
pub fn record_cache_hit() {
    counter!("api_cache_hits_total").increment(1);
}

/// Record a cache lookup that missed or hit an expired entry.
pub fn record_cache_miss() {
    counter!("api_cache_misses_total").increment(1);
}

/// Record the current number of cache entries.
pub fn record_cache_size(len: usize) {
    gauge!("api_cache_entries").set(len as f64);
}

/// Record an authentication signal (401/403).
pub fn record_auth_event(kind: &'static str) {
    counter!("api_auth_events_total", "kind" => kind).increment(1);
}
