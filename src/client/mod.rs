//! The resilient request client.
//!
//! # Data Flow
//! ```text
//! request(endpoint, options):
//!     → prepare (resolve defaults, URL, headers, cache key)
//!     → cache lookup (GET within TTL: return without dispatch)
//!     → deadline + cancellation wrapper (timeouts.rs)
//!     → attempt loop driven by the retry state machine (retries.rs)
//!         → dispatch → status triage → decode
//!     → cache store (cacheable GET success)
//! ```
//!
//! # Design Decisions
//! - 401/403 publish an auth event and never retry
//! - 5xx and connection failures retry with linear backoff
//! - The cache, token store, and event channel are injectable, so clients
//!   can share or isolate them

pub mod upload;

use std::collections::HashMap;
use std::time::{Duration, Instant};

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::Method;
use serde_json::Value;
use url::Url;

use crate::auth::TokenStore;
use crate::cache::{cache_key, ResponseCache};
use crate::config::loader::{self, ConfigError};
use crate::config::schema::ClientConfig;
use crate::config::validation::validate_config;
use crate::error::{ApiError, ApiResult};
use crate::events::{AuthEvent, AuthEvents};
use crate::http::request::{
    new_request_id, RequestOptions, HEADER_REQUEST_ID, HEADER_RETRY_ATTEMPT,
};
use crate::http::response::{decode_response, ResponseData};
use crate::observability::metrics;
use crate::resilience::retries::{AttemptOutcome, RetryPolicy, RetryState};
use crate::resilience::timeouts::run_with_deadline;

/// Resilient HTTP client for the storefront API.
///
/// Cloning is cheap and produces a handle sharing the same connection pool,
/// cache, token store, and event channel.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    config: ClientConfig,
    cache: ResponseCache,
    tokens: TokenStore,
    events: AuthEvents,
}

/// One call, fully resolved against the client configuration.
struct PreparedCall {
    url: String,
    method: Method,
    headers: HeaderMap,
    body_text: Option<String>,
    timeout_ms: u64,
    policy: RetryPolicy,
    /// Present when cache reads are enabled for this call.
    cache_key: Option<String>,
    /// Whether a successful response may be stored.
    cache_store: bool,
    request_id: String,
}

impl ApiClient {
    /// Create a client from a validated configuration.
    pub fn new(config: ClientConfig) -> Result<Self, ConfigError> {
        validate_config(&config).map_err(ConfigError::Validation)?;

        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_millis(config.timeouts.connect_ms))
            .build()?;

        let cache = ResponseCache::new(Duration::from_millis(config.cache.ttl_ms));

        tracing::debug!(
            base_url = %config.base_url,
            request_timeout_ms = config.timeouts.request_ms,
            max_retries = config.retries.max_retries,
            cache_ttl_ms = config.cache.ttl_ms,
            "API client initialized"
        );

        Ok(Self {
            http,
            config,
            cache,
            tokens: TokenStore::new(),
            events: AuthEvents::new(),
        })
    }

    /// Create a client from defaults plus environment overrides.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::new(loader::from_env())
    }

    /// Replace the response cache, e.g. to share one across clients.
    pub fn with_cache(mut self, cache: ResponseCache) -> Self {
        self.cache = cache;
        self
    }

    /// Replace the token store, e.g. with the cell the authentication
    /// collaborator writes to.
    pub fn with_token_store(mut self, tokens: TokenStore) -> Self {
        self.tokens = tokens;
        self
    }

    /// The client configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// The response cache.
    pub fn cache(&self) -> &ResponseCache {
        &self.cache
    }

    /// The session token store (read by this client, written elsewhere).
    pub fn token_store(&self) -> &TokenStore {
        &self.tokens
    }

    /// Subscribe to 401/403 signals.
    pub fn subscribe_auth_events(&self) -> tokio::sync::broadcast::Receiver<AuthEvent> {
        self.events.subscribe()
    }

    /// Clear one cache key, or the entire cache when `key` is `None`.
    pub fn clear_cache(&self, key: Option<&str>) {
        match key {
            Some(key) => self.cache.invalidate(key),
            None => self.cache.clear(),
        }
    }

    /// Issue a request.
    ///
    /// Relative endpoints are joined onto the configured base URL; absolute
    /// URLs pass through unchanged. See [`RequestOptions`] for the per-call
    /// knobs and their defaults.
    pub async fn request(
        &self,
        endpoint: &str,
        options: RequestOptions,
    ) -> ApiResult<ResponseData> {
        let call = self.prepare(endpoint, options)?;

        if let Some(key) = &call.cache_key {
            if let Some(data) = self.cache.get(key) {
                tracing::debug!(
                    request_id = %call.request_id,
                    key = %key,
                    "Cache hit, skipping dispatch"
                );
                return Ok(data);
            }
        }

        let timeout_ms = call.timeout_ms;
        run_with_deadline(timeout_ms, self.execute(call)).await
    }

    /// GET convenience wrapper.
    pub async fn get(&self, endpoint: &str, options: RequestOptions) -> ApiResult<ResponseData> {
        self.request(endpoint, options.method(Method::GET)).await
    }

    /// POST convenience wrapper.
    pub async fn post(
        &self,
        endpoint: &str,
        body: Value,
        options: RequestOptions,
    ) -> ApiResult<ResponseData> {
        self.request(endpoint, options.method(Method::POST).body(body))
            .await
    }

    /// PUT convenience wrapper.
    pub async fn put(
        &self,
        endpoint: &str,
        body: Value,
        options: RequestOptions,
    ) -> ApiResult<ResponseData> {
        self.request(endpoint, options.method(Method::PUT).body(body))
            .await
    }

    /// PATCH convenience wrapper.
    pub async fn patch(
        &self,
        endpoint: &str,
        body: Value,
        options: RequestOptions,
    ) -> ApiResult<ResponseData> {
        self.request(endpoint, options.method(Method::PATCH).body(body))
            .await
    }

    /// DELETE convenience wrapper.
    pub async fn delete(&self, endpoint: &str, options: RequestOptions) -> ApiResult<ResponseData> {
        self.request(endpoint, options.method(Method::DELETE)).await
    }

    /// Resolve per-call options against the configuration.
    fn prepare(&self, endpoint: &str, options: RequestOptions) -> ApiResult<PreparedCall> {
        let method = options.method.clone().unwrap_or(Method::GET);
        let use_cache =
            options.use_cache.unwrap_or(method == Method::GET) && self.config.cache.enabled;
        let use_auth = options.use_auth.unwrap_or(true);

        let url = resolve_url(&self.config.base_url, endpoint)?;

        let body_text = match &options.body {
            Some(body) => Some(serde_json::to_string(body).map_err(ApiError::Decode)?),
            None => None,
        };

        let cache_key = use_cache.then(|| cache_key(&method, endpoint, body_text.as_deref()));
        let cache_store = use_cache && is_cacheable(&method, &options.headers);

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        for (name, value) in &options.headers {
            let header_name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|_| ApiError::InvalidHeader(name.clone()))?;
            let header_value = HeaderValue::from_str(value)
                .map_err(|_| ApiError::InvalidHeader(name.clone()))?;
            headers.insert(header_name, header_value);
        }
        if use_auth {
            if let Some(token) = self.tokens.get() {
                let bearer = format!("Bearer {}", token);
                let value = HeaderValue::from_str(&bearer)
                    .map_err(|_| ApiError::InvalidHeader("authorization".to_string()))?;
                headers.insert(AUTHORIZATION, value);
            }
        }

        let request_id = new_request_id();
        if let Ok(value) = HeaderValue::from_str(&request_id) {
            headers.insert(HEADER_REQUEST_ID, value);
        }

        Ok(PreparedCall {
            url,
            method,
            headers,
            body_text,
            timeout_ms: options.timeout_ms.unwrap_or(self.config.timeouts.request_ms),
            policy: RetryPolicy {
                max_retries: options.retries.unwrap_or(self.config.retries.max_retries),
                base_delay_ms: options
                    .retry_delay_ms
                    .unwrap_or(self.config.retries.base_delay_ms),
            },
            cache_key,
            cache_store,
            request_id,
        })
    }

    /// Attempt loop: dispatch, triage, back off, until the state machine
    /// reaches a terminal state.
    async fn execute(&self, call: PreparedCall) -> ApiResult<ResponseData> {
        let start = Instant::now();
        let mut attempt = 0u32;

        loop {
            match self.attempt(&call, attempt).await {
                Ok((status, data)) => {
                    if call.cache_store {
                        if let Some(key) = &call.cache_key {
                            self.cache.insert(key.clone(), data.clone());
                        }
                    }
                    metrics::record_request(call.method.as_str(), status, start);
                    tracing::debug!(
                        request_id = %call.request_id,
                        status = status,
                        attempt = attempt,
                        "Request succeeded"
                    );
                    return Ok(data);
                }
                Err(err) => {
                    let outcome = if err.is_retryable() {
                        AttemptOutcome::Transient
                    } else {
                        AttemptOutcome::Terminal
                    };

                    match call
                        .policy
                        .next(RetryState::Attempting { attempt }, outcome)
                    {
                        RetryState::BackoffWait {
                            next_attempt,
                            delay,
                        } => {
                            tracing::warn!(
                                request_id = %call.request_id,
                                attempt = attempt,
                                delay_ms = delay.as_millis() as u64,
                                error = %err,
                                "Retrying after transient failure"
                            );
                            metrics::record_retry(call.method.as_str());
                            tokio::time::sleep(delay).await;
                            attempt = next_attempt;
                        }
                        _ => {
                            tracing::error!(
                                request_id = %call.request_id,
                                attempt = attempt,
                                error = %err,
                                "Request failed"
                            );
                            metrics::record_request(
                                call.method.as_str(),
                                err.status().unwrap_or(0),
                                start,
                            );
                            return Err(err);
                        }
                    }
                }
            }
        }
    }

    /// One dispatch: send, triage the status, decode on success.
    async fn attempt(&self, call: &PreparedCall, attempt: u32) -> ApiResult<(u16, ResponseData)> {
        let mut headers = call.headers.clone();
        if attempt > 0 {
            headers.insert(HEADER_RETRY_ATTEMPT, HeaderValue::from(attempt));
        }

        tracing::debug!(
            request_id = %call.request_id,
            method = %call.method,
            url = %call.url,
            attempt = attempt,
            "Dispatching request"
        );

        let mut request = self.http.request(call.method.clone(), &call.url).headers(headers);
        if call.method != Method::GET {
            if let Some(body) = &call.body_text {
                request = request.body(body.clone());
            }
        }

        let response = request.send().await?;
        let status = response.status();

        if status.is_success() {
            let data = decode_response(response).await?;
            return Ok((status.as_u16(), data));
        }

        let payload: Option<Value> = response.json().await.ok();
        let err = ApiError::from_status(status.as_u16(), payload);
        self.publish_auth_failure(&err);
        Err(err)
    }

    /// Publish the auth event matching a 401/403 error, if any.
    pub(crate) fn publish_auth_failure(&self, err: &ApiError) {
        match err {
            ApiError::AuthRequired { .. } => self.events.publish(AuthEvent::Required),
            ApiError::Forbidden { .. } => self.events.publish(AuthEvent::Forbidden),
            _ => {}
        }
    }

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.http
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.config.base_url)
            .field("cache_entries", &self.cache.len())
            .finish()
    }
}

/// Join a relative endpoint onto the base URL; absolute URLs pass through.
pub(crate) fn resolve_url(base: &str, endpoint: &str) -> ApiResult<String> {
    let url = if endpoint.starts_with("http") {
        endpoint.to_string()
    } else {
        format!("{}{}", base, endpoint)
    };
    Url::parse(&url).map_err(|e| ApiError::Url(url.clone(), e.to_string()))?;
    Ok(url)
}

/// Whether a successful response may be stored: GET only, and not when the
/// caller asked for `no-cache` semantics.
fn is_cacheable(method: &Method, headers: &HashMap<String, String>) -> bool {
    if *method != Method::GET {
        return false;
    }
    !headers.iter().any(|(name, value)| {
        name.eq_ignore_ascii_case("cache-control")
            && value.to_ascii_lowercase().contains("no-cache")
    })
}
