//! Error taxonomy for API calls.
//!
//! Every failure surfaces as an [`ApiError`] carrying the HTTP status (when
//! one was received) and the server's structured error payload (when the
//! server returned JSON). Nothing is silently swallowed: the retry loop is
//! the only place an error is locally recovered, and once attempts are
//! exhausted the last error is returned to the caller.

use serde_json::Value;
use thiserror::Error;

/// Errors that can occur during an API call.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The call (including retries) did not complete before its deadline.
    #[error("request timed out after {0} ms")]
    Timeout(u64),

    /// The call was cancelled through its cancellation handle.
    #[error("request cancelled")]
    Cancelled,

    /// The server rejected the call with 401 Unauthorized.
    #[error("{message}")]
    AuthRequired {
        message: String,
        payload: Option<Value>,
    },

    /// The server rejected the call with 403 Forbidden.
    #[error("{message}")]
    Forbidden {
        message: String,
        payload: Option<Value>,
    },

    /// A non-retryable client error (4xx other than 401/403).
    #[error("{message}")]
    Client {
        status: u16,
        message: String,
        payload: Option<Value>,
    },

    /// A server error (5xx) that survived the retry budget.
    #[error("{message}")]
    Server {
        status: u16,
        message: String,
        payload: Option<Value>,
    },

    /// Connection-level failure before an HTTP status was received.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The endpoint or base URL could not be parsed.
    #[error("invalid URL '{0}': {1}")]
    Url(String, String),

    /// A caller-supplied header name or value was not valid HTTP.
    #[error("invalid header '{0}'")]
    InvalidHeader(String),

    /// The response body could not be decoded as its declared content type.
    #[error("failed to decode response body: {0}")]
    Decode(#[source] serde_json::Error),

    /// The caller expected a JSON body but the response was text or binary.
    #[error("expected a JSON response body")]
    ExpectedJson,
}

/// Result type for API operations.
pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    /// Build the error for a non-success HTTP status.
    ///
    /// The display message is the server payload's `message` field when the
    /// body was parseable JSON, otherwise a generic `API error: <status>`.
    pub fn from_status(status: u16, payload: Option<Value>) -> Self {
        let message = payload_message(payload.as_ref(), status);
        match status {
            401 => ApiError::AuthRequired { message, payload },
            403 => ApiError::Forbidden { message, payload },
            s if s >= 500 => ApiError::Server {
                status: s,
                message,
                payload,
            },
            s => ApiError::Client {
                status: s,
                message,
                payload,
            },
        }
    }

    /// The HTTP status associated with this error, if one was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::AuthRequired { .. } => Some(401),
            ApiError::Forbidden { .. } => Some(403),
            ApiError::Client { status, .. } | ApiError::Server { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// The server's structured error payload, if it returned JSON.
    pub fn payload(&self) -> Option<&Value> {
        match self {
            ApiError::AuthRequired { payload, .. }
            | ApiError::Forbidden { payload, .. }
            | ApiError::Client { payload, .. }
            | ApiError::Server { payload, .. } => payload.as_ref(),
            _ => None,
        }
    }

    /// Whether another attempt may succeed.
    ///
    /// Aborts and anything carrying a sub-500 status are terminal;
    /// everything else (5xx, connection failures, truncated or malformed
    /// success bodies) is presumed transient.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ApiError::Server { .. } | ApiError::Network(_) | ApiError::Decode(_)
        )
    }
}

fn payload_message(payload: Option<&Value>, status: u16) -> String {
    payload
        .and_then(|v| v.get("message"))
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| format!("API error: {}", status))
}
