//! Whole-call deadline enforcement and explicit cancellation.
//!
//! # Responsibilities
//! - Wrap a call future with its deadline
//! - Provide a per-call cancellation handle
//! - Map deadline expiry and cancellation to their error variants
//!
//! # Design Decisions
//! - One deadline covers the entire call: every attempt and every backoff
//!   wait. This matches the documented contract where a timed-out call is
//!   never resumed by a later retry.
//! - Cancellation aborts only its own call; other in-flight requests are
//!   unaffected.

use std::future::Future;
use std::time::Duration;

use futures_util::future::{AbortHandle, Abortable, Aborted};

use crate::error::{ApiError, ApiResult};

/// Handle that aborts one in-flight call.
#[derive(Debug, Clone)]
pub struct CancelHandle {
    inner: AbortHandle,
}

impl CancelHandle {
    /// Abort the associated call. The pending future resolves to
    /// [`ApiError::Cancelled`]. Idempotent.
    pub fn cancel(&self) {
        self.inner.abort();
    }

    /// Whether the call has been cancelled.
    pub fn is_cancelled(&self) -> bool {
        self.inner.is_aborted()
    }
}

/// Pair a future with a [`CancelHandle`] that can abort it.
pub fn cancellable<F: Future>(fut: F) -> (Abortable<F>, CancelHandle) {
    let (handle, registration) = AbortHandle::new_pair();
    (
        Abortable::new(fut, registration),
        CancelHandle { inner: handle },
    )
}

/// Run a call future under a deadline with an internal cancellation handle.
///
/// If `timeout_ms` elapses first, the in-flight future is dropped (which
/// aborts the underlying transport) and the call fails with
/// [`ApiError::Timeout`].
pub async fn run_with_deadline<F, T>(timeout_ms: u64, fut: F) -> ApiResult<T>
where
    F: Future<Output = ApiResult<T>>,
{
    let (abortable, handle) = cancellable(fut);
    match tokio::time::timeout(Duration::from_millis(timeout_ms), abortable).await {
        Ok(Ok(result)) => result,
        Ok(Err(Aborted)) => Err(ApiError::Cancelled),
        Err(_) => {
            handle.cancel();
            Err(ApiError::Timeout(timeout_ms))
        }
    }
}
