//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! One API call:
//!     → timeouts.rs (whole-call deadline + cancellation handle)
//!     → retries.rs (attempt state machine: retry transient failures)
//!     → backoff.rs (linear delay between attempts)
//! ```
//!
//! # Design Decisions
//! - The deadline bounds the whole call, attempts and backoff waits included
//! - Only 5xx and connection failures are retried; aborts and sub-500
//!   statuses are terminal
//! - Backoff is linear (`base * attempt`), deterministic, no jitter
//! - Retry progression is an explicit state machine, testable without a
//!   network

pub mod backoff;
pub mod retries;
pub mod timeouts;

pub use backoff::calculate_backoff;
pub use retries::{AttemptOutcome, RetryPolicy, RetryState};
pub use timeouts::{cancellable, run_with_deadline, CancelHandle};
