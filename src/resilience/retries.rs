//! Retry progression as an explicit state machine.
//!
//! # States
//! ```text
//! Idle → Attempting(0)
//! Attempting(n) → Succeeded                     on success
//! Attempting(n) → BackoffWait(n+1)              on transient failure, n < max_retries
//! Attempting(n) → FailedTerminal                on transient failure, n == max_retries
//! Attempting(n) → FailedTerminal                on terminal failure
//! BackoffWait(n) → Attempting(n)                after the delay elapses
//! ```
//!
//! Transitions depend only on the outcome class and the attempt count, so
//! the policy is testable without a network.

use std::time::Duration;

use crate::resilience::backoff::calculate_backoff;

/// Classification of a single attempt's result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptOutcome {
    /// The response was a success status.
    Success,
    /// 5xx, connection-level, or body decode failure; another attempt may
    /// succeed.
    Transient,
    /// 4xx or abort; retrying cannot help.
    Terminal,
}

/// Where a call currently is in its retry progression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryState {
    /// No attempt dispatched yet.
    Idle,
    /// Attempt `attempt` (0-indexed) is in flight.
    Attempting { attempt: u32 },
    /// Waiting out the backoff delay before `next_attempt`.
    BackoffWait { next_attempt: u32, delay: Duration },
    /// The call resolved with data.
    Succeeded,
    /// The call failed and will not be retried.
    FailedTerminal,
}

/// Retry policy for one call: how many retries, and the backoff base.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_delay_ms: u64,
}

impl RetryPolicy {
    /// Transition out of `Idle`: dispatch the initial attempt.
    pub fn begin(&self) -> RetryState {
        RetryState::Attempting { attempt: 0 }
    }

    /// Advance the machine after an attempt concludes.
    ///
    /// Terminal states are absorbing; `BackoffWait` advances through
    /// [`RetryPolicy::resume`] instead.
    pub fn next(&self, state: RetryState, outcome: AttemptOutcome) -> RetryState {
        match (state, outcome) {
            (RetryState::Idle, _) => self.begin(),
            (RetryState::Attempting { .. }, AttemptOutcome::Success) => RetryState::Succeeded,
            (RetryState::Attempting { attempt }, AttemptOutcome::Transient)
                if attempt < self.max_retries =>
            {
                let next_attempt = attempt + 1;
                RetryState::BackoffWait {
                    next_attempt,
                    delay: calculate_backoff(next_attempt, self.base_delay_ms),
                }
            }
            (RetryState::Attempting { .. }, AttemptOutcome::Transient) => {
                RetryState::FailedTerminal
            }
            (RetryState::Attempting { .. }, AttemptOutcome::Terminal) => RetryState::FailedTerminal,
            (state, _) => state,
        }
    }

    /// Transition out of `BackoffWait` once its delay has been slept.
    pub fn resume(&self, state: RetryState) -> RetryState {
        match state {
            RetryState::BackoffWait { next_attempt, .. } => RetryState::Attempting {
                attempt: next_attempt,
            },
            other => other,
        }
    }
}
