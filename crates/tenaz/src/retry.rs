//! Bounded retry for transient DOM-action failures.
//!
//! UI animations and overlays make clicks fail non-deterministically: the
//! node detaches, another layer intercepts the pointer, the element is not
//! yet interactable. A bounded retry with a fixed inter-attempt delay
//! absorbs those without hiding persistent faults. The executor does not
//! roll back partially-applied actions; that limitation is inherent to the
//! domain, not solved here.

use crate::result::{TenazError, TenazResult};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// Default number of attempts
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Default delay between attempts (100ms)
pub const DEFAULT_DELAY_MS: u64 = 100;

/// Immutable retry parameters: total attempts and inter-attempt delay.
///
/// `max_attempts` counts every try including the first; values below 1 are
/// treated as 1 at execution time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Maximum attempts, first try included (>= 1)
    pub max_attempts: u32,
    /// Fixed delay between attempts
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            delay: Duration::from_millis(DEFAULT_DELAY_MS),
        }
    }
}

impl RetryPolicy {
    /// Create a policy with `max_attempts` and the default delay
    #[must_use]
    pub const fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            delay: Duration::from_millis(DEFAULT_DELAY_MS),
        }
    }

    /// Set the inter-attempt delay
    #[must_use]
    pub const fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Single attempt, no delay
    #[must_use]
    pub const fn once() -> Self {
        Self {
            max_attempts: 1,
            delay: Duration::ZERO,
        }
    }

    /// Short bursts for fast-settling UIs
    #[must_use]
    pub const fn fast() -> Self {
        Self {
            max_attempts: 3,
            delay: Duration::from_millis(25),
        }
    }

    /// Patient retries for slow-settling UIs
    #[must_use]
    pub const fn slow() -> Self {
        Self {
            max_attempts: 5,
            delay: Duration::from_millis(500),
        }
    }
}

/// Diagnostics from a successful retried action
#[derive(Debug, Clone, Copy)]
pub struct RetryReport {
    /// Attempts made before success (1 = first try worked)
    pub attempts: u32,
    /// Total time spent, delays included
    pub elapsed: Duration,
}

/// Run `action` up to `policy.max_attempts` times, sleeping `policy.delay`
/// between attempts, swallowing failures until attempts exhaust.
///
/// `action_name` labels the operation in diagnostics ("click .login-btn").
///
/// # Errors
///
/// [`TenazError::ActionFailed`] carrying the attempt count and the last
/// underlying failure once every attempt has failed.
pub fn perform<F>(action_name: &str, policy: RetryPolicy, mut action: F) -> TenazResult<RetryReport>
where
    F: FnMut() -> TenazResult<()>,
{
    let start = Instant::now();
    let attempts_allowed = policy.max_attempts.max(1);
    let mut last_error = String::new();

    for attempt in 1..=attempts_allowed {
        match action() {
            Ok(()) => {
                if attempt > 1 {
                    tracing::debug!(
                        action = action_name,
                        attempt,
                        "action succeeded after retry"
                    );
                }
                return Ok(RetryReport {
                    attempts: attempt,
                    elapsed: start.elapsed(),
                });
            }
            Err(err) => {
                tracing::debug!(
                    action = action_name,
                    attempt,
                    of = attempts_allowed,
                    error = %err,
                    "attempt failed"
                );
                last_error = err.to_string();
            }
        }
        if attempt < attempts_allowed {
            std::thread::sleep(policy.delay);
        }
    }

    Err(TenazError::ActionFailed {
        action: action_name.to_string(),
        attempts: attempts_allowed,
        last_error,
    })
}
