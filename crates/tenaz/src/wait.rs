//! Stateful wait mechanisms.
//!
//! Polls a [`StatePredicate`] against a re-resolved [`ElementHandle`] until
//! it holds or the timeout elapses. Two modes: hard waits error with
//! [`TenazError::WaitTimeout`] and are used for required preconditions; soft
//! waits return `false` and back optional, defensive checks ("dismiss this
//! banner if present") that must never fail a scenario on their own.

use crate::handle::ElementHandle;
use crate::result::{TenazError, TenazResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{Duration, Instant};

/// Default timeout for element waits (5 seconds)
pub const DEFAULT_TIMEOUT_MS: u64 = 5_000;

/// Default polling interval (50ms)
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 50;

/// Element state a wait can poll for
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatePredicate {
    /// Node is rendered and visible
    Visible,
    /// Node is invisible or no longer matches anything
    Hidden,
    /// Node accepts interaction
    Enabled,
    /// Checkbox/radio node is checked
    Checked,
    /// Attribute `name` equals `value`
    AttributeEquals {
        /// Attribute name
        name: String,
        /// Expected value
        value: String,
    },
    /// At least `n` nodes match
    CountAtLeast(usize),
    /// Exactly `n` nodes match
    CountExactly(usize),
}

impl StatePredicate {
    /// Evaluate the predicate against a handle, re-resolving the query.
    ///
    /// # Errors
    ///
    /// Propagates probe failures; the polling loop treats those as
    /// "not yet satisfied" rather than surfacing them.
    pub fn evaluate(&self, handle: &ElementHandle<'_>) -> TenazResult<bool> {
        match self {
            Self::Visible => handle.is_visible(),
            Self::Hidden => match handle.is_visible() {
                Ok(visible) => Ok(!visible),
                // A node that matches nothing anymore counts as hidden
                Err(err) if err.is_not_found() => Ok(true),
                Err(err) => Err(err),
            },
            Self::Enabled => handle.is_enabled(),
            Self::Checked => handle.is_checked(),
            Self::AttributeEquals { name, value } => Ok(handle
                .attribute(name)?
                .is_some_and(|actual| actual == *value)),
            Self::CountAtLeast(n) => Ok(handle.count()? >= *n),
            Self::CountExactly(n) => Ok(handle.count()? == *n),
        }
    }
}

impl fmt::Display for StatePredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Visible => write!(f, "visible"),
            Self::Hidden => write!(f, "hidden"),
            Self::Enabled => write!(f, "enabled"),
            Self::Checked => write!(f, "checked"),
            Self::AttributeEquals { name, value } => {
                write!(f, "attribute {name}={value:?}")
            }
            Self::CountAtLeast(n) => write!(f, "count >= {n}"),
            Self::CountExactly(n) => write!(f, "count == {n}"),
        }
    }
}

/// How a failed wait is reported
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum WaitMode {
    /// Error with [`TenazError::WaitTimeout`] — required preconditions
    #[default]
    Hard,
    /// Return `false` — optional and defensive checks
    Soft,
}

/// Options for wait operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaitOptions {
    /// Overall timeout
    pub timeout: Duration,
    /// Polling cadence
    pub poll_interval: Duration,
}

impl Default for WaitOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
        }
    }
}

impl WaitOptions {
    /// Create options with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the overall timeout
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the polling cadence
    #[must_use]
    pub const fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// Single-probe options: check once, no polling
    #[must_use]
    pub const fn immediate() -> Self {
        Self {
            timeout: Duration::ZERO,
            poll_interval: Duration::ZERO,
        }
    }
}

/// Outcome details of a completed wait
#[derive(Debug, Clone, Copy)]
pub struct WaitReport {
    /// Whether the predicate was satisfied before the deadline
    pub satisfied: bool,
    /// Time spent polling
    pub elapsed: Duration,
    /// Number of probes issued
    pub polls: u32,
}

/// Poll `predicate` against `handle` until it holds or `options.timeout`
/// elapses, returning the boolean outcome.
///
/// A query that never matches still consumes the full timeout: callers rely
/// on eventual appearance, so probe failures (no match yet, ambiguous match,
/// transient driver faults) count as "not yet satisfied".
///
/// # Errors
///
/// [`TenazError::WaitTimeout`] in hard mode when the deadline expires.
pub fn wait(
    handle: &ElementHandle<'_>,
    predicate: &StatePredicate,
    options: &WaitOptions,
    mode: WaitMode,
) -> TenazResult<bool> {
    wait_report(handle, predicate, options, mode).map(|report| report.satisfied)
}

/// [`wait`], but returning elapsed-time and probe-count diagnostics.
///
/// # Errors
///
/// [`TenazError::WaitTimeout`] in hard mode when the deadline expires.
pub fn wait_report(
    handle: &ElementHandle<'_>,
    predicate: &StatePredicate,
    options: &WaitOptions,
    mode: WaitMode,
) -> TenazResult<WaitReport> {
    let start = Instant::now();
    let mut polls = 0u32;

    loop {
        polls += 1;
        let satisfied = match predicate.evaluate(handle) {
            Ok(satisfied) => satisfied,
            Err(err) => {
                tracing::trace!(
                    target = %handle.describe(),
                    probe_error = %err,
                    "probe failed, continuing to poll"
                );
                false
            }
        };
        if satisfied {
            return Ok(WaitReport {
                satisfied: true,
                elapsed: start.elapsed(),
                polls,
            });
        }
        if start.elapsed() >= options.timeout {
            break;
        }
        std::thread::sleep(options.poll_interval);
    }

    let elapsed = start.elapsed();
    match mode {
        WaitMode::Hard => Err(TenazError::WaitTimeout {
            condition: predicate.to_string(),
            descriptor: handle.describe(),
            timeout_ms: options.timeout.as_millis() as u64,
        }),
        WaitMode::Soft => {
            tracing::warn!(
                target = %handle.describe(),
                condition = %predicate,
                elapsed_ms = elapsed.as_millis() as u64,
                "soft wait expired"
            );
            Ok(WaitReport {
                satisfied: false,
                elapsed,
                polls,
            })
        }
    }
}
