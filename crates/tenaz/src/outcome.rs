//! Completion polling for fire-then-confirm UI operations.
//!
//! Uploads, saves, and deletes resolve through asynchronous UI signals: a
//! confirmation toast, an error toast, a spinner that keeps turning. A naive
//! fixed sleep either undershoots (flaky) or overshoots (slow). The poller
//! here watches for one of {success, failure} at a fixed cadence under a
//! hard deadline, tolerating arbitrarily long "busy" phases in between.
//!
//! The busy signal never terminates the wait and never extends the
//! deadline; it only confirms the operation is still in flight. Some target
//! UIs also need a physical nudge (scroll, key press) to keep rendering
//! progress; the optional nudge hook runs once per poll cycle in place of
//! the ad-hoc nudging page objects otherwise accumulate.

use crate::handle::ElementHandle;
use crate::wait::StatePredicate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{Duration, Instant};

/// Default overall deadline for completion polls (10 seconds)
pub const DEFAULT_OUTCOME_TIMEOUT_MS: u64 = 10_000;

/// Default polling cadence (100ms)
pub const DEFAULT_OUTCOME_POLL_MS: u64 = 100;

/// Terminal result of a completion poll
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    /// The success signal fired
    Success,
    /// The failure signal fired
    Failure,
    /// The deadline expired with neither terminal signal observed
    Timeout,
}

impl Outcome {
    /// Whether this is the success outcome
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }

    /// Whether this is a terminal failure (explicit failure signal)
    #[must_use]
    pub const fn is_failure(&self) -> bool {
        matches!(self, Self::Failure)
    }

    /// Whether the deadline expired
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout)
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success => write!(f, "success"),
            Self::Failure => write!(f, "failure"),
            Self::Timeout => write!(f, "timeout"),
        }
    }
}

/// A set of completion signals, consumed once by [`poll`](Self::poll).
///
/// Success is required; failure, busy, and the nudge side-effect are
/// optional. When success and failure happen to overlap in one cycle,
/// success wins deterministically (it is checked first).
pub struct CompletionSignals<'a> {
    success: Box<dyn Fn() -> bool + 'a>,
    failure: Option<Box<dyn Fn() -> bool + 'a>>,
    busy: Option<Box<dyn Fn() -> bool + 'a>>,
    nudge: Option<Box<dyn FnMut() + 'a>>,
    timeout: Duration,
    poll_interval: Duration,
}

impl fmt::Debug for CompletionSignals<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompletionSignals")
            .field("has_failure", &self.failure.is_some())
            .field("has_busy", &self.busy.is_some())
            .field("has_nudge", &self.nudge.is_some())
            .field("timeout", &self.timeout)
            .field("poll_interval", &self.poll_interval)
            .finish_non_exhaustive()
    }
}

impl<'a> CompletionSignals<'a> {
    /// Create a signal set with its success predicate
    #[must_use]
    pub fn new(success: impl Fn() -> bool + 'a) -> Self {
        Self {
            success: Box::new(success),
            failure: None,
            busy: None,
            nudge: None,
            timeout: Duration::from_millis(DEFAULT_OUTCOME_TIMEOUT_MS),
            poll_interval: Duration::from_millis(DEFAULT_OUTCOME_POLL_MS),
        }
    }

    /// Add a failure predicate (e.g., an error toast appeared)
    #[must_use]
    pub fn with_failure(mut self, failure: impl Fn() -> bool + 'a) -> Self {
        self.failure = Some(Box::new(failure));
        self
    }

    /// Add a busy predicate (e.g., an "uploading..." banner still visible)
    #[must_use]
    pub fn with_busy(mut self, busy: impl Fn() -> bool + 'a) -> Self {
        self.busy = Some(Box::new(busy));
        self
    }

    /// Add a side-effect run once per poll cycle (scroll nudge, key press)
    #[must_use]
    pub fn with_nudge(mut self, nudge: impl FnMut() + 'a) -> Self {
        self.nudge = Some(Box::new(nudge));
        self
    }

    /// Set the overall deadline
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the polling cadence
    #[must_use]
    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// Poll until a terminal signal fires or the deadline expires.
    ///
    /// Infallible by design: callers branch on the returned [`Outcome`]
    /// instead of catching errors, which keeps optional confirmations
    /// (an unreliable success toast) from failing a scenario outright.
    pub fn poll(mut self) -> Outcome {
        let start = Instant::now();

        loop {
            if let Some(nudge) = self.nudge.as_mut() {
                nudge();
            }
            if (self.success)() {
                tracing::debug!(elapsed_ms = start.elapsed().as_millis() as u64, "completion: success");
                return Outcome::Success;
            }
            if let Some(failure) = &self.failure {
                if failure() {
                    tracing::debug!(
                        elapsed_ms = start.elapsed().as_millis() as u64,
                        "completion: failure signal"
                    );
                    return Outcome::Failure;
                }
            }
            if let Some(busy) = &self.busy {
                if busy() {
                    // Still in flight; keeps polling but the deadline stands
                    tracing::trace!("completion: busy");
                }
            }
            if start.elapsed() >= self.timeout {
                tracing::debug!(
                    timeout_ms = self.timeout.as_millis() as u64,
                    "completion: deadline expired"
                );
                return Outcome::Timeout;
            }
            std::thread::sleep(self.poll_interval);
        }
    }
}

/// Adapt a handle + state predicate into a boolean signal for
/// [`CompletionSignals`]. Probe failures read as "signal not observed".
pub fn probe<'a>(
    handle: &'a ElementHandle<'a>,
    predicate: StatePredicate,
) -> impl Fn() -> bool + 'a {
    move || predicate.evaluate(handle).unwrap_or(false)
}
