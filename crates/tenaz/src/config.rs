//! Interaction-layer configuration.
//!
//! Session-level defaults for waits, retries, and navigation. There is no
//! file or CLI surface here; the embedding test runner owns where these
//! values come from and passes them in.

use crate::retry::RetryPolicy;
use crate::wait::WaitOptions;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default timeout for navigation waits (30 seconds)
pub const DEFAULT_NAVIGATION_TIMEOUT_MS: u64 = 30_000;

/// Defaults applied by a session when the caller does not override per call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InteractionConfig {
    /// Element wait defaults
    pub wait: WaitOptions,
    /// Action retry defaults
    pub retry: RetryPolicy,
    /// Navigation wait defaults (slower budget than element waits)
    pub navigation: WaitOptions,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            wait: WaitOptions::default(),
            retry: RetryPolicy::default(),
            navigation: WaitOptions::new()
                .with_timeout(Duration::from_millis(DEFAULT_NAVIGATION_TIMEOUT_MS))
                .with_poll_interval(Duration::from_millis(100)),
        }
    }
}

impl InteractionConfig {
    /// Create a config with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set element wait defaults
    #[must_use]
    pub const fn with_wait(mut self, wait: WaitOptions) -> Self {
        self.wait = wait;
        self
    }

    /// Set retry defaults
    #[must_use]
    pub const fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Set navigation wait defaults
    #[must_use]
    pub const fn with_navigation(mut self, navigation: WaitOptions) -> Self {
        self.navigation = navigation;
        self
    }
}
