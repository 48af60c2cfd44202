//! Result and error types for Tenaz.

use thiserror::Error;

/// Result type for Tenaz operations
pub type TenazResult<T> = Result<T, TenazError>;

/// Errors that can occur in Tenaz
#[derive(Debug, Error)]
pub enum TenazError {
    /// No lookup strategy matched any node
    #[error("no element matched {descriptor}")]
    ElementNotFound {
        /// Description of the strategy (or strategy chain) attempted
        descriptor: String,
    },

    /// A single-node operation hit more than one match without `first()`/`nth()`
    #[error("{count} elements matched {descriptor}; pick one with first() or nth()")]
    AmbiguousMatch {
        /// Description of the strategy attempted
        descriptor: String,
        /// Number of nodes that matched
        count: usize,
    },

    /// A hard-mode wait's predicate never became true within its timeout
    #[error("waiting for {condition} on {descriptor} timed out after {timeout_ms}ms")]
    WaitTimeout {
        /// The state predicate that was polled
        condition: String,
        /// Description of the target element
        descriptor: String,
        /// Configured timeout in milliseconds
        timeout_ms: u64,
    },

    /// All retry attempts of a DOM action failed
    #[error("{action} failed after {attempts} attempt(s): {last_error}")]
    ActionFailed {
        /// The action that was retried
        action: String,
        /// Number of attempts made
        attempts: u32,
        /// The last underlying failure, kept for diagnostics
        last_error: String,
    },

    /// Navigation request failed
    #[error("navigation to {url} failed: {message}")]
    NavigationFailed {
        /// URL that failed to load
        url: String,
        /// Error message
        message: String,
    },

    /// Fault reported by the underlying automation driver
    #[error("driver error: {message}")]
    Driver {
        /// Error message
        message: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl TenazError {
    /// Shorthand for a driver fault
    #[must_use]
    pub fn driver(message: impl Into<String>) -> Self {
        Self::Driver {
            message: message.into(),
        }
    }

    /// True when the error means "nothing matched right now" — the retriable
    /// flavor waits poll through rather than surface.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::ElementNotFound { .. })
    }
}
