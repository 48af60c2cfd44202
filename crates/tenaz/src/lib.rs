//! Tenaz: resilient element interaction for UI test automation.
//!
//! Tenaz (Spanish: "tenacious") sits between scenario code and a raw
//! browser-automation driver, turning flaky single-shot DOM calls into
//! bounded, observable interactions: fallback selector chains, re-resolving
//! element handles, stateful waits with hard/soft modes, retried actions,
//! and completion polling for fire-then-confirm operations.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                     TENAZ Architecture                          │
//! ├─────────────────────────────────────────────────────────────────┤
//! │   ┌────────────┐    ┌──────────────┐    ┌────────────┐          │
//! │   │ Scenario   │    │ Session      │    │ Driver     │          │
//! │   │ code       │───►│ resolve/wait │───►│ (CDP, mock,│          │
//! │   │ (external) │    │ retry/poll   │    │  bridge)   │          │
//! │   └────────────┘    └──────────────┘    └────────────┘          │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Everything between the scenario and the driver is synchronous
//! cooperative polling with explicit timeouts; one session per driver
//! context, nothing shared across sessions.
//!
//! # Example
//!
//! ```
//! use tenaz::{
//!     FallbackChain, MockDriver, MockElement, Selector, Session, WaitMode,
//! };
//!
//! let driver = MockDriver::new();
//! driver.add_element(MockElement::new("login").matched_by(Selector::css(".login-btn")));
//!
//! let session = Session::new(&driver);
//! let button = session
//!     .resolve(
//!         &FallbackChain::new(Selector::role("button", "Login"))
//!             .or(Selector::css(".login-btn")),
//!     )
//!     .unwrap();
//! assert!(session.wait_visible(&button, WaitMode::Hard).unwrap());
//! session.click_with_retry(&button).unwrap();
//! ```

#![warn(missing_docs)]

/// Session-level configuration defaults
mod config;
/// Abstract driver capability and the in-crate mock
mod driver;
/// Re-resolvable element handles
mod handle;
/// Completion polling for fire-then-confirm operations
mod outcome;
/// Page object support
mod page;
/// Error taxonomy
mod result;
/// Bounded retry for transient action failures
mod retry;
/// Selector strategies and fallback chains
mod selector;
/// The session façade exposed to scenario code
mod session;
/// URL matching for navigation waits
mod url;
/// Stateful waits with hard/soft modes
mod wait;

pub use config::{InteractionConfig, DEFAULT_NAVIGATION_TIMEOUT_MS};
pub use driver::{Driver, MockDriver, MockElement, NodeId};
pub use handle::ElementHandle;
pub use outcome::{
    probe, CompletionSignals, Outcome, DEFAULT_OUTCOME_POLL_MS, DEFAULT_OUTCOME_TIMEOUT_MS,
};
pub use page::{PageObject, PageRegistry};
pub use result::{TenazError, TenazResult};
pub use retry::{perform, RetryPolicy, RetryReport, DEFAULT_DELAY_MS, DEFAULT_MAX_ATTEMPTS};
pub use selector::{FallbackChain, Selector};
pub use session::Session;
pub use url::UrlPattern;
pub use wait::{
    wait, wait_report, StatePredicate, WaitMode, WaitOptions, WaitReport,
    DEFAULT_POLL_INTERVAL_MS, DEFAULT_TIMEOUT_MS,
};
