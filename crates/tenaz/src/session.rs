//! Session façade: the calling convention test code sees.
//!
//! A session wraps one driver context and composes the layer's pieces —
//! fallback resolution, stateful waits, retried actions, completion polling,
//! navigation — applying configured defaults. One session per driver
//! context; sessions share nothing, so cross-actor flows (a creator context
//! and a fan context side by side) stay isolated by construction.

use crate::config::InteractionConfig;
use crate::driver::Driver;
use crate::handle::ElementHandle;
use crate::outcome::{CompletionSignals, Outcome};
use crate::result::{TenazError, TenazResult};
use crate::retry::{perform, RetryPolicy, RetryReport};
use crate::selector::{FallbackChain, Selector};
use crate::url::UrlPattern;
use crate::wait::{wait, StatePredicate, WaitMode, WaitOptions};
use std::fmt;
use std::time::Instant;

/// Interaction session over a single driver context
pub struct Session<'d> {
    driver: &'d dyn Driver,
    config: InteractionConfig,
}

impl fmt::Debug for Session<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl<'d> Session<'d> {
    /// Create a session with default configuration
    #[must_use]
    pub fn new(driver: &'d dyn Driver) -> Self {
        Self::with_config(driver, InteractionConfig::default())
    }

    /// Create a session with explicit configuration
    #[must_use]
    pub fn with_config(driver: &'d dyn Driver, config: InteractionConfig) -> Self {
        Self { driver, config }
    }

    /// The session's configured defaults
    #[must_use]
    pub const fn config(&self) -> &InteractionConfig {
        &self.config
    }

    /// Build a handle for a single selector
    #[must_use]
    pub fn handle(&self, selector: Selector) -> ElementHandle<'d> {
        ElementHandle::new(self.driver, selector)
    }

    /// Resolve a fallback chain to a handle: single pass, front to back,
    /// first strategy with at least one match wins. No waits or retries
    /// happen here; layer those on the returned handle.
    ///
    /// A strategy whose query itself faults is skipped like a miss — the
    /// chain exists to survive exactly that kind of churn.
    ///
    /// # Errors
    ///
    /// [`TenazError::ElementNotFound`] naming every strategy tried when the
    /// chain exhausts.
    pub fn resolve(&self, chain: &FallbackChain) -> TenazResult<ElementHandle<'d>> {
        for selector in chain.selectors() {
            match self.driver.query(selector) {
                Ok(nodes) if !nodes.is_empty() => {
                    tracing::debug!(
                        selector = %selector,
                        matches = nodes.len(),
                        "fallback chain resolved"
                    );
                    return Ok(ElementHandle::new(self.driver, selector.clone()));
                }
                Ok(_) => {
                    tracing::trace!(selector = %selector, "strategy missed, trying next");
                }
                Err(err) => {
                    tracing::warn!(
                        selector = %selector,
                        error = %err,
                        "strategy query faulted, trying next"
                    );
                }
            }
        }
        Err(TenazError::ElementNotFound {
            descriptor: chain.describe(),
        })
    }

    /// Wait for the handle to become visible using configured defaults
    ///
    /// # Errors
    ///
    /// [`TenazError::WaitTimeout`] in hard mode.
    pub fn wait_visible(&self, handle: &ElementHandle<'_>, mode: WaitMode) -> TenazResult<bool> {
        self.wait(handle, &StatePredicate::Visible, mode)
    }

    /// Wait for an arbitrary state predicate using configured defaults
    ///
    /// # Errors
    ///
    /// [`TenazError::WaitTimeout`] in hard mode.
    pub fn wait(
        &self,
        handle: &ElementHandle<'_>,
        predicate: &StatePredicate,
        mode: WaitMode,
    ) -> TenazResult<bool> {
        wait(handle, predicate, &self.config.wait, mode)
    }

    /// Wait with explicit options
    ///
    /// # Errors
    ///
    /// [`TenazError::WaitTimeout`] in hard mode.
    pub fn wait_with(
        &self,
        handle: &ElementHandle<'_>,
        predicate: &StatePredicate,
        options: &WaitOptions,
        mode: WaitMode,
    ) -> TenazResult<bool> {
        wait(handle, predicate, options, mode)
    }

    /// Click with the configured retry policy
    ///
    /// # Errors
    ///
    /// [`TenazError::ActionFailed`] once attempts exhaust.
    pub fn click_with_retry(&self, handle: &ElementHandle<'_>) -> TenazResult<RetryReport> {
        self.click_with_policy(handle, self.config.retry)
    }

    /// Click with an explicit retry policy
    ///
    /// # Errors
    ///
    /// [`TenazError::ActionFailed`] once attempts exhaust.
    pub fn click_with_policy(
        &self,
        handle: &ElementHandle<'_>,
        policy: RetryPolicy,
    ) -> TenazResult<RetryReport> {
        perform(&format!("click {}", handle.describe()), policy, || {
            handle.click()
        })
    }

    /// Fill with the configured retry policy
    ///
    /// # Errors
    ///
    /// [`TenazError::ActionFailed`] once attempts exhaust.
    pub fn fill_with_retry(
        &self,
        handle: &ElementHandle<'_>,
        text: &str,
    ) -> TenazResult<RetryReport> {
        perform(
            &format!("fill {}", handle.describe()),
            self.config.retry,
            || handle.fill(text),
        )
    }

    /// Check with the configured retry policy
    ///
    /// # Errors
    ///
    /// [`TenazError::ActionFailed`] once attempts exhaust.
    pub fn check_with_retry(&self, handle: &ElementHandle<'_>) -> TenazResult<RetryReport> {
        perform(
            &format!("check {}", handle.describe()),
            self.config.retry,
            || handle.check(),
        )
    }

    /// Poll a completion signal set to its terminal outcome
    pub fn await_outcome(&self, signals: CompletionSignals<'_>) -> Outcome {
        let outcome = signals.poll();
        tracing::debug!(outcome = %outcome, "completion poll finished");
        outcome
    }

    /// Navigate the page
    ///
    /// # Errors
    ///
    /// [`TenazError::NavigationFailed`] on driver navigation faults.
    pub fn goto(&self, url: &str) -> TenazResult<()> {
        tracing::debug!(url, "navigating");
        self.driver
            .navigate(url)
            .map_err(|err| TenazError::NavigationFailed {
                url: url.to_string(),
                message: err.to_string(),
            })
    }

    /// The page's current URL
    ///
    /// # Errors
    ///
    /// Driver faults pass through.
    pub fn current_url(&self) -> TenazResult<String> {
        self.driver.current_url()
    }

    /// Wait for the page URL to match `pattern` using navigation defaults
    ///
    /// # Errors
    ///
    /// [`TenazError::WaitTimeout`] in hard mode.
    pub fn wait_for_url(&self, pattern: &UrlPattern, mode: WaitMode) -> TenazResult<bool> {
        self.wait_for_url_with(pattern, &self.config.navigation, mode)
    }

    /// Wait for the page URL to match `pattern` with explicit options
    ///
    /// # Errors
    ///
    /// [`TenazError::WaitTimeout`] in hard mode.
    pub fn wait_for_url_with(
        &self,
        pattern: &UrlPattern,
        options: &WaitOptions,
        mode: WaitMode,
    ) -> TenazResult<bool> {
        let start = Instant::now();
        loop {
            let matched = match self.driver.current_url() {
                Ok(url) => pattern.matches(&url),
                Err(err) => {
                    tracing::trace!(error = %err, "url probe failed, continuing to poll");
                    false
                }
            };
            if matched {
                return Ok(true);
            }
            if start.elapsed() >= options.timeout {
                break;
            }
            std::thread::sleep(options.poll_interval);
        }

        match mode {
            WaitMode::Hard => Err(TenazError::WaitTimeout {
                condition: pattern.to_string(),
                descriptor: "page".to_string(),
                timeout_ms: options.timeout.as_millis() as u64,
            }),
            WaitMode::Soft => {
                tracing::warn!(pattern = %pattern, "soft url wait expired");
                Ok(false)
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::driver::{MockDriver, MockElement, NodeId};
    use crate::outcome::probe;
    use std::time::Duration;

    fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .with_test_writer()
            .try_init();
    }

    fn fast_config() -> InteractionConfig {
        InteractionConfig::new()
            .with_wait(
                WaitOptions::new()
                    .with_timeout(Duration::from_millis(150))
                    .with_poll_interval(Duration::from_millis(15)),
            )
            .with_retry(RetryPolicy::new(3).with_delay(Duration::from_millis(10)))
            .with_navigation(
                WaitOptions::new()
                    .with_timeout(Duration::from_millis(200))
                    .with_poll_interval(Duration::from_millis(20)),
            )
    }

    mod resolve_tests {
        use super::*;

        // Role misses, CSS hits: the resolver returns the CSS-based handle.
        #[test]
        fn test_first_matching_strategy_wins() {
            init_tracing();
            let driver = MockDriver::new();
            driver.add_element(MockElement::new("login").matched_by(Selector::css(".login-btn")));
            let session = Session::new(&driver);

            let chain = FallbackChain::new(Selector::role("button", "Login"))
                .or(Selector::css(".login-btn"));
            let handle = session.resolve(&chain).unwrap();

            assert_eq!(handle.selector(), &Selector::css(".login-btn"));
            handle.click().unwrap();
            assert_eq!(driver.calls("click:login"), 1);
        }

        // Strategies after the first hit are never attempted.
        #[test]
        fn test_no_strategy_after_match_is_queried() {
            let driver = MockDriver::new();
            driver.add_element(MockElement::new("login").matched_by(Selector::text("Login")));
            let session = Session::new(&driver);

            let role = Selector::role("button", "Login");
            let text = Selector::text("Login");
            let css = Selector::css(".login-btn");
            let chain = FallbackChain::new(role.clone()).or(text.clone()).or(css.clone());

            let handle = session.resolve(&chain).unwrap();
            assert_eq!(handle.selector(), &text);
            assert_eq!(driver.query_count(&role), 1);
            assert_eq!(driver.query_count(&text), 1);
            assert_eq!(driver.query_count(&css), 0);
        }

        #[test]
        fn test_exhausted_chain_names_every_strategy() {
            let driver = MockDriver::new();
            let session = Session::new(&driver);

            let chain = FallbackChain::new(Selector::role("button", "Publish"))
                .or(Selector::css(".publish"));
            let err = session.resolve(&chain).unwrap_err();

            assert!(matches!(err, TenazError::ElementNotFound { .. }));
            let message = format!("{err}");
            assert!(message.contains("Publish"));
            assert!(message.contains(".publish"));
        }

        // A strategy whose query faults is skipped like a miss.
        #[test]
        fn test_faulting_strategy_is_skipped() {
            struct XPathlessDriver(MockDriver);

            impl Driver for XPathlessDriver {
                fn query(&self, selector: &Selector) -> TenazResult<Vec<NodeId>> {
                    if matches!(selector, Selector::XPath(_)) {
                        return Err(TenazError::driver("xpath not supported"));
                    }
                    self.0.query(selector)
                }
                fn is_visible(&self, node: &NodeId) -> TenazResult<bool> {
                    self.0.is_visible(node)
                }
                fn is_enabled(&self, node: &NodeId) -> TenazResult<bool> {
                    self.0.is_enabled(node)
                }
                fn is_checked(&self, node: &NodeId) -> TenazResult<bool> {
                    self.0.is_checked(node)
                }
                fn attribute(&self, node: &NodeId, name: &str) -> TenazResult<Option<String>> {
                    self.0.attribute(node, name)
                }
                fn click(&self, node: &NodeId) -> TenazResult<()> {
                    self.0.click(node)
                }
                fn fill(&self, node: &NodeId, text: &str) -> TenazResult<()> {
                    self.0.fill(node, text)
                }
                fn check(&self, node: &NodeId) -> TenazResult<()> {
                    self.0.check(node)
                }
                fn scroll_into_view(&self, node: &NodeId) -> TenazResult<()> {
                    self.0.scroll_into_view(node)
                }
                fn navigate(&self, url: &str) -> TenazResult<()> {
                    self.0.navigate(url)
                }
                fn current_url(&self) -> TenazResult<String> {
                    self.0.current_url()
                }
            }

            let inner = MockDriver::new();
            inner.add_element(MockElement::new("menu").matched_by(Selector::css("nav")));
            let driver = XPathlessDriver(inner);
            let session = Session::new(&driver);

            let chain = FallbackChain::new(Selector::xpath("//nav")).or(Selector::css("nav"));
            let handle = session.resolve(&chain).unwrap();
            assert_eq!(handle.selector(), &Selector::css("nav"));
        }
    }

    mod action_tests {
        use super::*;

        #[test]
        fn test_click_with_retry_absorbs_transient_failures() {
            init_tracing();
            let driver = MockDriver::new();
            driver.add_element(MockElement::new("save").matched_by(Selector::test_id("save")));
            driver.fail_next_clicks(2);
            let session = Session::with_config(&driver, fast_config());

            let handle = session.handle(Selector::test_id("save"));
            let report = session.click_with_retry(&handle).unwrap();

            assert_eq!(report.attempts, 3);
            assert_eq!(driver.calls("click:save"), 3);
        }

        #[test]
        fn test_click_with_retry_exhaustion_names_the_action() {
            let driver = MockDriver::new();
            driver.add_element(MockElement::new("save").matched_by(Selector::test_id("save")));
            driver.fail_next_clicks(10);
            let session = Session::with_config(&driver, fast_config());

            let handle = session.handle(Selector::test_id("save"));
            let err = session.click_with_retry(&handle).unwrap_err();

            let message = format!("{err}");
            assert!(message.contains("click"));
            assert!(message.contains("save"));
            assert!(message.contains("3 attempt(s)"));
        }

        #[test]
        fn test_fill_with_retry() {
            let driver = MockDriver::new();
            driver.add_element(
                MockElement::new("caption").matched_by(Selector::placeholder("Caption")),
            );
            driver.fail_next_fills(1);
            let session = Session::with_config(&driver, fast_config());

            let handle = session.handle(Selector::placeholder("Caption"));
            let report = session.fill_with_retry(&handle, "new release").unwrap();

            assert_eq!(report.attempts, 2);
            assert_eq!(
                driver.filled_value(&NodeId::new("caption")).as_deref(),
                Some("new release")
            );
        }

        #[test]
        fn test_check_with_retry() {
            let driver = MockDriver::new();
            driver.add_element(MockElement::new("terms").matched_by(Selector::css("#terms")));
            let session = Session::with_config(&driver, fast_config());

            let handle = session.handle(Selector::css("#terms"));
            session.check_with_retry(&handle).unwrap();
            assert!(handle.is_checked().unwrap());
        }

        #[test]
        fn test_click_with_explicit_policy_overrides_config() {
            let driver = MockDriver::new();
            driver.add_element(MockElement::new("x").matched_by(Selector::css("#x")));
            driver.fail_next_clicks(1);
            let session = Session::with_config(&driver, fast_config());

            let handle = session.handle(Selector::css("#x"));
            let err = session
                .click_with_policy(&handle, RetryPolicy::once())
                .unwrap_err();
            assert!(matches!(err, TenazError::ActionFailed { attempts: 1, .. }));
        }
    }

    mod wait_tests {
        use super::*;

        #[test]
        fn test_wait_visible_hard_and_soft() {
            let driver = MockDriver::new();
            driver.add_element(MockElement::new("h").matched_by(Selector::css("h1")));
            let session = Session::with_config(&driver, fast_config());

            let present = session.handle(Selector::css("h1"));
            assert!(session.wait_visible(&present, WaitMode::Hard).unwrap());

            let absent = session.handle(Selector::css(".ghost"));
            assert!(!session.wait_visible(&absent, WaitMode::Soft).unwrap());
            assert!(session.wait_visible(&absent, WaitMode::Hard).is_err());
        }

        #[test]
        fn test_dismiss_banner_if_present_pattern() {
            let driver = MockDriver::new();
            let session = Session::with_config(&driver, fast_config());

            // The defensive idiom: probe softly, act only when it is there
            let banner = session.handle(Selector::test_id("cookie-banner"));
            if session.wait_visible(&banner, WaitMode::Soft).unwrap() {
                session.click_with_retry(&banner.first()).unwrap();
            }
            assert_eq!(driver.calls("click:"), 0);
        }
    }

    mod outcome_tests {
        use super::*;

        #[test]
        fn test_await_outcome_for_upload_confirmation() {
            let driver = MockDriver::new();
            driver.add_element(
                MockElement::new("ok")
                    .matched_by(Selector::test_id("toast-success"))
                    .present_after(Duration::from_millis(40)),
            );
            let session = Session::with_config(&driver, fast_config());

            let toast = session.handle(Selector::test_id("toast-success"));
            let outcome = session.await_outcome(
                CompletionSignals::new(probe(&toast, StatePredicate::Visible))
                    .with_timeout(Duration::from_millis(300))
                    .with_poll_interval(Duration::from_millis(15)),
            );
            assert!(outcome.is_success());
        }
    }

    mod navigation_tests {
        use super::*;

        #[test]
        fn test_goto_then_wait_for_url() {
            let driver = MockDriver::new();
            let session = Session::with_config(&driver, fast_config());

            session.goto("https://app.example.com/login").unwrap();
            assert_eq!(
                session.current_url().unwrap(),
                "https://app.example.com/login"
            );

            driver.set_url_after("https://app.example.com/home", Duration::from_millis(50));
            let matched = session
                .wait_for_url(&UrlPattern::Contains("/home".to_string()), WaitMode::Hard)
                .unwrap();
            assert!(matched);
        }

        #[test]
        fn test_wait_for_url_soft_timeout() {
            let driver = MockDriver::new();
            driver.set_url("https://app.example.com/login");
            let session = Session::with_config(&driver, fast_config());

            let matched = session
                .wait_for_url(&UrlPattern::Contains("/home".to_string()), WaitMode::Soft)
                .unwrap();
            assert!(!matched);
        }

        #[test]
        fn test_wait_for_url_hard_timeout_error() {
            let driver = MockDriver::new();
            let session = Session::with_config(&driver, fast_config());

            let err = session
                .wait_for_url(&UrlPattern::Exact("https://x".to_string()), WaitMode::Hard)
                .unwrap_err();
            assert!(matches!(err, TenazError::WaitTimeout { .. }));
        }
    }
}
