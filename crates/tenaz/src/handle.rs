//! Re-resolvable element handles.
//!
//! A handle pairs a [`Selector`] with the driver that can resolve it. The
//! underlying DOM query re-runs on every operation, never caching node
//! references: the target UIs detach and reattach nodes during animations
//! and async renders, so a reference held across even one frame can go
//! stale. Handles are cheap, transient values created per page-object call.

use crate::driver::{Driver, NodeId};
use crate::result::{TenazError, TenazResult};
use crate::selector::Selector;
use std::fmt;

/// A lazily-resolved reference to zero or more DOM nodes.
///
/// Operations that act on a single node (`click`, `fill`, state probes)
/// refuse ambiguous multi-match resolution: callers disambiguate with
/// [`first`](Self::first) or [`nth`](Self::nth) rather than letting the
/// layer guess.
#[derive(Clone)]
pub struct ElementHandle<'d> {
    driver: &'d dyn Driver,
    selector: Selector,
    index: Option<usize>,
}

impl fmt::Debug for ElementHandle<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ElementHandle")
            .field("selector", &self.selector)
            .field("index", &self.index)
            .finish_non_exhaustive()
    }
}

impl<'d> ElementHandle<'d> {
    /// Create a handle over `driver` for `selector`
    #[must_use]
    pub fn new(driver: &'d dyn Driver, selector: Selector) -> Self {
        Self {
            driver,
            selector,
            index: None,
        }
    }

    /// The selector this handle resolves
    #[must_use]
    pub const fn selector(&self) -> &Selector {
        &self.selector
    }

    /// Diagnostic description: selector plus any pinned index
    #[must_use]
    pub fn describe(&self) -> String {
        match self.index {
            Some(i) => format!("{}[{i}]", self.selector),
            None => self.selector.to_string(),
        }
    }

    /// Pin this handle to the first match
    #[must_use]
    pub fn first(&self) -> Self {
        self.nth(0)
    }

    /// Pin this handle to the i-th match (0-based)
    #[must_use]
    pub fn nth(&self, index: usize) -> Self {
        Self {
            driver: self.driver,
            selector: self.selector.clone(),
            index: Some(index),
        }
    }

    /// Number of nodes currently matching the selector
    pub fn count(&self) -> TenazResult<usize> {
        Ok(self.driver.query(&self.selector)?.len())
    }

    /// Whether a node this handle would act on currently exists
    pub fn exists(&self) -> TenazResult<bool> {
        let count = self.count()?;
        Ok(count > self.index.unwrap_or(0))
    }

    /// Whether the resolved node is visible
    pub fn is_visible(&self) -> TenazResult<bool> {
        let node = self.resolve()?;
        self.driver.is_visible(&node)
    }

    /// Whether the resolved node is enabled
    pub fn is_enabled(&self) -> TenazResult<bool> {
        let node = self.resolve()?;
        self.driver.is_enabled(&node)
    }

    /// Whether the resolved node is checked
    pub fn is_checked(&self) -> TenazResult<bool> {
        let node = self.resolve()?;
        self.driver.is_checked(&node)
    }

    /// Read an attribute from the resolved node
    pub fn attribute(&self, name: &str) -> TenazResult<Option<String>> {
        let node = self.resolve()?;
        self.driver.attribute(&node, name)
    }

    /// Click the resolved node (single attempt; see the retry executor for
    /// the resilient variant)
    pub fn click(&self) -> TenazResult<()> {
        let node = self.resolve()?;
        self.driver.click(&node)
    }

    /// Fill the resolved node with `text`
    pub fn fill(&self, text: &str) -> TenazResult<()> {
        let node = self.resolve()?;
        self.driver.fill(&node, text)
    }

    /// Check the resolved checkbox/radio node
    pub fn check(&self) -> TenazResult<()> {
        let node = self.resolve()?;
        self.driver.check(&node)
    }

    /// Scroll the resolved node into the viewport
    pub fn scroll_into_view(&self) -> TenazResult<()> {
        let node = self.resolve()?;
        self.driver.scroll_into_view(&node)
    }

    /// Resolve to exactly one node, re-running the query.
    fn resolve(&self) -> TenazResult<NodeId> {
        let mut nodes = self.driver.query(&self.selector)?;
        tracing::trace!(
            selector = %self.selector,
            matches = nodes.len(),
            "resolved element query"
        );
        match self.index {
            Some(i) if i < nodes.len() => Ok(nodes.swap_remove(i)),
            Some(_) | None if nodes.is_empty() => Err(TenazError::ElementNotFound {
                descriptor: self.describe(),
            }),
            Some(_) => Err(TenazError::ElementNotFound {
                descriptor: self.describe(),
            }),
            None if nodes.len() > 1 => Err(TenazError::AmbiguousMatch {
                descriptor: self.describe(),
                count: nodes.len(),
            }),
            None => Ok(nodes.swap_remove(0)),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::driver::{MockDriver, MockElement};
    use std::time::Duration;

    fn login_button() -> MockElement {
        MockElement::new("login").matched_by(Selector::css(".login-btn"))
    }

    #[test]
    fn test_count_re_queries_each_time() {
        let driver = MockDriver::new();
        let selector = Selector::css(".login-btn");
        let handle = ElementHandle::new(&driver, selector.clone());

        assert_eq!(handle.count().unwrap(), 0);
        driver.add_element(login_button());
        assert_eq!(handle.count().unwrap(), 1);
        assert_eq!(driver.query_count(&selector), 2);
    }

    #[test]
    fn test_operation_on_zero_matches_is_element_not_found() {
        let driver = MockDriver::new();
        let handle = ElementHandle::new(&driver, Selector::css(".missing"));
        let err = handle.click().unwrap_err();
        assert!(matches!(err, TenazError::ElementNotFound { .. }));
        assert!(format!("{err}").contains(".missing"));
    }

    #[test]
    fn test_ambiguous_multi_match_is_refused() {
        let driver = MockDriver::new();
        driver.add_element(MockElement::new("a").matched_by(Selector::css("li")));
        driver.add_element(MockElement::new("b").matched_by(Selector::css("li")));

        let handle = ElementHandle::new(&driver, Selector::css("li"));
        let err = handle.click().unwrap_err();
        assert!(matches!(err, TenazError::AmbiguousMatch { count: 2, .. }));
    }

    #[test]
    fn test_first_and_nth_disambiguate() {
        let driver = MockDriver::new();
        driver.add_element(MockElement::new("a").matched_by(Selector::css("li")));
        driver.add_element(MockElement::new("b").matched_by(Selector::css("li")));

        let handle = ElementHandle::new(&driver, Selector::css("li"));
        handle.first().click().unwrap();
        handle.nth(1).click().unwrap();
        assert_eq!(driver.calls("click:a"), 1);
        assert_eq!(driver.calls("click:b"), 1);
    }

    #[test]
    fn test_nth_beyond_matches_is_element_not_found() {
        let driver = MockDriver::new();
        driver.add_element(MockElement::new("a").matched_by(Selector::css("li")));

        let handle = ElementHandle::new(&driver, Selector::css("li")).nth(3);
        let err = handle.click().unwrap_err();
        assert!(matches!(err, TenazError::ElementNotFound { .. }));
        assert!(format!("{err}").contains("[3]"));
    }

    #[test]
    fn test_exists_respects_pinned_index() {
        let driver = MockDriver::new();
        driver.add_element(MockElement::new("a").matched_by(Selector::css("li")));

        let handle = ElementHandle::new(&driver, Selector::css("li"));
        assert!(handle.exists().unwrap());
        assert!(handle.first().exists().unwrap());
        assert!(!handle.nth(1).exists().unwrap());
    }

    #[test]
    fn test_handle_sees_late_appearing_element() {
        let driver = MockDriver::new();
        driver.add_element(
            MockElement::new("toast")
                .matched_by(Selector::test_id("toast"))
                .present_after(Duration::from_millis(30)),
        );

        let handle = ElementHandle::new(&driver, Selector::test_id("toast"));
        assert!(!handle.exists().unwrap());
        std::thread::sleep(Duration::from_millis(40));
        assert!(handle.exists().unwrap());
    }

    #[test]
    fn test_fill_and_attribute() {
        let driver = MockDriver::new();
        driver.add_element(
            MockElement::new("email")
                .matched_by(Selector::placeholder("Email"))
                .attribute("type", "email"),
        );

        let handle = ElementHandle::new(&driver, Selector::placeholder("Email"));
        handle.fill("creator@example.com").unwrap();
        assert_eq!(handle.attribute("type").unwrap().as_deref(), Some("email"));
    }

    #[test]
    fn test_describe_includes_index() {
        let driver = MockDriver::new();
        let handle = ElementHandle::new(&driver, Selector::css("li")).nth(2);
        assert!(handle.describe().ends_with("[2]"));
    }
}
