//! Abstract browser-automation driver capability.
//!
//! Tenaz composes waits, retries, and fallback resolution on top of a small
//! set of raw DOM primitives. Those primitives live behind the [`Driver`]
//! trait so implementations can be swapped: a CDP-backed driver, a
//! Playwright bridge, or the in-crate [`MockDriver`] used by unit tests.
//!
//! The trait is object safe and takes `&self` throughout; implementations
//! that mutate (navigation history, scripted state) use interior mutability.

use crate::result::{TenazError, TenazResult};
use crate::selector::Selector;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Opaque reference to a single DOM node as known to the driver.
///
/// Node identity is only meaningful to the driver that produced it; Tenaz
/// never inspects the payload.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(String);

impl NodeId {
    /// Create a node reference from a driver-side identifier
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The raw identifier
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Raw DOM query and interaction primitives consumed by the interaction layer.
///
/// Every method is a single, unretried operation; resilience (waiting,
/// retrying, fallback selection) is layered on top by the rest of the crate.
pub trait Driver: Send + Sync {
    /// Return every node currently matching the selector (0..N)
    fn query(&self, selector: &Selector) -> TenazResult<Vec<NodeId>>;

    /// Whether the node is rendered and visible
    fn is_visible(&self, node: &NodeId) -> TenazResult<bool>;

    /// Whether the node accepts interaction
    fn is_enabled(&self, node: &NodeId) -> TenazResult<bool>;

    /// Whether a checkbox/radio node is checked
    fn is_checked(&self, node: &NodeId) -> TenazResult<bool>;

    /// Read an attribute, `None` when absent
    fn attribute(&self, node: &NodeId, name: &str) -> TenazResult<Option<String>>;

    /// Click the node
    fn click(&self, node: &NodeId) -> TenazResult<()>;

    /// Replace the node's input value with `text`
    fn fill(&self, node: &NodeId, text: &str) -> TenazResult<()>;

    /// Set a checkbox/radio node to checked
    fn check(&self, node: &NodeId) -> TenazResult<()>;

    /// Scroll the node into the viewport
    fn scroll_into_view(&self, node: &NodeId) -> TenazResult<()>;

    /// Navigate the page to `url`
    fn navigate(&self, url: &str) -> TenazResult<()>;

    /// The page's current URL
    fn current_url(&self) -> TenazResult<String>;
}

/// A scripted element served by [`MockDriver`].
///
/// State can be scheduled relative to driver creation: `present_after`
/// delays the node's appearance in query results, `visible_after` delays
/// visibility, both mimicking async renders and animations.
#[derive(Debug, Clone)]
pub struct MockElement {
    id: NodeId,
    selectors: Vec<Selector>,
    visible: bool,
    visible_after: Option<Duration>,
    present_after: Option<Duration>,
    enabled: bool,
    checked: bool,
    attributes: HashMap<String, String>,
}

impl MockElement {
    /// Create an element with the given identifier
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: NodeId::new(id),
            selectors: Vec::new(),
            visible: true,
            visible_after: None,
            present_after: None,
            enabled: true,
            checked: false,
            attributes: HashMap::new(),
        }
    }

    /// Register a selector this element answers to
    #[must_use]
    pub fn matched_by(mut self, selector: Selector) -> Self {
        self.selectors.push(selector);
        self
    }

    /// Set base visibility
    #[must_use]
    pub const fn visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    /// Become visible only once `delay` has elapsed since driver creation
    #[must_use]
    pub const fn visible_after(mut self, delay: Duration) -> Self {
        self.visible_after = Some(delay);
        self
    }

    /// Appear in query results only once `delay` has elapsed
    #[must_use]
    pub const fn present_after(mut self, delay: Duration) -> Self {
        self.present_after = Some(delay);
        self
    }

    /// Set enabled state
    #[must_use]
    pub const fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Set checked state
    #[must_use]
    pub const fn checked(mut self, checked: bool) -> Self {
        self.checked = checked;
        self
    }

    /// Add an attribute
    #[must_use]
    pub fn attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let _ = self.attributes.insert(name.into(), value.into());
        self
    }

    fn is_present(&self, elapsed: Duration) -> bool {
        self.present_after.map_or(true, |d| elapsed >= d)
    }

    fn is_visible(&self, elapsed: Duration) -> bool {
        match self.visible_after {
            Some(d) => elapsed >= d,
            None => self.visible,
        }
    }
}

#[derive(Debug, Default)]
struct MockState {
    elements: Vec<MockElement>,
    url: String,
    scheduled_url: Option<(String, Duration)>,
    history: Vec<String>,
    click_failures_remaining: u32,
    fill_failures_remaining: u32,
    filled: HashMap<NodeId, String>,
}

/// In-memory driver for unit tests.
///
/// Records every call it receives so tests can verify which strategies were
/// attempted and in what order, and supports scripted transient failures
/// (overlay-intercepted clicks) for exercising the retry executor.
#[derive(Debug)]
pub struct MockDriver {
    started: Instant,
    state: Mutex<MockState>,
}

impl Default for MockDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl MockDriver {
    /// Create an empty mock driver
    #[must_use]
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
            state: Mutex::new(MockState::default()),
        }
    }

    /// Add a scripted element
    pub fn add_element(&self, element: MockElement) {
        self.lock().elements.push(element);
    }

    /// Make the next `n` clicks fail as if an overlay intercepted them
    pub fn fail_next_clicks(&self, n: u32) {
        self.lock().click_failures_remaining = n;
    }

    /// Make the next `n` fills fail as if the node detached mid-keystroke
    pub fn fail_next_fills(&self, n: u32) {
        self.lock().fill_failures_remaining = n;
    }

    /// Set the current URL directly (simulates server-side redirects)
    pub fn set_url(&self, url: impl Into<String>) {
        self.lock().url = url.into();
    }

    /// Switch to `url` once `delay` has elapsed since driver creation
    pub fn set_url_after(&self, url: impl Into<String>, delay: Duration) {
        self.lock().scheduled_url = Some((url.into(), delay));
    }

    /// Every call recorded so far, oldest first
    #[must_use]
    pub fn history(&self) -> Vec<String> {
        self.lock().history.clone()
    }

    /// Whether any recorded call starts with `prefix`
    #[must_use]
    pub fn was_called(&self, prefix: &str) -> bool {
        self.lock().history.iter().any(|c| c.starts_with(prefix))
    }

    /// Number of recorded calls starting with `prefix`
    #[must_use]
    pub fn calls(&self, prefix: &str) -> usize {
        self.lock()
            .history
            .iter()
            .filter(|c| c.starts_with(prefix))
            .count()
    }

    /// Number of queries issued for exactly this selector
    #[must_use]
    pub fn query_count(&self, selector: &Selector) -> usize {
        let entry = format!("query:{selector}");
        self.lock().history.iter().filter(|c| **c == entry).count()
    }

    /// Text most recently filled into the node, if any
    #[must_use]
    pub fn filled_value(&self, node: &NodeId) -> Option<String> {
        self.lock().filled.get(node).cloned()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn with_element<T>(
        &self,
        node: &NodeId,
        f: impl FnOnce(&mut MockElement, Duration) -> TenazResult<T>,
    ) -> TenazResult<T> {
        let elapsed = self.started.elapsed();
        let mut state = self.lock();
        let element = state
            .elements
            .iter_mut()
            .find(|e| e.id == *node)
            .ok_or_else(|| TenazError::driver(format!("unknown node {node}")))?;
        f(element, elapsed)
    }
}

impl Driver for MockDriver {
    fn query(&self, selector: &Selector) -> TenazResult<Vec<NodeId>> {
        let elapsed = self.started.elapsed();
        let mut state = self.lock();
        state.history.push(format!("query:{selector}"));
        Ok(state
            .elements
            .iter()
            .filter(|e| e.is_present(elapsed) && e.selectors.contains(selector))
            .map(|e| e.id.clone())
            .collect())
    }

    fn is_visible(&self, node: &NodeId) -> TenazResult<bool> {
        self.with_element(node, |e, elapsed| Ok(e.is_visible(elapsed)))
    }

    fn is_enabled(&self, node: &NodeId) -> TenazResult<bool> {
        self.with_element(node, |e, _| Ok(e.enabled))
    }

    fn is_checked(&self, node: &NodeId) -> TenazResult<bool> {
        self.with_element(node, |e, _| Ok(e.checked))
    }

    fn attribute(&self, node: &NodeId, name: &str) -> TenazResult<Option<String>> {
        let name = name.to_string();
        self.with_element(node, move |e, _| Ok(e.attributes.get(&name).cloned()))
    }

    fn click(&self, node: &NodeId) -> TenazResult<()> {
        {
            let mut state = self.lock();
            state.history.push(format!("click:{node}"));
            if state.click_failures_remaining > 0 {
                state.click_failures_remaining -= 1;
                return Err(TenazError::driver("click intercepted by overlay"));
            }
        }
        self.with_element(node, |_, _| Ok(()))
    }

    fn fill(&self, node: &NodeId, text: &str) -> TenazResult<()> {
        {
            let mut state = self.lock();
            state.history.push(format!("fill:{node}"));
            if state.fill_failures_remaining > 0 {
                state.fill_failures_remaining -= 1;
                return Err(TenazError::driver("node detached during fill"));
            }
        }
        self.with_element(node, |_, _| Ok(()))?;
        let _ = self.lock().filled.insert(node.clone(), text.to_string());
        Ok(())
    }

    fn check(&self, node: &NodeId) -> TenazResult<()> {
        self.lock().history.push(format!("check:{node}"));
        self.with_element(node, |e, _| {
            e.checked = true;
            Ok(())
        })
    }

    fn scroll_into_view(&self, node: &NodeId) -> TenazResult<()> {
        self.lock().history.push(format!("scroll:{node}"));
        self.with_element(node, |_, _| Ok(()))
    }

    fn navigate(&self, url: &str) -> TenazResult<()> {
        let mut state = self.lock();
        state.history.push(format!("navigate:{url}"));
        state.url = url.to_string();
        Ok(())
    }

    fn current_url(&self) -> TenazResult<String> {
        let elapsed = self.started.elapsed();
        let state = self.lock();
        if let Some((url, delay)) = &state.scheduled_url {
            if elapsed >= *delay {
                return Ok(url.clone());
            }
        }
        Ok(state.url.clone())
    }
}
