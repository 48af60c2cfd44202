//! Page object support.
//!
//! Page objects encapsulate where things are on a page; scenario code
//! sequences them. The trait here carries only the structural contract —
//! which URL the page answers to, how to tell it finished loading — and the
//! registry lets a scenario runner look pages up by name. Business flows
//! stay in the embedding test suite.

use crate::session::Session;
use crate::url::UrlPattern;
use std::collections::HashMap;
use std::time::Duration;

/// A page or component of the target UI.
///
/// # Example
///
/// ```
/// use tenaz::{FallbackChain, PageObject, Selector, Session, UrlPattern, WaitMode};
///
/// struct LoginPage;
///
/// impl PageObject for LoginPage {
///     fn url_pattern(&self) -> UrlPattern {
///         UrlPattern::Contains("/login".to_string())
///     }
///
///     fn is_loaded(&self, session: &Session<'_>) -> bool {
///         let chain = FallbackChain::new(Selector::role("button", "Login"))
///             .or(Selector::css(".login-btn"));
///         session
///             .resolve(&chain)
///             .and_then(|button| session.wait_visible(&button, WaitMode::Soft))
///             .unwrap_or(false)
///     }
/// }
/// ```
pub trait PageObject {
    /// URL pattern that identifies this page
    fn url_pattern(&self) -> UrlPattern;

    /// Whether the page is ready for interaction
    fn is_loaded(&self, _session: &Session<'_>) -> bool {
        true
    }

    /// Budget for the page to finish loading
    fn load_timeout(&self) -> Duration {
        Duration::from_secs(30)
    }

    /// Name used in logs and diagnostics
    fn page_name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

/// Registry of page objects, looked up by name by the scenario runner
#[derive(Default)]
pub struct PageRegistry {
    pages: HashMap<String, Box<dyn PageObject + Send + Sync>>,
}

impl std::fmt::Debug for PageRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageRegistry")
            .field("pages", &self.list())
            .finish()
    }
}

impl PageRegistry {
    /// Create an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a page object under `name`
    pub fn register(
        &mut self,
        name: impl Into<String>,
        page: impl PageObject + Send + Sync + 'static,
    ) {
        let _ = self.pages.insert(name.into(), Box::new(page));
    }

    /// Look a page up by name
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&(dyn PageObject + Send + Sync)> {
        self.pages.get(name).map(|page| &**page)
    }

    /// Names of every registered page
    #[must_use]
    pub fn list(&self) -> Vec<&str> {
        self.pages.keys().map(String::as_str).collect()
    }

    /// Number of registered pages
    #[must_use]
    pub fn count(&self) -> usize {
        self.pages.len()
    }
}
