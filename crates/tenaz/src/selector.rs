//! Selector abstraction for element lookup.
//!
//! A [`Selector`] names one lookup strategy plus its parameters; a
//! [`FallbackChain`] is an ordered list of alternatives tried front to back.
//! Production UIs rename attributes and restructure markup constantly, so a
//! chain of `role -> text -> css -> xpath` lookups survives churn that any
//! single hard-coded selector would not.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One element-lookup strategy with its parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Selector {
    /// CSS selector (e.g., "button.primary")
    Css(String),
    /// XPath expression
    XPath(String),
    /// Visible text content
    Text(String),
    /// Placeholder attribute of an input
    Placeholder(String),
    /// Test ID attribute (data-testid)
    TestId(String),
    /// ARIA role plus accessible name
    Role {
        /// ARIA role (e.g., "button")
        role: String,
        /// Accessible name (e.g., "Login")
        name: String,
    },
}

impl Selector {
    /// Create a CSS selector
    #[must_use]
    pub fn css(selector: impl Into<String>) -> Self {
        Self::Css(selector.into())
    }

    /// Create an XPath selector
    #[must_use]
    pub fn xpath(expression: impl Into<String>) -> Self {
        Self::XPath(expression.into())
    }

    /// Create a text-content selector
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    /// Create a placeholder selector
    #[must_use]
    pub fn placeholder(text: impl Into<String>) -> Self {
        Self::Placeholder(text.into())
    }

    /// Create a test ID selector
    #[must_use]
    pub fn test_id(id: impl Into<String>) -> Self {
        Self::TestId(id.into())
    }

    /// Create a role + accessible-name selector
    #[must_use]
    pub fn role(role: impl Into<String>, name: impl Into<String>) -> Self {
        Self::Role {
            role: role.into(),
            name: name.into(),
        }
    }

    /// Strategy name without parameters, for logging
    #[must_use]
    pub const fn strategy(&self) -> &'static str {
        match self {
            Self::Css(_) => "css",
            Self::XPath(_) => "xpath",
            Self::Text(_) => "text",
            Self::Placeholder(_) => "placeholder",
            Self::TestId(_) => "test-id",
            Self::Role { .. } => "role",
        }
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Css(s) | Self::XPath(s) | Self::Text(s) | Self::Placeholder(s)
            | Self::TestId(s) => {
                write!(f, "{} {:?}", self.strategy(), s)
            }
            Self::Role { role, name } => write!(f, "role {role}[name={name:?}]"),
        }
    }
}

/// Ordered list of alternative selectors, tried front to back.
///
/// Non-empty by construction: the only way to build one is from a primary
/// selector. Resolution stops at the first strategy yielding at least one
/// match; callers supply strategies most-specific first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FallbackChain {
    selectors: Vec<Selector>,
}

impl FallbackChain {
    /// Create a chain with its primary strategy
    #[must_use]
    pub fn new(primary: Selector) -> Self {
        Self {
            selectors: vec![primary],
        }
    }

    /// Append a fallback strategy, tried only if all earlier ones miss
    #[must_use]
    pub fn or(mut self, alternative: Selector) -> Self {
        self.selectors.push(alternative);
        self
    }

    /// The strategies in priority order
    #[must_use]
    pub fn selectors(&self) -> &[Selector] {
        &self.selectors
    }

    /// Number of strategies in the chain (always >= 1)
    #[must_use]
    pub fn len(&self) -> usize {
        self.selectors.len()
    }

    /// Diagnostic rendering of the whole chain
    #[must_use]
    pub fn describe(&self) -> String {
        self.selectors
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" | ")
    }
}

impl From<Selector> for FallbackChain {
    fn from(selector: Selector) -> Self {
        Self::new(selector)
    }
}

impl fmt::Display for FallbackChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.describe())
    }
}
