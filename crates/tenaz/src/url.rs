//! URL matching for navigation waits.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Pattern a page URL can be matched against
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum UrlPattern {
    /// Exact URL match
    Exact(String),
    /// Prefix match
    Prefix(String),
    /// Contains substring
    Contains(String),
    /// Regex match
    Regex(String),
    /// Glob pattern (e.g., "**/settings/*")
    Glob(String),
    /// Match any URL
    Any,
}

impl UrlPattern {
    /// Check if a URL matches this pattern
    #[must_use]
    pub fn matches(&self, url: &str) -> bool {
        match self {
            Self::Exact(pattern) => url == pattern,
            Self::Prefix(pattern) => url.starts_with(pattern),
            Self::Contains(pattern) => url.contains(pattern),
            Self::Regex(pattern) => regex::Regex::new(pattern)
                .map(|re| re.is_match(url))
                .unwrap_or(false),
            Self::Glob(pattern) => Self::glob_matches(pattern, url),
            Self::Any => true,
        }
    }

    /// Star-wildcard matching: literal segments must appear in order, an
    /// anchored head unless the pattern starts with `*`, and a consumed tail
    /// unless it ends with `*`.
    fn glob_matches(pattern: &str, url: &str) -> bool {
        let segments: Vec<&str> = pattern.split('*').collect();
        if segments.is_empty() {
            return url.is_empty();
        }

        let mut pos = 0;
        for (i, segment) in segments.iter().enumerate() {
            if segment.is_empty() {
                continue;
            }
            match url[pos..].find(segment) {
                Some(found) if i == 0 && found != 0 => return false,
                Some(found) => pos += found + segment.len(),
                None => return false,
            }
        }

        pattern.ends_with('*') || pos == url.len()
    }
}

impl fmt::Display for UrlPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact(p) => write!(f, "url == {p:?}"),
            Self::Prefix(p) => write!(f, "url starts with {p:?}"),
            Self::Contains(p) => write!(f, "url contains {p:?}"),
            Self::Regex(p) => write!(f, "url matches /{p}/"),
            Self::Glob(p) => write!(f, "url matches glob {p:?}"),
            Self::Any => write!(f, "any url"),
        }
    }
}
