//! Page-token based enumeration results.

use crate::annotations::Annotations;

/// One page of an enumeration.
///
/// `next_token` is opaque to the caller and is handed back verbatim to fetch
/// the following page. An empty token means the enumeration is complete.
#[derive(Debug, Clone, PartialEq)]
pub struct SyncPage<T> {
    pub items: Vec<T>,
    pub next_token: String,
    pub annotations: Annotations,
}

impl<T> SyncPage<T> {
    /// A page followed by `next_token`.
    #[must_use]
    pub fn new(items: Vec<T>, next_token: impl Into<String>) -> Self {
        Self {
            items,
            next_token: next_token.into(),
            annotations: Annotations::new(),
        }
    }

    /// A final page.
    #[must_use]
    pub fn last(items: Vec<T>) -> Self {
        Self::new(items, String::new())
    }

    /// An empty, final page.
    #[must_use]
    pub fn empty() -> Self {
        Self::last(Vec::new())
    }

    /// Whether another page is available.
    #[must_use]
    pub fn has_more(&self) -> bool {
        !self.next_token.is_empty()
    }
}
