//! Pagination envelope.

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// One page of results from a provider.
///
/// `has_more` always equals `next_cursor.is_some()`; [`Page::new`] derives it
/// and deserialization rejects payloads where the two disagree. Item order is
/// exactly the provider-returned order.
///
/// Cursors are opaque tokens owned by the issuing provider. The core never
/// parses or constructs one, only hands it back verbatim on the next request
/// to the same provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawPage<T>")]
pub struct Page<T> {
    items: Vec<T>,
    next_cursor: Option<String>,
    has_more: bool,
}

impl<T> Page<T> {
    /// Build a page; `has_more` is derived from cursor presence.
    pub fn new(items: Vec<T>, next_cursor: Option<String>) -> Self {
        let has_more = next_cursor.is_some();
        Self {
            items,
            next_cursor,
            has_more,
        }
    }

    /// A final page with no items.
    pub fn empty() -> Self {
        Self::new(Vec::new(), None)
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    pub fn next_cursor(&self) -> Option<&str> {
        self.next_cursor.as_deref()
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Wire shape; validated into [`Page`] on deserialization.
#[derive(Deserialize)]
struct RawPage<T> {
    #[serde(default = "Vec::new")]
    items: Vec<T>,
    #[serde(default)]
    next_cursor: Option<String>,
    #[serde(default)]
    has_more: bool,
}

impl<T> TryFrom<RawPage<T>> for Page<T> {
    type Error = Error;

    fn try_from(raw: RawPage<T>) -> Result<Self, Error> {
        match (raw.has_more, &raw.next_cursor) {
            (true, None) => Err(Error::validation(
                "page claims more items but carries no next_cursor",
            )),
            (false, Some(_)) => Err(Error::validation(
                "page carries a next_cursor but claims no more items",
            )),
            _ => Ok(Self {
                items: raw.items,
                next_cursor: raw.next_cursor,
                has_more: raw.has_more,
            }),
        }
    }
}
