//! Cursor pagination engine.
//!
//! Every paginated endpoint is reduced to a [`PageSource`]: a function from a
//! cursor to one [`Page`] of raw items. The engine walks those pages in two
//! modes that share the same fetch and extraction path:
//!
//! - [`accumulate`] - follow cursors until a target count is reached
//! - [`paginate`] - fetch one page and hand back a resumable [`Cursor`]

use std::collections::HashSet;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::error::ScrapeError;

// ============================================================================
// Types
// ============================================================================

/// One item from a page, uninterpreted apart from its id.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RawItem {
    /// Item id, used for duplicate detection.
    pub id: String,
    /// The raw JSON node.
    pub node: Value,
}

/// One fetched page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    /// Items in upstream order.
    pub items: Vec<RawItem>,
    /// Cursor for the following page.
    pub end_cursor: String,
    /// Whether upstream reports another page.
    pub has_next_page: bool,
    /// Total collection size, when upstream reports one.
    pub total: Option<u64>,
}

/// Position in a paginated collection.
///
/// The empty string means "first page".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Cursor {
    /// Opaque cursor token.
    pub value: String,
    /// Whether another page can be requested from here.
    pub has_next_page: bool,
}

impl Cursor {
    /// Cursor resuming at `value`.
    pub fn at(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            has_next_page: true,
        }
    }

    /// Returns true if no further page should be requested.
    pub fn is_terminal(&self) -> bool {
        !self.has_next_page
    }
}

/// Result of a single-page fetch.
#[derive(Debug, Clone, PartialEq)]
pub struct PageSlice {
    /// Items on the page.
    pub items: Vec<RawItem>,
    /// Where to resume.
    pub cursor: Cursor,
    /// Total collection size, when reported.
    pub total: Option<u64>,
}

/// Fetches one page for a cursor.
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Fetches the page starting at `cursor`.
    async fn fetch_page(&self, cursor: &str) -> Result<Page, ScrapeError>;
}

// ============================================================================
// Engine
// ============================================================================

/// Walks pages from `start` until `target` items are collected.
///
/// Stops early when a page is empty, when upstream reports no next page,
/// or when an id repeats. Never returns more than `target` items. Errors
/// abort the walk; partial results are discarded.
pub async fn accumulate<S>(
    source: &S,
    target: usize,
    start: &str,
) -> Result<Vec<RawItem>, ScrapeError>
where
    S: PageSource + ?Sized,
{
    let mut items = Vec::with_capacity(target.min(256));
    let mut seen = HashSet::new();
    let mut cursor = Cursor::at(start);

    while items.len() < target && cursor.has_next_page {
        let page = source.fetch_page(&cursor.value).await?;
        debug!(
            cursor = %cursor.value,
            fetched = page.items.len(),
            collected = items.len(),
            "Fetched page"
        );

        if page.items.is_empty() {
            return Ok(items);
        }

        for item in page.items {
            if items.len() == target {
                return Ok(items);
            }
            if !seen.insert(item.id.clone()) {
                debug!(id = %item.id, "Duplicate item, stopping");
                return Ok(items);
            }
            items.push(item);
        }

        cursor = Cursor {
            value: page.end_cursor,
            has_next_page: page.has_next_page,
        };
    }

    Ok(items)
}

/// Fetches the single page at `cursor`.
///
/// An empty page is terminal and keeps the cursor it was asked for.
pub async fn paginate<S>(source: &S, cursor: &str) -> Result<PageSlice, ScrapeError>
where
    S: PageSource + ?Sized,
{
    let page = source.fetch_page(cursor).await?;
    debug!(cursor, fetched = page.items.len(), "Fetched single page");

    if page.items.is_empty() {
        return Ok(PageSlice {
            items: Vec::new(),
            cursor: Cursor {
                value: cursor.to_string(),
                has_next_page: false,
            },
            total: page.total,
        });
    }

    Ok(PageSlice {
        items: page.items,
        cursor: Cursor {
            value: page.end_cursor,
            has_next_page: page.has_next_page,
        },
        total: page.total,
    })
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Serves fixed pages keyed by cursor.
    #[derive(Default)]
    struct Pages {
        pages: HashMap<String, Page>,
        fetches: AtomicUsize,
    }

    impl Pages {
        /// Builds a chain of pages with `sizes[i]` items each and ids
        /// numbered from 0 across the chain.
        fn chain(sizes: &[usize]) -> Self {
            let mut pages = HashMap::new();
            let mut next_id = 0;
            for (i, size) in sizes.iter().enumerate() {
                let items = (next_id..next_id + size).map(item).collect();
                next_id += size;
                pages.insert(
                    cursor_for(i),
                    Page {
                        items,
                        end_cursor: cursor_for(i + 1),
                        has_next_page: i + 1 < sizes.len(),
                        total: Some(sizes.iter().sum::<usize>() as u64),
                    },
                );
            }
            Self {
                pages,
                fetches: AtomicUsize::new(0),
            }
        }

        fn fetches(&self) -> usize {
            self.fetches.load(Ordering::SeqCst)
        }
    }

    fn cursor_for(i: usize) -> String {
        if i == 0 { String::new() } else { format!("c{i}") }
    }

    fn item(n: usize) -> RawItem {
        RawItem {
            id: n.to_string(),
            node: json!({ "id": n.to_string() }),
        }
    }

    fn ids(items: &[RawItem]) -> Vec<&str> {
        items.iter().map(|i| i.id.as_str()).collect()
    }

    #[async_trait]
    impl PageSource for Pages {
        async fn fetch_page(&self, cursor: &str) -> Result<Page, ScrapeError> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            Ok(self.pages.get(cursor).cloned().unwrap_or_default())
        }
    }

    struct Failing;

    #[async_trait]
    impl PageSource for Failing {
        async fn fetch_page(&self, _cursor: &str) -> Result<Page, ScrapeError> {
            Err(ScrapeError::NotFound("tag".into()))
        }
    }

    #[tokio::test]
    async fn test_never_exceeds_target() {
        let source = Pages::chain(&[5, 5, 5]);
        for target in 0..=20 {
            let items = accumulate(&source, target, "").await.unwrap();
            assert_eq!(items.len(), target.min(15), "target {target}");
        }
    }

    #[tokio::test]
    async fn test_zero_target_makes_no_requests() {
        let source = Pages::chain(&[5]);
        assert!(accumulate(&source, 0, "").await.unwrap().is_empty());
        assert_eq!(source.fetches(), 0);
    }

    #[tokio::test]
    async fn test_stops_mid_page_once_target_met() {
        let source = Pages::chain(&[5, 5, 5]);
        let items = accumulate(&source, 7, "").await.unwrap();
        assert_eq!(ids(&items), vec!["0", "1", "2", "3", "4", "5", "6"]);
        assert_eq!(source.fetches(), 2);
    }

    #[tokio::test]
    async fn test_stops_when_no_next_page() {
        let source = Pages::chain(&[3, 2]);
        let items = accumulate(&source, 100, "").await.unwrap();
        assert_eq!(items.len(), 5);
        assert_eq!(source.fetches(), 2);
    }

    #[tokio::test]
    async fn test_stops_on_empty_page() {
        let mut source = Pages::chain(&[3, 3]);
        source.pages.get_mut("c1").unwrap().items.clear();
        source.pages.get_mut("c1").unwrap().has_next_page = true;
        let items = accumulate(&source, 100, "").await.unwrap();
        assert_eq!(items.len(), 3);
        assert_eq!(source.fetches(), 2);
    }

    #[tokio::test]
    async fn test_duplicate_guard_returns_first_round_only() {
        let mut source = Pages::chain(&[3, 3]);
        // Stale cursor: the second page starts by repeating the first one.
        source.pages.get_mut("c1").unwrap().items = vec![item(0), item(9), item(10)];
        let items = accumulate(&source, 100, "").await.unwrap();
        assert_eq!(ids(&items), vec!["0", "1", "2"]);
    }

    #[tokio::test]
    async fn test_idempotent() {
        let source = Pages::chain(&[4, 4, 4]);
        let first = accumulate(&source, 10, "").await.unwrap();
        let second = accumulate(&source, 10, "").await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_resumes_from_start_cursor() {
        let source = Pages::chain(&[4, 4, 4]);
        let items = accumulate(&source, 100, "c1").await.unwrap();
        assert_eq!(ids(&items).first(), Some(&"4"));
        assert_eq!(items.len(), 8);
    }

    #[tokio::test]
    async fn test_paginate_then_resume_equals_accumulate() {
        let source = Pages::chain(&[4, 3, 5]);

        let first = paginate(&source, "").await.unwrap();
        assert!(first.cursor.has_next_page);
        let second = paginate(&source, &first.cursor.value).await.unwrap();

        let mut walked = first.items;
        walked.extend(second.items);

        let accumulated = accumulate(&source, walked.len(), "").await.unwrap();
        assert_eq!(walked, accumulated);
    }

    #[tokio::test]
    async fn test_paginate_last_page() {
        let source = Pages::chain(&[2, 2]);
        let slice = paginate(&source, "c1").await.unwrap();
        assert_eq!(ids(&slice.items), vec!["2", "3"]);
        assert!(slice.cursor.is_terminal());
        assert_eq!(slice.total, Some(4));
    }

    #[tokio::test]
    async fn test_paginate_empty_page_is_terminal() {
        let source = Pages::chain(&[2]);
        let slice = paginate(&source, "gone").await.unwrap();
        assert!(slice.items.is_empty());
        assert_eq!(slice.cursor.value, "gone");
        assert!(slice.cursor.is_terminal());
    }

    #[tokio::test]
    async fn test_errors_propagate() {
        assert!(accumulate(&Failing, 10, "").await.unwrap_err().is_not_found());
        assert!(paginate(&Failing, "").await.is_err());
    }
}
