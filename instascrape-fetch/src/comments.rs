//! Batched backward walk over a post's comments.
//!
//! The comments endpoint serves at most [`MAX_COMMENTS_PER_REQUEST`] items
//! per call, so a large request is split into rounds. Each round asks for
//! comments older than the last id seen.

use std::collections::HashSet;

use async_trait::async_trait;
use tracing::debug;

use crate::error::ScrapeError;
use crate::pagination::{Page, RawItem};

/// Upper bound the comments endpoint accepts per request.
pub const MAX_COMMENTS_PER_REQUEST: usize = 300;

/// Fetches one batch of comments older than `max_id`.
#[async_trait]
pub trait BatchSource: Send + Sync {
    /// Fetches up to `size` comments. An empty `max_id` means newest first.
    async fn fetch_batch(&self, size: usize, max_id: &str) -> Result<Page, ScrapeError>;
}

/// Collects up to `count` comments starting before `max_id`.
///
/// The target shrinks to the total the endpoint reports. Stops once no
/// older comments remain, a round comes back empty, or an id repeats.
pub async fn fetch_comments<S>(
    source: &S,
    count: usize,
    max_id: &str,
) -> Result<Vec<RawItem>, ScrapeError>
where
    S: BatchSource + ?Sized,
{
    let requested = count;
    let mut count = count;
    let mut index = 0;
    let mut has_previous = true;
    let mut max_id = max_id.to_string();
    let mut comments = Vec::new();
    let mut seen = HashSet::new();

    while has_previous && index < count {
        let batch = (count - index).min(MAX_COMMENTS_PER_REQUEST);
        index += batch;

        let page = source.fetch_batch(batch, &max_id).await?;
        debug!(batch, max_id = %max_id, fetched = page.items.len(), "Fetched comment batch");

        has_previous = page.has_next_page;
        if let Some(total) = page.total {
            count = count.min(usize::try_from(total).unwrap_or(usize::MAX));
        }

        let Some(last) = page.items.last() else {
            return Ok(comments);
        };
        max_id.clone_from(&last.id);

        for item in page.items {
            if !seen.insert(item.id.clone()) {
                debug!(id = %item.id, "Duplicate comment, stopping");
                comments.truncate(requested);
                return Ok(comments);
            }
            comments.push(item);
        }
    }

    comments.truncate(requested);
    Ok(comments)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Mutex;

    /// Newest-first comment thread of `len` comments.
    struct Thread {
        ids: Vec<String>,
        reported_total: Option<u64>,
        calls: Mutex<Vec<(usize, String)>>,
    }

    impl Thread {
        fn new(len: usize) -> Self {
            Self {
                ids: (0..len).map(|n| format!("c{n}")).collect(),
                reported_total: Some(len as u64),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<(usize, String)> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl BatchSource for Thread {
        async fn fetch_batch(&self, size: usize, max_id: &str) -> Result<Page, ScrapeError> {
            self.calls.lock().unwrap().push((size, max_id.to_string()));
            let start = if max_id.is_empty() {
                0
            } else {
                self.ids.iter().position(|id| id == max_id).map_or(self.ids.len(), |p| p + 1)
            };
            let end = (start + size).min(self.ids.len());
            let items = self.ids[start..end]
                .iter()
                .map(|id| RawItem { id: id.clone(), node: json!({ "id": id }) })
                .collect();
            Ok(Page {
                items,
                end_cursor: String::new(),
                has_next_page: end < self.ids.len(),
                total: self.reported_total,
            })
        }
    }

    #[tokio::test]
    async fn test_splits_into_capped_rounds() {
        let thread = Thread::new(1000);
        let comments = fetch_comments(&thread, 500, "").await.unwrap();

        assert_eq!(comments.len(), 500);
        let calls = thread.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0], (300, String::new()));
        assert_eq!(calls[1], (200, "c299".to_string()));
    }

    #[tokio::test]
    async fn test_small_request_is_one_round() {
        let thread = Thread::new(50);
        let comments = fetch_comments(&thread, 10, "").await.unwrap();
        assert_eq!(comments.len(), 10);
        assert_eq!(thread.calls(), vec![(10, String::new())]);
    }

    #[tokio::test]
    async fn test_starts_before_given_max_id() {
        let thread = Thread::new(20);
        let comments = fetch_comments(&thread, 3, "c4").await.unwrap();
        let ids: Vec<_> = comments.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["c5", "c6", "c7"]);
    }

    #[tokio::test]
    async fn test_count_clamped_to_reported_total() {
        let mut thread = Thread::new(1000);
        thread.reported_total = Some(350);
        let comments = fetch_comments(&thread, 1000, "").await.unwrap();

        let calls = thread.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[1].0, 50);
        assert_eq!(comments.len(), 350);
    }

    #[tokio::test]
    async fn test_stops_when_no_older_comments() {
        let thread = Thread::new(120);
        let comments = fetch_comments(&thread, 900, "").await.unwrap();
        assert_eq!(comments.len(), 120);
        assert_eq!(thread.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_empty_round_returns_collected() {
        let mut thread = Thread::new(0);
        thread.reported_total = None;
        assert!(fetch_comments(&thread, 10, "").await.unwrap().is_empty());
        assert_eq!(thread.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_zero_count_makes_no_requests() {
        let thread = Thread::new(10);
        assert!(fetch_comments(&thread, 0, "").await.unwrap().is_empty());
        assert!(thread.calls().is_empty());
    }

    struct Stale;

    #[async_trait]
    impl BatchSource for Stale {
        async fn fetch_batch(&self, _size: usize, _max_id: &str) -> Result<Page, ScrapeError> {
            Ok(Page {
                items: vec![RawItem { id: "same".into(), node: json!({}) }],
                end_cursor: String::new(),
                has_next_page: true,
                total: None,
            })
        }
    }

    #[tokio::test]
    async fn test_duplicate_ids_stop_the_walk() {
        let comments = fetch_comments(&Stale, 600, "").await.unwrap();
        assert_eq!(comments.len(), 1);
    }
}
