//! Per-endpoint page shapes.
//!
//! Each paginated endpoint nests its items and page info under a different
//! path. An [`EdgeShape`] knows where, and turns a decoded body into a
//! [`Page`]. Node content beyond the id is passed through untouched.

use serde_json::Value;

use crate::classify::{require, require_array, Missing};
use crate::endpoints::Endpoints;
use crate::error::ScrapeError;
use crate::host::http::HttpOutcome;
use crate::pagination::{Page, RawItem};

/// Where a paginated endpoint keeps its items and cursor.
pub trait EdgeShape: Send + Sync {
    /// URL of the page at `cursor`.
    fn request(&self, endpoints: &Endpoints, cursor: &str) -> String;

    /// Extracts the page from a decoded body.
    fn extract(&self, outcome: &HttpOutcome, body: &Value) -> Result<Page, ScrapeError>;

    /// What is being paged, for errors and logs.
    fn describe(&self) -> String;
}

/// Reads an id that upstream sends either as a string or a number.
pub fn node_id(node: &Value) -> Option<String> {
    match node.get("id")? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Turns graph edges (`{"node": {...}}`) or bare nodes into raw items.
pub fn raw_items(outcome: &HttpOutcome, edges: &[Value]) -> Result<Vec<RawItem>, ScrapeError> {
    edges
        .iter()
        .map(|edge| {
            let node = edge.get("node").unwrap_or(edge);
            let id = node_id(node)
                .ok_or_else(|| ScrapeError::upstream(outcome, "item without id"))?;
            Ok(RawItem {
                id,
                node: node.clone(),
            })
        })
        .collect()
}

/// Reads a graph connection: items plus `page_info` and `count` siblings.
fn connection(
    outcome: &HttpOutcome,
    body: &Value,
    root: &str,
    items_key: &str,
) -> Result<Page, ScrapeError> {
    let container = require(outcome, body, root, Missing::Upstream, root)?;
    let edges = require_array(outcome, container, &format!("/{items_key}"))?;
    let items = raw_items(outcome, edges)?;

    let page_info = container.get("page_info");
    let end_cursor = page_info
        .and_then(|p| p.get("end_cursor"))
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    let has_next_page = page_info
        .and_then(|p| p.get("has_next_page"))
        .and_then(Value::as_bool)
        .unwrap_or(false);

    Ok(Page {
        items,
        end_cursor,
        has_next_page,
        total: container.get("count").and_then(Value::as_u64),
    })
}

// ============================================================================
// Shapes
// ============================================================================

/// Graphql account timeline, `data.user.edge_owner_to_timeline_media`.
#[derive(Debug, Clone)]
pub struct TimelineMedia {
    /// Numeric account id.
    pub user_id: String,
    /// Items requested per page.
    pub page_size: usize,
}

impl EdgeShape for TimelineMedia {
    fn request(&self, endpoints: &Endpoints, cursor: &str) -> String {
        endpoints.timeline_media(&self.user_id, self.page_size, cursor)
    }

    fn extract(&self, outcome: &HttpOutcome, body: &Value) -> Result<Page, ScrapeError> {
        connection(
            outcome,
            body,
            "/data/user/edge_owner_to_timeline_media",
            "edges",
        )
    }

    fn describe(&self) -> String {
        format!("timeline of account {}", self.user_id)
    }
}

/// Account `/media/` listing: `items` plus `more_available`, cursor is the
/// last item's id.
#[derive(Debug, Clone)]
pub struct AccountMedia {
    /// Account username.
    pub username: String,
}

impl EdgeShape for AccountMedia {
    fn request(&self, endpoints: &Endpoints, cursor: &str) -> String {
        endpoints.account_media_page(&self.username, cursor)
    }

    fn extract(&self, outcome: &HttpOutcome, body: &Value) -> Result<Page, ScrapeError> {
        let items = raw_items(outcome, require_array(outcome, body, "/items")?)?;
        let end_cursor = items.last().map(|i| i.id.clone()).unwrap_or_default();
        let has_next_page = body
            .get("more_available")
            .and_then(Value::as_bool)
            .unwrap_or(false);
        Ok(Page {
            items,
            end_cursor,
            has_next_page,
            total: None,
        })
    }

    fn describe(&self) -> String {
        format!("media of account {}", self.username)
    }
}

/// Tag explore page, `tag.media`.
#[derive(Debug, Clone)]
pub struct TagMedia {
    /// Tag name without `#`.
    pub tag: String,
}

impl EdgeShape for TagMedia {
    fn request(&self, endpoints: &Endpoints, cursor: &str) -> String {
        endpoints.tag_media(&self.tag, cursor)
    }

    fn extract(&self, outcome: &HttpOutcome, body: &Value) -> Result<Page, ScrapeError> {
        connection(outcome, body, "/tag/media", "nodes")
    }

    fn describe(&self) -> String {
        format!("tag {}", self.tag)
    }
}

/// Location explore page, `location.media`.
#[derive(Debug, Clone)]
pub struct LocationMedia {
    /// Location id.
    pub location_id: String,
}

impl EdgeShape for LocationMedia {
    fn request(&self, endpoints: &Endpoints, cursor: &str) -> String {
        endpoints.location_media(&self.location_id, cursor)
    }

    fn extract(&self, outcome: &HttpOutcome, body: &Value) -> Result<Page, ScrapeError> {
        connection(outcome, body, "/location/media", "nodes")
    }

    fn describe(&self) -> String {
        format!("location {}", self.location_id)
    }
}

/// One comment batch, `data.shortcode_media.edge_media_to_comment`.
///
/// `has_next_page` here means older comments remain.
#[derive(Debug, Clone)]
pub struct CommentBatch {
    /// Post shortcode.
    pub code: String,
    /// Comments requested in this batch.
    pub first: usize,
}

impl EdgeShape for CommentBatch {
    fn request(&self, endpoints: &Endpoints, cursor: &str) -> String {
        endpoints.comments_before(&self.code, self.first, cursor)
    }

    fn extract(&self, outcome: &HttpOutcome, body: &Value) -> Result<Page, ScrapeError> {
        connection(
            outcome,
            body,
            "/data/shortcode_media/edge_media_to_comment",
            "edges",
        )
    }

    fn describe(&self) -> String {
        format!("comments of {}", self.code)
    }
}
