//! Media (posts) and media identifiers.
//!
//! The web API returns posts in four shapes depending on the endpoint:
//!
//! - the `graphql.shortcode_media` object of a post page
//! - graph timeline edges (`edge_owner_to_timeline_media.edges[].node`)
//! - legacy tag/location nodes (`tag.media.nodes[]`, `top_posts.nodes[]`)
//! - the `items[]` of an account's `/media/` listing
//!
//! Each has its own constructor; all of them produce the same [`Media`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use super::json::{
    first_str, first_u64, flag_at, required_first_str, str_at, timestamp_at,
};
use crate::error::CoreError;

/// Instagram's URL-safe base64 alphabet used for shortcodes.
const SHORTCODE_ALPHABET: &[u8; 64] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-_";

// ============================================================================
// Media Kind
// ============================================================================

/// What a post contains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    /// Single image.
    #[default]
    Image,
    /// Single video.
    Video,
    /// Carousel of several images/videos.
    Sidecar,
}

impl MediaKind {
    /// Maps a graph `__typename` (`GraphImage`, `GraphVideo`, `GraphSidecar`).
    fn from_typename(typename: Option<&str>, is_video: bool) -> Self {
        match typename {
            Some("GraphSidecar") => Self::Sidecar,
            Some("GraphVideo") => Self::Video,
            Some("GraphImage") => Self::Image,
            _ if is_video => Self::Video,
            _ => Self::Image,
        }
    }

    /// Maps the legacy `type` field (`image`, `video`, `carousel`).
    fn from_api_type(kind: Option<&str>) -> Self {
        match kind {
            Some("video") => Self::Video,
            Some("carousel") => Self::Sidecar,
            _ => Self::Image,
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Image => "image",
            Self::Video => "video",
            Self::Sidecar => "sidecar",
        };
        f.write_str(s)
    }
}

// ============================================================================
// Owner
// ============================================================================

/// Minimal reference to the account that posted something.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Owner {
    /// Numeric account id.
    pub id: String,
    /// Handle, when the endpoint includes it.
    pub username: Option<String>,
}

impl Owner {
    fn from_node(node: &Value, id_ptr: &str, username_ptr: &str) -> Option<Self> {
        Some(Self {
            id: str_at(node, id_ptr)?,
            username: str_at(node, username_ptr),
        })
    }
}

// ============================================================================
// Media
// ============================================================================

/// A single post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Media {
    /// Numeric media id.
    pub id: String,
    /// URL shortcode (`/p/{shortcode}/`).
    pub shortcode: String,
    /// Content kind.
    pub kind: MediaKind,
    /// Caption text.
    pub caption: Option<String>,
    /// When the post was published.
    pub created_at: Option<DateTime<Utc>>,
    /// Full-size image URL.
    pub display_url: Option<String>,
    /// Video URL for video posts.
    pub video_url: Option<String>,
    /// Like count.
    pub likes_count: Option<u64>,
    /// Comment count.
    pub comments_count: Option<u64>,
    /// Posting account.
    pub owner: Option<Owner>,
    /// Location name, if tagged.
    pub location_name: Option<String>,
}

impl Media {
    /// Maps `graphql.shortcode_media` from a post page.
    pub fn from_media_page(node: &Value) -> Result<Self, CoreError> {
        Self::from_graph_node(node)
    }

    /// Maps a graph timeline edge node.
    pub fn from_timeline_node(node: &Value) -> Result<Self, CoreError> {
        Self::from_graph_node(node)
    }

    fn from_graph_node(node: &Value) -> Result<Self, CoreError> {
        let is_video = flag_at(node, "/is_video");
        Ok(Self {
            id: required_first_str(node, &["/id"])?,
            shortcode: required_first_str(node, &["/shortcode", "/code"])?,
            kind: MediaKind::from_typename(
                node.get("__typename").and_then(Value::as_str),
                is_video,
            ),
            caption: str_at(node, "/edge_media_to_caption/edges/0/node/text"),
            created_at: timestamp_at(node, &["/taken_at_timestamp"]),
            display_url: str_at(node, "/display_url"),
            video_url: str_at(node, "/video_url"),
            likes_count: first_u64(
                node,
                &["/edge_media_preview_like/count", "/edge_liked_by/count"],
            ),
            comments_count: first_u64(
                node,
                &[
                    "/edge_media_to_comment/count",
                    "/edge_media_to_parent_comment/count",
                ],
            ),
            owner: Owner::from_node(node, "/owner/id", "/owner/username"),
            location_name: str_at(node, "/location/name"),
        })
    }

    /// Maps a tag, location or top-post node.
    ///
    /// These nodes come in the legacy flat shape (`code`, `date`,
    /// `display_src`, `likes.count`) or, on newer pages, the graph shape; both
    /// are accepted field by field.
    pub fn from_tag_page(node: &Value) -> Result<Self, CoreError> {
        let is_video = flag_at(node, "/is_video");
        Ok(Self {
            id: required_first_str(node, &["/id"])?,
            shortcode: required_first_str(node, &["/code", "/shortcode"])?,
            kind: MediaKind::from_typename(
                node.get("__typename").and_then(Value::as_str),
                is_video,
            ),
            caption: first_str(
                node,
                &["/caption", "/edge_media_to_caption/edges/0/node/text"],
            ),
            created_at: timestamp_at(node, &["/date", "/taken_at_timestamp"]),
            display_url: first_str(node, &["/display_src", "/display_url"]),
            video_url: str_at(node, "/video_url"),
            likes_count: first_u64(node, &["/likes/count", "/edge_liked_by/count"]),
            comments_count: first_u64(
                node,
                &["/comments/count", "/edge_media_to_comment/count"],
            ),
            owner: Owner::from_node(node, "/owner/id", "/owner/username"),
            location_name: None,
        })
    }

    /// Maps an `items[]` entry of an account's `/media/` listing.
    ///
    /// Item ids there look like `{media}_{owner}`; only the media part is kept.
    pub fn from_api(item: &Value) -> Result<Self, CoreError> {
        let raw_id = required_first_str(item, &["/id"])?;
        let id = raw_id.split('_').next().unwrap_or(&raw_id).to_string();
        Ok(Self {
            id,
            shortcode: required_first_str(item, &["/code", "/shortcode"])?,
            kind: MediaKind::from_api_type(item.get("type").and_then(Value::as_str)),
            caption: str_at(item, "/caption/text"),
            created_at: timestamp_at(item, &["/created_time"]),
            display_url: str_at(item, "/images/standard_resolution/url"),
            video_url: str_at(item, "/videos/standard_resolution/url"),
            likes_count: first_u64(item, &["/likes/count"]),
            comments_count: first_u64(item, &["/comments/count"]),
            owner: Owner::from_node(item, "/user/id", "/user/username"),
            location_name: str_at(item, "/location/name"),
        })
    }

    /// Returns the post page URL for a media id under `base_url`.
    pub fn link_from_id(base_url: &str, media_id: &str) -> Result<String, CoreError> {
        let code = Self::code_from_id(media_id)?;
        Ok(format!("{}/p/{}/", base_url.trim_end_matches('/'), code))
    }

    /// Returns the shortcode for a media id (`123` or `123_456`).
    pub fn code_from_id(media_id: &str) -> Result<String, CoreError> {
        let numeric = media_id.split('_').next().unwrap_or(media_id);
        let id: u64 = numeric
            .parse()
            .map_err(|_| CoreError::InvalidId(format!("media id must be numeric: {media_id}")))?;
        Ok(media_id_to_code(id))
    }
}

// ============================================================================
// Shortcodes
// ============================================================================

/// Converts a numeric media id to its shortcode.
pub fn media_id_to_code(media_id: u64) -> String {
    if media_id == 0 {
        return String::from("A");
    }

    let mut id = media_id;
    let mut chars = Vec::new();
    while id > 0 {
        chars.push(SHORTCODE_ALPHABET[(id % 64) as usize] as char);
        id /= 64;
    }
    chars.iter().rev().collect()
}

/// Converts a shortcode back to its numeric media id.
///
/// Returns `None` for characters outside the alphabet or on overflow.
pub fn code_to_media_id(code: &str) -> Option<u64> {
    let mut id: u64 = 0;
    for ch in code.bytes() {
        let pos = SHORTCODE_ALPHABET.iter().position(|&c| c == ch)?;
        id = id.checked_mul(64)?.checked_add(pos as u64)?;
    }
    Some(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_media_id_to_code_known_value() {
        assert_eq!(media_id_to_code(2_481_276_043_892_498_677), "CJvQ2ph5iD1");
        assert_eq!(media_id_to_code(0), "A");
        assert_eq!(media_id_to_code(64), "BA");
    }

    #[test]
    fn test_code_to_media_id() {
        assert_eq!(code_to_media_id("CJvQ2ph5iD1"), Some(2_481_276_043_892_498_677));
        assert_eq!(code_to_media_id("bad!"), None);
    }

    #[test]
    fn test_link_from_id_strips_owner_suffix() {
        let link = Media::link_from_id("https://www.instagram.com/", "64_123").unwrap();
        assert_eq!(link, "https://www.instagram.com/p/BA/");
    }

    #[test]
    fn test_code_from_id_rejects_non_numeric() {
        assert!(matches!(
            Media::code_from_id("abc"),
            Err(CoreError::InvalidId(_))
        ));
    }

    #[test]
    fn test_from_media_page() {
        let node = json!({
            "id": "1",
            "shortcode": "B",
            "__typename": "GraphSidecar",
            "edge_media_to_caption": {"edges": [{"node": {"text": "hello #rust"}}]},
            "edge_media_preview_like": {"count": 10},
            "edge_media_to_comment": {"count": 2},
            "taken_at_timestamp": 1_600_000_000,
            "owner": {"id": "9", "username": "owner"}
        });
        let media = Media::from_media_page(&node).unwrap();
        assert_eq!(media.kind, MediaKind::Sidecar);
        assert_eq!(media.caption.as_deref(), Some("hello #rust"));
        assert_eq!(media.likes_count, Some(10));
        assert_eq!(media.owner.unwrap().username.as_deref(), Some("owner"));
    }

    #[test]
    fn test_from_tag_page_legacy_shape() {
        let node = json!({
            "id": "5",
            "code": "F",
            "date": 1_500_000_000,
            "display_src": "https://cdn/x.jpg",
            "caption": "tagged",
            "likes": {"count": 3},
            "comments": {"count": 1},
            "is_video": true,
            "owner": {"id": "2"}
        });
        let media = Media::from_tag_page(&node).unwrap();
        assert_eq!(media.shortcode, "F");
        assert_eq!(media.kind, MediaKind::Video);
        assert_eq!(media.display_url.as_deref(), Some("https://cdn/x.jpg"));
    }

    #[test]
    fn test_from_api_item() {
        let item = json!({
            "id": "100_200",
            "code": "Bk",
            "type": "carousel",
            "created_time": "1500000000",
            "caption": {"text": "api"},
            "user": {"id": "200", "username": "u"}
        });
        let media = Media::from_api(&item).unwrap();
        assert_eq!(media.id, "100");
        assert_eq!(media.kind, MediaKind::Sidecar);
        assert_eq!(media.created_at.unwrap().timestamp(), 1_500_000_000);
    }

    #[test]
    fn test_missing_shortcode_is_invalid() {
        assert!(Media::from_tag_page(&json!({"id": "1"})).is_err());
    }
}
