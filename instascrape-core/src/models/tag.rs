//! Hashtags.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::json::{first_u64, required_str, str_at};
use crate::error::CoreError;

/// A hashtag as returned by the general search endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    /// Tag id, when present.
    pub id: Option<String>,
    /// Tag name without the `#`.
    pub name: String,
    /// Number of posts carrying the tag.
    pub media_count: Option<u64>,
}

impl Tag {
    /// Maps a `hashtags[].hashtag` search entry.
    pub fn from_search_page(hashtag: &Value) -> Result<Self, CoreError> {
        Ok(Self {
            id: str_at(hashtag, "/id"),
            name: required_str(hashtag, "/name")?,
            media_count: first_u64(hashtag, &["/media_count"]),
        })
    }
}
