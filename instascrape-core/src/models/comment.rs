//! Comments.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::json::{required_str, str_at, timestamp_at};
use super::media::Owner;
use crate::error::CoreError;

/// A comment on a post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    /// Comment id; also the cursor for walking further back.
    pub id: String,
    /// Comment text.
    pub text: String,
    /// When the comment was written.
    pub created_at: Option<DateTime<Utc>>,
    /// Who wrote it.
    pub owner: Option<Owner>,
}

impl Comment {
    /// Maps an `edge_media_to_comment.edges[].node`.
    pub fn from_api(node: &Value) -> Result<Self, CoreError> {
        let owner = str_at(node, "/owner/id").map(|id| Owner {
            id,
            username: str_at(node, "/owner/username"),
        });
        Ok(Self {
            id: required_str(node, "/id")?,
            text: required_str(node, "/text")?,
            created_at: timestamp_at(node, &["/created_at"]),
            owner,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_api() {
        let node = json!({
            "id": "179",
            "text": "nice",
            "created_at": 1_500_000_000,
            "owner": {"id": "3", "username": "c"}
        });
        let comment = Comment::from_api(&node).unwrap();
        assert_eq!(comment.id, "179");
        assert_eq!(comment.owner.unwrap().id, "3");
    }

    #[test]
    fn test_from_api_requires_text() {
        assert!(Comment::from_api(&json!({"id": "1"})).is_err());
    }
}
