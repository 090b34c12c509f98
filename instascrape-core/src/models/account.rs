//! Account profiles.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::json::{first_str, first_u64, flag_at, required_first_str, required_str, str_at};
use crate::error::CoreError;

// ============================================================================
// Account
// ============================================================================

/// An Instagram account profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Numeric account id.
    pub id: String,
    /// Handle, without the leading `@`.
    pub username: String,
    /// Display name.
    pub full_name: Option<String>,
    /// Profile text.
    pub biography: Option<String>,
    /// Link shown on the profile.
    pub external_url: Option<String>,
    /// Avatar URL (the HD variant when available).
    pub profile_pic_url: Option<String>,
    /// Follower count.
    pub followed_by_count: Option<u64>,
    /// Following count.
    pub follows_count: Option<u64>,
    /// Number of posts.
    pub media_count: Option<u64>,
    /// Whether the profile is private.
    pub is_private: bool,
    /// Whether the profile carries the verified badge.
    pub is_verified: bool,
}

impl Account {
    /// Maps the `user` object of an account page (`/{username}/?__a=1`).
    ///
    /// Both the legacy (`followed_by.count`) and graph-style
    /// (`edge_followed_by.count`) counter shapes are understood.
    pub fn from_account_page(user: &Value) -> Result<Self, CoreError> {
        Ok(Self {
            id: required_str(user, "/id")?,
            username: required_str(user, "/username")?,
            full_name: str_at(user, "/full_name"),
            biography: str_at(user, "/biography"),
            external_url: str_at(user, "/external_url"),
            profile_pic_url: first_str(user, &["/profile_pic_url_hd", "/profile_pic_url"]),
            followed_by_count: first_u64(
                user,
                &["/edge_followed_by/count", "/followed_by/count"],
            ),
            follows_count: first_u64(user, &["/edge_follow/count", "/follows/count"]),
            media_count: first_u64(
                user,
                &["/edge_owner_to_timeline_media/count", "/media/count"],
            ),
            is_private: flag_at(user, "/is_private"),
            is_verified: flag_at(user, "/is_verified"),
        })
    }

    /// Maps a `users[].user` entry from the general search endpoint.
    pub fn from_search_page(user: &Value) -> Result<Self, CoreError> {
        Ok(Self {
            id: required_first_str(user, &["/pk", "/id"])?,
            username: required_str(user, "/username")?,
            full_name: str_at(user, "/full_name"),
            biography: None,
            external_url: None,
            profile_pic_url: str_at(user, "/profile_pic_url"),
            followed_by_count: first_u64(user, &["/follower_count"]),
            follows_count: None,
            media_count: None,
            is_private: flag_at(user, "/is_private"),
            is_verified: flag_at(user, "/is_verified"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_account_page_graph_counters() {
        let user = json!({
            "id": "25025320",
            "username": "instagram",
            "full_name": "Instagram",
            "edge_followed_by": {"count": 100},
            "edge_follow": {"count": 5},
            "edge_owner_to_timeline_media": {"count": 7},
            "is_verified": true
        });
        let account = Account::from_account_page(&user).unwrap();
        assert_eq!(account.id, "25025320");
        assert_eq!(account.followed_by_count, Some(100));
        assert_eq!(account.follows_count, Some(5));
        assert_eq!(account.media_count, Some(7));
        assert!(account.is_verified);
        assert!(!account.is_private);
    }

    #[test]
    fn test_from_account_page_legacy_counters() {
        let user = json!({
            "id": 1,
            "username": "a",
            "followed_by": {"count": 9},
            "media": {"count": 2}
        });
        let account = Account::from_account_page(&user).unwrap();
        assert_eq!(account.id, "1");
        assert_eq!(account.followed_by_count, Some(9));
        assert_eq!(account.media_count, Some(2));
    }

    #[test]
    fn test_from_account_page_requires_username() {
        let err = Account::from_account_page(&json!({"id": "1"})).unwrap_err();
        assert!(matches!(err, CoreError::InvalidData(ref f) if f == "username"));
    }

    #[test]
    fn test_from_search_page_uses_pk() {
        let user = json!({"pk": "77", "username": "someone", "follower_count": 12});
        let account = Account::from_search_page(&user).unwrap();
        assert_eq!(account.id, "77");
        assert_eq!(account.followed_by_count, Some(12));
    }
}
