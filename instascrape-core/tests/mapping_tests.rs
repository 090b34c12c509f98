//! Integration tests for mapping realistic page payloads.

use instascrape_core::{code_to_media_id, Account, Comment, Location, Media, Tag};
use serde_json::json;

#[test]
fn test_tag_page_nodes_map_in_order() {
    let page = json!({
        "tag": {
            "media": {
                "count": 2,
                "nodes": [
                    {"id": "1", "code": "B", "date": 1, "owner": {"id": "9"}},
                    {"id": "2", "code": "C", "date": 2, "owner": {"id": "9"}}
                ],
                "page_info": {"has_next_page": false, "end_cursor": null}
            }
        }
    });
    let medias: Vec<Media> = page["tag"]["media"]["nodes"]
        .as_array()
        .unwrap()
        .iter()
        .map(|n| Media::from_tag_page(n).unwrap())
        .collect();
    assert_eq!(medias.len(), 2);
    assert_eq!(medias[1].shortcode, "C");
}

#[test]
fn test_shortcode_matches_id() {
    let media = Media::from_media_page(&json!({"id": "2481276043892498677", "shortcode": "CJvQ2ph5iD1"}))
        .unwrap();
    assert_eq!(
        code_to_media_id(&media.shortcode).map(|id| id.to_string()),
        Some(media.id)
    );
}

#[test]
fn test_search_payload() {
    let payload = json!({
        "status": "ok",
        "users": [{"user": {"pk": 1, "username": "a"}}],
        "hashtags": [{"hashtag": {"name": "b", "media_count": 3}}]
    });
    let account = Account::from_search_page(&payload["users"][0]["user"]).unwrap();
    let tag = Tag::from_search_page(&payload["hashtags"][0]["hashtag"]).unwrap();
    assert_eq!(account.username, "a");
    assert_eq!(tag.media_count, Some(3));
}

#[test]
fn test_comment_and_location_reject_partial_nodes() {
    assert!(Comment::from_api(&json!({"text": "no id"})).is_err());
    assert!(Location::from_json(&json!({"id": "1"})).is_err());
}
