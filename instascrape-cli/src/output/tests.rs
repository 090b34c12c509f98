//! CLI output formatting tests.
//!
//! These tests verify that CLI output is correctly formatted for both
//! text and JSON output modes.

#[cfg(test)]
mod text_formatter_tests {
    use super::super::text::{format_number, preview, TextFormatter};
    use instascrape_core::{Account, Comment, Location, Media, MediaKind, Owner, Tag};
    use instascrape_fetch::MediaPage;

    fn media(code: &str, caption: Option<&str>) -> Media {
        Media {
            id: "1".to_string(),
            shortcode: code.to_string(),
            kind: MediaKind::Image,
            caption: caption.map(str::to_string),
            created_at: None,
            display_url: Some("https://cdn.example/1.jpg".to_string()),
            video_url: None,
            likes_count: Some(1_240),
            comments_count: Some(3),
            owner: Some(Owner {
                id: "7".to_string(),
                username: Some("jane".to_string()),
            }),
            location_name: None,
        }
    }

    fn account() -> Account {
        Account {
            id: "42".to_string(),
            username: "natgeo".to_string(),
            full_name: Some("National Geographic".to_string()),
            biography: Some("Experience the world".to_string()),
            external_url: None,
            profile_pic_url: None,
            followed_by_count: Some(2_500_000),
            follows_count: Some(150),
            media_count: None,
            is_private: false,
            is_verified: true,
        }
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(999), "999");
        assert_eq!(format_number(1_240), "1.2K");
        assert_eq!(format_number(2_500_000), "2.5M");
    }

    #[test]
    fn test_preview_cuts_first_line() {
        assert_eq!(preview("short", 10), "short");
        assert_eq!(preview("first line\nsecond", 20), "first line");
        assert_eq!(preview("abcdefghij", 5), "abcd…");
    }

    #[test]
    fn test_format_account_without_colors() {
        let formatter = TextFormatter::new(false);
        let output = formatter.format_account(&account());

        assert!(output.starts_with("@natgeo ✓"));
        assert!(output.contains("National Geographic"));
        assert!(output.contains("2.5M followers"));
        assert!(output.contains("? posts"));
        assert!(!output.contains('\x1b'));
    }

    #[test]
    fn test_format_account_with_colors() {
        let formatter = TextFormatter::new(true);
        let output = formatter.format_account(&account());
        assert!(output.contains("\x1b[1m@natgeo\x1b[0m"));
    }

    #[test]
    fn test_format_media_detail() {
        let formatter = TextFormatter::new(false);
        let output = formatter.format_media(&media("BxYz", Some("Sunset over the bay")));

        assert!(output.contains("BxYz (image, id 1)"));
        assert!(output.contains("By:       @jane"));
        assert!(output.contains("Likes:    1.2K"));
        assert!(output.ends_with("Sunset over the bay"));
    }

    #[test]
    fn test_format_media_list_counts_items() {
        let formatter = TextFormatter::new(false);
        let output = formatter.format_media_list(&[media("A", None), media("B", Some("hi"))]);
        let lines: Vec<&str> = output.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with('A'));
        assert_eq!(lines[2], "2 posts");
    }

    #[test]
    fn test_format_empty_lists() {
        let formatter = TextFormatter::new(false);
        assert_eq!(formatter.format_media_list(&[]), "No posts");
        assert_eq!(formatter.format_comments(&[]), "No comments");
        assert_eq!(formatter.format_accounts(&[]), "No accounts");
        assert_eq!(formatter.format_tags(&[]), "No hashtags");
    }

    #[test]
    fn test_format_media_page_shows_resume_cursor() {
        let formatter = TextFormatter::new(false);
        let page = MediaPage {
            medias: vec![media("A", None)],
            max_id: "QVFD".to_string(),
            has_next_page: true,
            total: Some(120),
        };
        let output = formatter.format_media_page(&page);
        assert!(output.contains("120 in total"));
        assert!(output.ends_with("Next page: --max-id QVFD"));

        let last = MediaPage {
            has_next_page: false,
            ..page
        };
        assert!(formatter.format_media_page(&last).ends_with("Last page"));
    }

    #[test]
    fn test_format_comments() {
        let formatter = TextFormatter::new(false);
        let comments = vec![
            Comment {
                id: "c1".to_string(),
                text: "nice".to_string(),
                created_at: None,
                owner: Some(Owner {
                    id: "1".to_string(),
                    username: Some("bob".to_string()),
                }),
            },
            Comment {
                id: "c2".to_string(),
                text: "wow".to_string(),
                created_at: None,
                owner: None,
            },
        ];
        let output = formatter.format_comments(&comments);
        assert_eq!(output, "@bob: nice\nunknown: wow\n2 comments");
    }

    #[test]
    fn test_format_tags_and_location() {
        let formatter = TextFormatter::new(false);
        let tags = vec![Tag {
            id: None,
            name: "sunset".to_string(),
            media_count: Some(3_000),
        }];
        assert!(formatter.format_tags(&tags).contains("#sunset"));

        let location = Location {
            id: "123".to_string(),
            name: "Berlin".to_string(),
            slug: Some("berlin".to_string()),
            lat: Some(52.52),
            lng: Some(13.405),
            has_public_page: true,
        };
        let output = formatter.format_location(&location);
        assert!(output.starts_with("Berlin (id 123)"));
        assert!(output.contains("Coords: 52.52000, 13.40500"));
    }

    #[test]
    fn test_format_flag() {
        let formatter = TextFormatter::new(false);
        assert_eq!(formatter.format_flag("Keychain", true), "Keychain:        yes");
        assert_eq!(formatter.format_flag("Keychain", false), "Keychain:        no");
    }
}

#[cfg(test)]
mod json_formatter_tests {
    use super::super::json::{list, JsonFormatter, SearchOutput};
    use instascrape_core::{Account, Tag};
    use instascrape_fetch::MediaPage;

    #[test]
    fn test_media_page_json_omits_missing_total() {
        let formatter = JsonFormatter::new(false);
        let page = MediaPage {
            medias: vec![],
            max_id: String::new(),
            has_next_page: false,
            total: None,
        };
        let output = formatter.format(&page).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();

        assert_eq!(value["has_next_page"], false);
        assert!(value.get("total").is_none());
    }

    #[test]
    fn test_search_output_skips_unrequested_sections() {
        let formatter = JsonFormatter::new(false);
        let tags = vec![Tag {
            id: Some("1".to_string()),
            name: "coffee".to_string(),
            media_count: None,
        }];
        let output = SearchOutput {
            query: "coffee",
            accounts: None,
            tags: Some(&tags),
        };
        let value: serde_json::Value =
            serde_json::from_str(&formatter.format(&output).unwrap()).unwrap();

        assert_eq!(value["query"], "coffee");
        assert!(value.get("accounts").is_none());
        assert_eq!(value["tags"][0]["name"], "coffee");
    }

    #[test]
    fn test_list_of_accounts() {
        let formatter = JsonFormatter::new(true);
        let accounts: Vec<Account> = vec![];
        let output = formatter.format(&list(&accounts)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["count"], 0);
        assert!(value["items"].as_array().unwrap().is_empty());
    }
}
