//! Truth Social payload → output record mapping.

use log::warn;

use super::types::{Account, MediaAttachment, Status};
use crate::records::{AccountSummary, Media, Post};
use crate::text::to_plain_text;

pub const WEB_ORIGIN: &str = "https://truthsocial.com";

/// Canonical web URL of a status, used when the payload carries none.
pub fn status_url(handle: &str, id: &str) -> String {
    format!("{}/@{}/posts/{}", WEB_ORIGIN, handle, id)
}

pub fn normalize_account(account: &Account) -> AccountSummary {
    AccountSummary {
        id: account.id.clone().unwrap_or_default(),
        username: account
            .username
            .clone()
            .or_else(|| account.acct.clone())
            .unwrap_or_default(),
        display_name: account.display_name.clone().unwrap_or_default(),
        followers_count: account.followers_count.unwrap_or(0),
        following_count: account.following_count.unwrap_or(0),
        statuses_count: account.statuses_count.unwrap_or(0),
        verified: account.verified.unwrap_or(false),
        avatar: account.avatar.clone().unwrap_or_default(),
        url: account.url.clone().unwrap_or_default(),
        created_at: account.created_at.clone().unwrap_or_default(),
    }
}

fn normalize_media(attachment: &MediaAttachment) -> Media {
    Media {
        kind: attachment
            .kind
            .clone()
            .unwrap_or_else(|| "image".to_string()),
        url: attachment
            .url
            .clone()
            .or_else(|| attachment.preview_url.clone())
            .unwrap_or_default(),
    }
}

/// Maps one status into a [`Post`].
///
/// `handle` is only used to synthesize the URL when the status has none. For a
/// reblog, id, URL, timestamp and counters come from the wrapper; text, media and
/// author come from the boosted status.
pub fn normalize_status(status: &Status, handle: &str) -> Post {
    let source = status.reblog.as_deref().unwrap_or(status);
    let id = status.id.clone().unwrap_or_default();
    let url = match &status.url {
        Some(url) if !url.is_empty() => url.clone(),
        _ if !id.is_empty() => status_url(handle, &id),
        _ => String::new(),
    };

    Post {
        text: to_plain_text(source.content.as_deref().unwrap_or_default()),
        created_at: status.created_at.clone().unwrap_or_default(),
        replies_count: status.replies_count.unwrap_or(0),
        reblogs_count: status.reblogs_count.unwrap_or(0),
        favourites_count: status.favourites_count.unwrap_or(0),
        url,
        media: source
            .media_attachments
            .iter()
            .flatten()
            .map(normalize_media)
            .collect(),
        account: source
            .account
            .as_ref()
            .map(|account| normalize_account(account).to_author()),
        id,
    }
}

/// Maps up to `limit` statuses, skipping entries without an id.
pub fn normalize_statuses(statuses: &[Status], handle: &str, limit: usize) -> Vec<Post> {
    statuses
        .iter()
        .filter(|status| {
            let keep = status.id.is_some();
            if !keep {
                warn!("Skipping status without an id");
            }
            keep
        })
        .take(limit)
        .map(|status| normalize_status(status, handle))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn status(value: serde_json::Value) -> Status {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn preserves_identity_fields_verbatim() {
        let status = status(json!({
            "id": "113546871924539329",
            "created_at": "2024-11-25T01:03:40.046Z",
            "content": "<p>Hello &amp; welcome</p>",
            "url": "https://truthsocial.com/@realDonaldTrump/113546871924539329",
            "replies_count": 12034,
            "reblogs_count": 5210,
            "favourites_count": 40122
        }));
        let post = normalize_status(&status, "realDonaldTrump");

        assert_eq!(post.id, "113546871924539329");
        assert_eq!(post.created_at, "2024-11-25T01:03:40.046Z");
        assert_eq!(post.replies_count, 12034);
        assert_eq!(post.reblogs_count, 5210);
        assert_eq!(post.favourites_count, 40122);
        assert_eq!(
            post.url,
            "https://truthsocial.com/@realDonaldTrump/113546871924539329"
        );
        assert_eq!(post.text, "Hello & welcome");
    }

    #[test]
    fn missing_and_null_fields_default() {
        let post = normalize_status(
            &status(json!({"id": "1", "content": null, "url": null, "replies_count": null})),
            "someone",
        );
        assert_eq!(post.text, "");
        assert_eq!(post.created_at, "");
        assert_eq!(post.replies_count, 0);
        assert_eq!(post.url, "https://truthsocial.com/@someone/posts/1");
        assert!(post.media.is_empty());
        assert!(post.account.is_none());
    }

    #[test]
    fn media_and_account() {
        let post = normalize_status(
            &status(json!({
                "id": "2",
                "media_attachments": [
                    {"type": "video", "url": "https://static.example.com/a.mp4"},
                    {"preview_url": "https://static.example.com/b.png"}
                ],
                "account": {
                    "id": "107780257626128497",
                    "username": "realDonaldTrump",
                    "display_name": "Donald J. Trump",
                    "followers_count": 9000000,
                    "verified": true,
                    "avatar": "https://static.example.com/avatar.jpg"
                }
            })),
            "realDonaldTrump",
        );

        assert_eq!(
            post.media,
            vec![
                Media {
                    kind: "video".into(),
                    url: "https://static.example.com/a.mp4".into()
                },
                Media {
                    kind: "image".into(),
                    url: "https://static.example.com/b.png".into()
                },
            ]
        );
        let author = post.account.unwrap();
        assert_eq!(author.handle, "realDonaldTrump");
        assert_eq!(author.followers_count, 9000000);
        assert!(author.verified);
    }

    #[test]
    fn reblog_takes_content_from_boosted_status() {
        let post = normalize_status(
            &status(json!({
                "id": "9",
                "created_at": "2025-02-01T10:00:00.000Z",
                "content": "",
                "url": "https://truthsocial.com/@booster/9",
                "media_attachments": [],
                "account": {"username": "booster"},
                "reblog": {
                    "id": "8",
                    "content": "<p>original text</p>",
                    "media_attachments": [{"type": "image", "url": "https://static.example.com/c.jpg"}],
                    "account": {"username": "author"}
                }
            })),
            "booster",
        );

        assert_eq!(post.id, "9");
        assert_eq!(post.url, "https://truthsocial.com/@booster/9");
        assert_eq!(post.created_at, "2025-02-01T10:00:00.000Z");
        assert_eq!(post.text, "original text");
        assert_eq!(post.media.len(), 1);
        assert_eq!(post.account.unwrap().handle, "author");
    }

    #[test]
    fn limit_and_missing_ids() {
        let statuses: Vec<Status> = vec![
            status(json!({"id": "3"})),
            status(json!({"content": "<p>no id</p>"})),
            status(json!({"id": "2"})),
            status(json!({"id": "1"})),
        ];
        let posts = normalize_statuses(&statuses, "h", 2);
        let ids: Vec<&str> = posts.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["3", "2"]);
    }

    #[test]
    fn account_falls_back_to_acct() {
        let summary = normalize_account(&serde_json::from_value(json!({"id": 5, "acct": "alias"})).unwrap());
        assert_eq!(summary.id, "5");
        assert_eq!(summary.username, "alias");
    }
}
