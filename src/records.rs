//! Output records.
//!
//! These are the flattened shapes printed to stdout. They are built from a provider
//! payload, serialized once and dropped.

use serde::Serialize;

/// A media attachment on a post or tweet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Media {
    #[serde(rename = "type")]
    pub kind: String,
    pub url: String,
}

/// Summary of the account that wrote a post.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Author {
    pub handle: String,
    pub display_name: String,
    pub followers_count: u64,
    pub verified: bool,
    pub avatar_url: String,
}

/// A Truth Social status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Post {
    pub id: String,
    pub text: String,
    pub created_at: String,
    pub replies_count: u64,
    pub reblogs_count: u64,
    pub favourites_count: u64,
    pub url: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub media: Vec<Media>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account: Option<Author>,
}

/// A tweet, from either Twitter backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tweet {
    pub id: String,
    pub text: String,
    pub created_at: String,
    pub reply_count: u64,
    pub retweet_count: u64,
    pub favorite_count: u64,
    pub quote_count: u64,
    pub is_retweet: bool,
    pub is_reply: bool,
    pub url: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub media: Vec<Media>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<Author>,
}

/// Result of a Truth Social account lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AccountSummary {
    pub id: String,
    pub username: String,
    pub display_name: String,
    pub followers_count: u64,
    pub following_count: u64,
    pub statuses_count: u64,
    pub verified: bool,
    pub avatar: String,
    pub url: String,
    pub created_at: String,
}

impl AccountSummary {
    /// The embedded author form of this account.
    pub fn to_author(&self) -> Author {
        Author {
            handle: self.username.clone(),
            display_name: self.display_name.clone(),
            followers_count: self.followers_count,
            verified: self.verified,
            avatar_url: self.avatar.clone(),
        }
    }
}

/// A Twitter user profile.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TwitterProfile {
    pub rest_id: String,
    pub screen_name: String,
    pub name: String,
    pub description: String,
    pub followers_count: u64,
    pub friends_count: u64,
    pub statuses_count: u64,
    pub verified: bool,
    pub profile_image_url: String,
    pub created_at: String,
}

impl TwitterProfile {
    pub fn to_author(&self) -> Author {
        Author {
            handle: self.screen_name.clone(),
            display_name: self.name.clone(),
            followers_count: self.followers_count,
            verified: self.verified,
            avatar_url: self.profile_image_url.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_media_and_missing_account_are_omitted() {
        let post = Post {
            id: "1".into(),
            text: "hi".into(),
            created_at: "2024-01-01T00:00:00.000Z".into(),
            replies_count: 0,
            reblogs_count: 0,
            favourites_count: 0,
            url: "https://truthsocial.com/@a/posts/1".into(),
            media: Vec::new(),
            account: None,
        };
        let value = serde_json::to_value(&post).unwrap();
        assert!(value.get("media").is_none());
        assert!(value.get("account").is_none());
    }

    #[test]
    fn media_kind_serializes_as_type() {
        let media = Media {
            kind: "video".into(),
            url: "https://cdn.example.com/v.mp4".into(),
        };
        assert_eq!(
            serde_json::to_value(&media).unwrap(),
            json!({"type": "video", "url": "https://cdn.example.com/v.mp4"})
        );
    }
}
