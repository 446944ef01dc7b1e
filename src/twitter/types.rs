use serde::Deserialize;

use crate::de;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiProblem {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub detail: Option<String>,
}

impl ApiProblem {
    pub fn describe(&self) -> String {
        match (&self.title, &self.detail) {
            (Some(title), Some(detail)) => format!("{}: {}", title, detail),
            (Some(text), None) | (None, Some(text)) => text.clone(),
            (None, None) => "unknown error".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserMetrics {
    #[serde(default, deserialize_with = "de::count")]
    pub followers_count: Option<u64>,
    #[serde(default, deserialize_with = "de::count")]
    pub following_count: Option<u64>,
    #[serde(default, deserialize_with = "de::count")]
    pub tweet_count: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct User {
    #[serde(default, deserialize_with = "de::id")]
    pub id: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub verified: Option<bool>,
    #[serde(default)]
    pub profile_image_url: Option<String>,
    #[serde(default)]
    pub public_metrics: Option<UserMetrics>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserResponse {
    #[serde(default)]
    pub data: Option<User>,
    #[serde(default)]
    pub errors: Option<Vec<ApiProblem>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TweetMetrics {
    #[serde(default, deserialize_with = "de::count")]
    pub retweet_count: Option<u64>,
    #[serde(default, deserialize_with = "de::count")]
    pub reply_count: Option<u64>,
    #[serde(default, deserialize_with = "de::count")]
    pub like_count: Option<u64>,
    #[serde(default, deserialize_with = "de::count")]
    pub quote_count: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReferencedTweet {
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default, deserialize_with = "de::id")]
    pub id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Attachments {
    #[serde(default)]
    pub media_keys: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Tweet {
    #[serde(default, deserialize_with = "de::id")]
    pub id: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub in_reply_to_user_id: Option<String>,
    #[serde(default)]
    pub public_metrics: Option<TweetMetrics>,
    #[serde(default)]
    pub referenced_tweets: Option<Vec<ReferencedTweet>>,
    #[serde(default)]
    pub attachments: Option<Attachments>,
}

impl Tweet {
    fn references(&self, kind: &str) -> bool {
        self.referenced_tweets
            .iter()
            .flatten()
            .any(|r| r.kind.as_deref() == Some(kind))
    }

    pub fn is_retweet(&self) -> bool {
        self.references("retweeted")
    }

    pub fn is_reply(&self) -> bool {
        self.in_reply_to_user_id.is_some() || self.references("replied_to")
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Media {
    #[serde(default)]
    pub media_key: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub preview_image_url: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Includes {
    #[serde(default)]
    pub media: Option<Vec<Media>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Meta {
    #[serde(default)]
    pub next_token: Option<String>,
    #[serde(default, deserialize_with = "de::count")]
    pub result_count: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TimelineResponse {
    #[serde(default)]
    pub data: Option<Vec<Tweet>>,
    #[serde(default)]
    pub includes: Option<Includes>,
    #[serde(default)]
    pub meta: Option<Meta>,
    #[serde(default)]
    pub errors: Option<Vec<ApiProblem>>,
}
