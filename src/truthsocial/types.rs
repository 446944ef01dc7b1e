//! Truth Social (Mastodon-compatible) response types.
//!
//! Only the fields the helpers read are declared. Every field is optional so a
//! missing or `null` value never fails decoding.

use serde::Deserialize;

use crate::de;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Account {
    #[serde(default, deserialize_with = "de::id")]
    pub id: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub acct: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default, deserialize_with = "de::count")]
    pub followers_count: Option<u64>,
    #[serde(default, deserialize_with = "de::count")]
    pub following_count: Option<u64>,
    #[serde(default, deserialize_with = "de::count")]
    pub statuses_count: Option<u64>,
    #[serde(default)]
    pub verified: Option<bool>,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MediaAttachment {
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub preview_url: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Status {
    #[serde(default, deserialize_with = "de::id")]
    pub id: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    /// HTML body
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default, deserialize_with = "de::count")]
    pub replies_count: Option<u64>,
    #[serde(default, deserialize_with = "de::count")]
    pub reblogs_count: Option<u64>,
    #[serde(default, deserialize_with = "de::count")]
    pub favourites_count: Option<u64>,
    #[serde(default)]
    pub media_attachments: Option<Vec<MediaAttachment>>,
    #[serde(default)]
    pub account: Option<Account>,
    /// The boosted status when this one is a reblog; the wrapper's own `content` is empty
    #[serde(default)]
    pub reblog: Option<Box<Status>>,
}
