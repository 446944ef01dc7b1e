//! Twitter web (GraphQL) payload shapes, as relayed by the data API.
//!
//! Profiles live at `data.user.result`; timelines are a list of instructions whose
//! `TimelineAddEntries` entries carry either a tweet (`tweet-<id>`) or a paging
//! cursor (`cursor-bottom-<n>`).

use serde::Deserialize;
use serde_json::Value;

use crate::de;

/// The `{"result": ...}` wrapper every data API response uses.
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope<T> {
    #[serde(default)]
    pub result: Option<T>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileResult {
    #[serde(default)]
    pub data: Option<ProfileData>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileData {
    #[serde(default)]
    pub user: Option<UserResults>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserResults {
    #[serde(default)]
    pub result: Option<User>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct User {
    #[serde(default, deserialize_with = "de::id")]
    pub rest_id: Option<String>,
    #[serde(default)]
    pub is_blue_verified: Option<bool>,
    #[serde(default)]
    pub core: Option<UserCore>,
    #[serde(default)]
    pub legacy: Option<UserLegacy>,
    #[serde(default)]
    pub avatar: Option<Avatar>,
    #[serde(default)]
    pub verification: Option<Verification>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserCore {
    #[serde(default)]
    pub screen_name: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserLegacy {
    #[serde(default)]
    pub screen_name: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "de::count")]
    pub followers_count: Option<u64>,
    #[serde(default, deserialize_with = "de::count")]
    pub friends_count: Option<u64>,
    #[serde(default, deserialize_with = "de::count")]
    pub statuses_count: Option<u64>,
    #[serde(default)]
    pub verified: Option<bool>,
    #[serde(default)]
    pub profile_image_url_https: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Avatar {
    #[serde(default)]
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Verification {
    #[serde(default)]
    pub verified: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TimelineResult {
    #[serde(default)]
    pub timeline: Option<Timeline>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Timeline {
    #[serde(default)]
    pub instructions: Option<Vec<Instruction>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Instruction {
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub entries: Option<Vec<Entry>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Entry {
    #[serde(default, rename = "entryId")]
    pub entry_id: Option<String>,
    #[serde(default)]
    pub content: Option<EntryContent>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EntryContent {
    #[serde(default, rename = "itemContent")]
    pub item_content: Option<ItemContent>,
    /// Cursor value on `cursor-*` entries
    #[serde(default)]
    pub value: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ItemContent {
    #[serde(default)]
    pub tweet_results: Option<TweetResults>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TweetResults {
    #[serde(default)]
    pub result: Option<Tweet>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Tweet {
    #[serde(default, deserialize_with = "de::id")]
    pub rest_id: Option<String>,
    #[serde(default)]
    pub legacy: Option<TweetLegacy>,
    /// Set on `TweetWithVisibilityResults` wrappers
    #[serde(default)]
    pub tweet: Option<Box<Tweet>>,
}

impl Tweet {
    /// Unwraps visibility wrappers down to the tweet itself.
    pub fn inner(&self) -> &Tweet {
        match &self.tweet {
            Some(inner) if self.legacy.is_none() => inner.inner(),
            _ => self,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TweetLegacy {
    #[serde(default, deserialize_with = "de::id")]
    pub id_str: Option<String>,
    #[serde(default)]
    pub full_text: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default, deserialize_with = "de::count")]
    pub retweet_count: Option<u64>,
    #[serde(default, deserialize_with = "de::count")]
    pub favorite_count: Option<u64>,
    #[serde(default, deserialize_with = "de::count")]
    pub reply_count: Option<u64>,
    #[serde(default, deserialize_with = "de::count")]
    pub quote_count: Option<u64>,
    #[serde(default)]
    pub retweeted_status_result: Option<Value>,
    #[serde(default)]
    pub in_reply_to_status_id_str: Option<String>,
    #[serde(default)]
    pub entities: Option<Entities>,
    #[serde(default)]
    pub extended_entities: Option<Entities>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Entities {
    #[serde(default)]
    pub media: Option<Vec<Media>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Media {
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub media_url_https: Option<String>,
    #[serde(default)]
    pub media_url: Option<String>,
}
