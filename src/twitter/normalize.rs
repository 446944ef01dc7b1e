//! Twitter payload → output record mapping, for both backends.

use log::{debug, warn};
use std::collections::HashMap;

use super::graphql;
use super::types;
use crate::records::{Author, Media, Tweet, TwitterProfile};
use crate::text::to_plain_text;

pub const WEB_ORIGIN: &str = "https://x.com";

/// Canonical web URL of a tweet.
pub fn tweet_url(screen_name: &str, id: &str) -> String {
    if screen_name.is_empty() {
        format!("{}/i/web/status/{}", WEB_ORIGIN, id)
    } else {
        format!("{}/{}/status/{}", WEB_ORIGIN, screen_name, id)
    }
}

/// Maps an API v2 user into a profile.
pub fn profile_from_v2(user: &types::User) -> TwitterProfile {
    let metrics = user.public_metrics.clone().unwrap_or_default();
    TwitterProfile {
        rest_id: user.id.clone().unwrap_or_default(),
        screen_name: user.username.clone().unwrap_or_default(),
        name: user.name.clone().unwrap_or_default(),
        description: user.description.clone().unwrap_or_default(),
        followers_count: metrics.followers_count.unwrap_or(0),
        friends_count: metrics.following_count.unwrap_or(0),
        statuses_count: metrics.tweet_count.unwrap_or(0),
        verified: user.verified.unwrap_or(false),
        profile_image_url: user.profile_image_url.clone().unwrap_or_default(),
        created_at: user.created_at.clone().unwrap_or_default(),
    }
}

/// Index of `includes.media` by media key.
pub fn media_index(includes: Option<&types::Includes>) -> HashMap<String, Media> {
    includes
        .and_then(|i| i.media.as_ref())
        .into_iter()
        .flatten()
        .filter_map(|m| {
            let key = m.media_key.clone()?;
            Some((
                key,
                Media {
                    kind: m.kind.clone().unwrap_or_else(|| "photo".to_string()),
                    url: m
                        .url
                        .clone()
                        .or_else(|| m.preview_image_url.clone())
                        .unwrap_or_default(),
                },
            ))
        })
        .collect()
}

/// Maps an API v2 tweet. Returns `None` for tweets without an id.
pub fn tweet_from_v2(
    tweet: &types::Tweet,
    media: &HashMap<String, Media>,
    author: Option<&Author>,
) -> Option<Tweet> {
    let id = tweet.id.clone()?;
    let metrics = tweet.public_metrics.clone().unwrap_or_default();
    let screen_name = author.map(|a| a.handle.as_str()).unwrap_or_default();

    let attached = tweet
        .attachments
        .as_ref()
        .and_then(|a| a.media_keys.as_ref())
        .into_iter()
        .flatten()
        .filter_map(|key| {
            let found = media.get(key).cloned();
            if found.is_none() {
                debug!("Media key {} missing from includes", key);
            }
            found
        })
        .collect();

    Some(Tweet {
        url: tweet_url(screen_name, &id),
        text: to_plain_text(tweet.text.as_deref().unwrap_or_default()),
        created_at: tweet.created_at.clone().unwrap_or_default(),
        reply_count: metrics.reply_count.unwrap_or(0),
        retweet_count: metrics.retweet_count.unwrap_or(0),
        favorite_count: metrics.like_count.unwrap_or(0),
        quote_count: metrics.quote_count.unwrap_or(0),
        is_retweet: tweet.is_retweet(),
        is_reply: tweet.is_reply(),
        media: attached,
        user: author.cloned(),
        id,
    })
}

/// Maps a web GraphQL user into a profile.
///
/// Newer payloads move `screen_name`, `name` and `created_at` from `legacy` to `core`;
/// both places are read, `core` first. `fallback_handle` fills an absent screen name.
pub fn profile_from_graphql(user: &graphql::User, fallback_handle: &str) -> TwitterProfile {
    let core = user.core.clone().unwrap_or_default();
    let legacy = user.legacy.clone().unwrap_or_default();

    let verified = user
        .verification
        .as_ref()
        .and_then(|v| v.verified)
        .unwrap_or(false)
        || user.is_blue_verified.unwrap_or(false)
        || legacy.verified.unwrap_or(false);

    TwitterProfile {
        rest_id: user.rest_id.clone().unwrap_or_default(),
        screen_name: core
            .screen_name
            .or(legacy.screen_name)
            .unwrap_or_else(|| fallback_handle.to_string()),
        name: core
            .name
            .or(legacy.name)
            .unwrap_or_else(|| fallback_handle.to_string()),
        description: legacy.description.unwrap_or_default(),
        followers_count: legacy.followers_count.unwrap_or(0),
        friends_count: legacy.friends_count.unwrap_or(0),
        statuses_count: legacy.statuses_count.unwrap_or(0),
        verified,
        profile_image_url: user
            .avatar
            .as_ref()
            .and_then(|a| a.image_url.clone())
            .or(legacy.profile_image_url_https)
            .unwrap_or_default(),
        created_at: core.created_at.or(legacy.created_at).unwrap_or_default(),
    }
}

/// Maps a web GraphQL tweet. Returns `None` when neither `legacy.id_str` nor `rest_id` is set.
pub fn tweet_from_graphql(tweet: &graphql::Tweet, author: Option<&Author>) -> Option<Tweet> {
    let tweet = tweet.inner();
    let legacy = tweet.legacy.clone().unwrap_or_default();
    let id = legacy.id_str.clone().or_else(|| tweet.rest_id.clone())?;
    let screen_name = author.map(|a| a.handle.as_str()).unwrap_or_default();

    // extended_entities lists every attachment; entities only the first
    let media = legacy
        .extended_entities
        .as_ref()
        .and_then(|e| e.media.as_ref())
        .or_else(|| legacy.entities.as_ref().and_then(|e| e.media.as_ref()))
        .into_iter()
        .flatten()
        .map(|m| Media {
            kind: m.kind.clone().unwrap_or_else(|| "photo".to_string()),
            url: m
                .media_url_https
                .clone()
                .or_else(|| m.media_url.clone())
                .unwrap_or_default(),
        })
        .collect();

    Some(Tweet {
        url: tweet_url(screen_name, &id),
        text: to_plain_text(legacy.full_text.as_deref().unwrap_or_default()),
        created_at: legacy.created_at.clone().unwrap_or_default(),
        reply_count: legacy.reply_count.unwrap_or(0),
        retweet_count: legacy.retweet_count.unwrap_or(0),
        favorite_count: legacy.favorite_count.unwrap_or(0),
        quote_count: legacy.quote_count.unwrap_or(0),
        is_retweet: legacy.retweeted_status_result.is_some(),
        is_reply: legacy
            .in_reply_to_status_id_str
            .as_deref()
            .is_some_and(|id| !id.is_empty()),
        media,
        user: author.cloned(),
        id,
    })
}

/// One page of a GraphQL timeline.
#[derive(Debug, Default)]
pub struct TimelinePage {
    pub tweets: Vec<Tweet>,
    pub next_cursor: Option<String>,
}

/// Walks the `TimelineAddEntries` instructions of a timeline.
pub fn timeline_from_graphql(timeline: &graphql::Timeline, author: Option<&Author>) -> TimelinePage {
    let mut page = TimelinePage::default();

    let entries = timeline
        .instructions
        .iter()
        .flatten()
        .filter(|i| i.kind.as_deref() == Some("TimelineAddEntries"))
        .flat_map(|i| i.entries.iter().flatten());

    for entry in entries {
        let entry_id = entry.entry_id.as_deref().unwrap_or_default();
        let Some(content) = entry.content.as_ref() else {
            continue;
        };

        if entry_id.starts_with("tweet-") {
            let tweet = content
                .item_content
                .as_ref()
                .and_then(|c| c.tweet_results.as_ref())
                .and_then(|r| r.result.as_ref());
            match tweet.and_then(|t| tweet_from_graphql(t, author)) {
                Some(tweet) => page.tweets.push(tweet),
                None => warn!("Skipping timeline entry {} without a tweet", entry_id),
            }
        } else if entry_id.starts_with("cursor-bottom-") {
            if let Some(value) = content.value.as_ref().filter(|v| !v.is_empty()) {
                page.next_cursor = Some(value.clone());
            }
        }
    }

    page
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn author() -> Author {
        Author {
            handle: "NASA".into(),
            display_name: "NASA".into(),
            followers_count: 88000000,
            verified: true,
            avatar_url: String::new(),
        }
    }

    #[test]
    fn test_v2_tweet() {
        let response: types::TimelineResponse = serde_json::from_value(json!({
            "data": [{
                "id": "1853163848402415831",
                "text": "Liftoff &amp; orbit &gt; everything",
                "created_at": "2024-11-03T18:00:01.000Z",
                "public_metrics": {"retweet_count": 10, "reply_count": 2, "like_count": 300, "quote_count": 1},
                "attachments": {"media_keys": ["3_1", "3_missing"]},
                "referenced_tweets": [{"type": "quoted", "id": "1"}]
            }],
            "includes": {"media": [{"media_key": "3_1", "type": "photo", "url": "https://pbs.twimg.com/media/a.jpg"}]}
        }))
        .unwrap();

        let media = media_index(response.includes.as_ref());
        let author = author();
        let data = response.data.unwrap();
        let tweet = tweet_from_v2(&data[0], &media, Some(&author)).unwrap();

        assert_eq!(tweet.id, "1853163848402415831");
        assert_eq!(tweet.created_at, "2024-11-03T18:00:01.000Z");
        assert_eq!(tweet.text, "Liftoff & orbit > everything");
        assert_eq!((tweet.retweet_count, tweet.reply_count, tweet.favorite_count, tweet.quote_count), (10, 2, 300, 1));
        assert!(!tweet.is_retweet);
        assert!(!tweet.is_reply);
        assert_eq!(tweet.url, "https://x.com/NASA/status/1853163848402415831");
        assert_eq!(tweet.media.len(), 1);
        assert_eq!(tweet.media[0].url, "https://pbs.twimg.com/media/a.jpg");
    }

    #[test]
    fn test_v2_flags() {
        let retweet: types::Tweet = serde_json::from_value(json!({
            "id": "1", "referenced_tweets": [{"type": "retweeted", "id": "0"}]
        }))
        .unwrap();
        let reply: types::Tweet =
            serde_json::from_value(json!({"id": "2", "in_reply_to_user_id": "99"})).unwrap();

        let none = HashMap::new();
        let retweet = tweet_from_v2(&retweet, &none, None).unwrap();
        assert!(retweet.is_retweet && !retweet.is_reply);
        assert_eq!(retweet.url, "https://x.com/i/web/status/1");
        let reply = tweet_from_v2(&reply, &none, None).unwrap();
        assert!(reply.is_reply && !reply.is_retweet);
    }

    #[test]
    fn test_graphql_profile_prefers_core() {
        let user: graphql::User = serde_json::from_value(json!({
            "rest_id": "44196397",
            "is_blue_verified": true,
            "core": {"screen_name": "elonmusk", "name": "Elon Musk", "created_at": "Tue Jun 02 20:12:29 +0000 2009"},
            "legacy": {"screen_name": "stale", "description": "bio", "followers_count": 200000000, "friends_count": 1000, "statuses_count": 50000},
            "avatar": {"image_url": "https://pbs.twimg.com/profile_images/x.jpg"}
        }))
        .unwrap();

        let profile = profile_from_graphql(&user, "elonmusk");
        assert_eq!(profile.rest_id, "44196397");
        assert_eq!(profile.screen_name, "elonmusk");
        assert_eq!(profile.name, "Elon Musk");
        assert_eq!(profile.followers_count, 200000000);
        assert!(profile.verified);
        assert_eq!(profile.profile_image_url, "https://pbs.twimg.com/profile_images/x.jpg");
        assert_eq!(profile.created_at, "Tue Jun 02 20:12:29 +0000 2009");
    }

    #[test]
    fn test_graphql_timeline_null_instructions() {
        let timeline: graphql::Timeline =
            serde_json::from_value(json!({"instructions": null})).unwrap();
        let page = timeline_from_graphql(&timeline, None);
        assert!(page.tweets.is_empty());
        assert!(page.next_cursor.is_none());
    }

    #[test]
    fn test_graphql_timeline() {
        let timeline: graphql::Timeline = serde_json::from_value(json!({
            "instructions": [
                {"type": "TimelineClearCache"},
                {"type": "TimelineAddEntries", "entries": [
                    {"entryId": "tweet-100", "content": {"itemContent": {"tweet_results": {"result": {
                        "rest_id": "100",
                        "legacy": {
                            "id_str": "100",
                            "full_text": "first &amp; foremost",
                            "created_at": "Wed Oct 10 20:19:24 +0000 2018",
                            "retweet_count": 5, "favorite_count": 50, "reply_count": 1, "quote_count": 0,
                            "extended_entities": {"media": [
                                {"type": "video", "media_url_https": "https://pbs.twimg.com/v.jpg"},
                                {"media_url": "http://pbs.twimg.com/p.jpg"}
                            ]}
                        }
                    }}}}},
                    {"entryId": "tweet-101", "content": {"itemContent": {"tweet_results": {"result": {
                        "__typename": "TweetWithVisibilityResults",
                        "tweet": {"rest_id": "101", "legacy": {
                            "full_text": "RT @someone: hi",
                            "retweeted_status_result": {"result": {}},
                            "in_reply_to_status_id_str": ""
                        }}
                    }}}}},
                    {"entryId": "who-to-follow-1", "content": {}},
                    {"entryId": "tweet-102", "content": {"itemContent": {}}},
                    {"entryId": "cursor-top-1", "content": {"value": "TOP"}},
                    {"entryId": "cursor-bottom-1", "content": {"value": "BOTTOM"}}
                ]}
            ]
        }))
        .unwrap();

        let author = author();
        let page = timeline_from_graphql(&timeline, Some(&author));
        assert_eq!(page.next_cursor.as_deref(), Some("BOTTOM"));
        assert_eq!(page.tweets.len(), 2);

        let first = &page.tweets[0];
        assert_eq!(first.id, "100");
        assert_eq!(first.text, "first & foremost");
        assert_eq!(first.created_at, "Wed Oct 10 20:19:24 +0000 2018");
        assert_eq!((first.retweet_count, first.favorite_count, first.reply_count), (5, 50, 1));
        assert_eq!(first.media[0].kind, "video");
        assert_eq!(first.media[1].kind, "photo");
        assert_eq!(first.media[1].url, "http://pbs.twimg.com/p.jpg");

        let second = &page.tweets[1];
        assert_eq!(second.id, "101");
        assert!(second.is_retweet);
        assert!(!second.is_reply);
        assert_eq!(second.user.as_ref().unwrap().handle, "NASA");
    }
}
