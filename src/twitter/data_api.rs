//! Hosted data API client.
//!
//! The data API proxies Twitter's web endpoints by name and hands back the web
//! GraphQL payloads wrapped in `{"result": ...}`. It authenticates with an
//! `x-api-key` header.

use log::{debug, info, warn};

use super::graphql::{Envelope, ProfileResult, TimelineResult};
use super::normalize::{profile_from_graphql, timeline_from_graphql, WEB_ORIGIN};
use super::{TweetFilter, MAX_PAGES};
use crate::config::DataApiConfig;
use crate::error::{FetchError, Result};
use crate::http::{ApiClient, BrowserProfile};
use crate::records::{Author, Tweet, TwitterProfile};

const API_KEY_HEADER: &str = "x-api-key";

#[derive(Debug)]
pub struct DataApiClient {
    api: ApiClient,
}

impl DataApiClient {
    pub fn new(config: &DataApiConfig) -> Result<Self> {
        let api = ApiClient::new(
            &config.api_url,
            config.timeout,
            &BrowserProfile::chrome(Some(WEB_ORIGIN)),
        )?
        .with_key_header(API_KEY_HEADER, &config.api_key)?;
        Ok(DataApiClient { api })
    }

    /// Fetches a user's profile by screen name.
    ///
    /// An empty `result` means the handle does not exist; a user without a
    /// `rest_id` cannot be paged.
    pub async fn get_profile(&mut self, username: &str) -> Result<TwitterProfile> {
        info!("Looking up user by username: {}", username);

        let response: Envelope<ProfileResult> = self
            .api
            .get_json(
                "Twitter/get_user_profile_by_username",
                &[("username", username.to_string())],
                "lookup_user",
            )
            .await?;

        let user = response
            .result
            .and_then(|r| r.data)
            .and_then(|d| d.user)
            .and_then(|u| u.result)
            .ok_or_else(|| {
                warn!("User {} not found", username);
                FetchError::UserNotFound(username.to_string())
            })?;

        let profile = profile_from_graphql(&user, username);
        if profile.rest_id.is_empty() {
            return Err(FetchError::MissingIdentifier(username.to_string()));
        }

        info!(
            "Found user {}: {} (@{})",
            profile.rest_id, profile.name, profile.screen_name
        );
        Ok(profile)
    }

    /// Fetches up to `count` tweets of a user, following `cursor-bottom` entries.
    ///
    /// The endpoint has no server-side reply or retweet filter, so `filter` is
    /// applied to each page before counting.
    pub async fn user_tweets(
        &mut self,
        user_id: &str,
        count: usize,
        filter: TweetFilter,
        author: Option<&Author>,
    ) -> Result<Vec<Tweet>> {
        info!("Fetching up to {} tweets for user {}", count, user_id);

        let mut tweets: Vec<Tweet> = Vec::new();
        let mut cursor: Option<String> = None;
        let mut page_count: u32 = 0;

        while tweets.len() < count {
            let mut query = vec![
                ("user", user_id.to_string()),
                ("count", (count - tweets.len()).to_string()),
            ];
            if let Some(value) = &cursor {
                query.push(("cursor", value.clone()));
            }

            let response: Envelope<TimelineResult> = self
                .api
                .get_json("Twitter/get_user_tweets", &query, "fetch_tweets")
                .await?;
            page_count += 1;

            let Some(timeline) = response.result.and_then(|r| r.timeline) else {
                debug!("Page {} carried no timeline", page_count);
                break;
            };
            let page = timeline_from_graphql(&timeline, author);
            debug!(
                "Page {} returned {} tweets",
                page_count,
                page.tweets.len()
            );
            if page.tweets.is_empty() {
                break;
            }

            tweets.extend(page.tweets.into_iter().filter(|t| filter.keeps(t)));

            if page.next_cursor.is_none() || page.next_cursor == cursor {
                break;
            }
            cursor = page.next_cursor;

            if page_count >= MAX_PAGES && tweets.len() < count {
                warn!(
                    "Reached max page limit ({}), stopping. Fetched {} tweets so far.",
                    MAX_PAGES,
                    tweets.len()
                );
                break;
            }
        }

        tweets.truncate(count);
        info!(
            "Fetched {} tweets for user {} ({} pages)",
            tweets.len(),
            user_id,
            page_count
        );
        Ok(tweets)
    }

    /// Looks up `username` and returns up to `count` of their tweets.
    pub async fn fetch_tweets(
        &mut self,
        username: &str,
        count: usize,
        filter: TweetFilter,
    ) -> Result<Vec<Tweet>> {
        let profile = self.get_profile(username).await?;
        let author = profile.to_author();
        self.user_tweets(&profile.rest_id, count, filter, Some(&author))
            .await
    }

    pub fn finish(&mut self) -> Result<()> {
        self.api.finish()
    }
}
