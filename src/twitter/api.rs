//! Twitter API v2 client.
//!
//! App-only bearer authentication against the public REST API. A fetch is a user
//! lookup by username followed by the user's tweet timeline, paged with
//! `pagination_token`.

use log::{debug, error, info, warn};

use super::normalize::{media_index, profile_from_v2, tweet_from_v2, WEB_ORIGIN};
use super::types::{TimelineResponse, UserResponse};
use super::{TweetFilter, MAX_PAGES};
use crate::config::TwitterApiConfig;
use crate::error::{FetchError, Result};
use crate::http::{ApiClient, BrowserProfile};
use crate::records::{Author, Tweet, TwitterProfile};

const USER_FIELDS: &str =
    "id,name,username,created_at,description,verified,profile_image_url,public_metrics";
const TWEET_FIELDS: &str =
    "id,text,created_at,public_metrics,referenced_tweets,attachments,in_reply_to_user_id";
const MEDIA_FIELDS: &str = "media_key,type,url,preview_image_url";

/// Smallest and largest `max_results` the timeline endpoint accepts.
pub const MIN_PAGE_SIZE: usize = 5;
pub const MAX_PAGE_SIZE: usize = 100;

#[derive(Debug)]
pub struct TwitterApiClient {
    api: ApiClient,
}

impl TwitterApiClient {
    pub fn new(config: &TwitterApiConfig) -> Result<Self> {
        let api = ApiClient::new(
            &config.api_base,
            config.timeout,
            &BrowserProfile::chrome(Some(WEB_ORIGIN)),
        )?
        .with_bearer(&config.bearer_token)?;
        Ok(TwitterApiClient { api })
    }

    /// Looks up a user by username.
    ///
    /// # Returns
    ///
    /// - `Ok(TwitterProfile)`: the user's profile, `rest_id` always set
    /// - `Err(FetchError::UserNotFound)`: 404, or a 200 carrying only `errors`
    /// - `Err(FetchError::MissingIdentifier)`: a user without an id
    pub async fn lookup_user(&mut self, username: &str) -> Result<TwitterProfile> {
        info!("Looking up user by username: {}", username);

        let path = format!("2/users/by/username/{}", urlencoding::encode(username));
        let response: UserResponse = match self
            .api
            .get_json(&path, &[("user.fields", USER_FIELDS.to_string())], "lookup_user")
            .await
        {
            Ok(response) => response,
            Err(FetchError::Upstream { status: 404, .. }) => {
                warn!("User {} not found", username);
                return Err(FetchError::UserNotFound(username.to_string()));
            }
            Err(e) => return Err(e),
        };

        let Some(user) = response.data else {
            for problem in response.errors.iter().flatten() {
                error!("Twitter API error: {}", problem.describe());
            }
            warn!("User {} not found", username);
            return Err(FetchError::UserNotFound(username.to_string()));
        };

        if user.id.is_none() {
            return Err(FetchError::MissingIdentifier(username.to_string()));
        }

        let profile = profile_from_v2(&user);
        info!(
            "Found user {}: {} (@{})",
            profile.rest_id, profile.name, profile.screen_name
        );
        Ok(profile)
    }

    /// Fetches up to `count` tweets of a user, newest first.
    ///
    /// Each page asks for the remaining count clamped to
    /// [`MIN_PAGE_SIZE`]..=[`MAX_PAGE_SIZE`]; the result is truncated to `count`.
    pub async fn user_tweets(
        &mut self,
        user_id: &str,
        count: usize,
        filter: TweetFilter,
        author: Option<&Author>,
    ) -> Result<Vec<Tweet>> {
        info!("Fetching up to {} tweets for user {}", count, user_id);

        let path = format!("2/users/{}/tweets", urlencoding::encode(user_id));
        let mut tweets: Vec<Tweet> = Vec::new();
        let mut pagination_token: Option<String> = None;
        let mut page_count: u32 = 0;

        while tweets.len() < count {
            let max_results = (count - tweets.len()).clamp(MIN_PAGE_SIZE, MAX_PAGE_SIZE);
            let mut query = vec![
                ("max_results", max_results.to_string()),
                ("tweet.fields", TWEET_FIELDS.to_string()),
                ("expansions", "attachments.media_keys".to_string()),
                ("media.fields", MEDIA_FIELDS.to_string()),
            ];
            if let Some(exclude) = filter.exclude_param() {
                query.push(("exclude", exclude));
            }
            if let Some(token) = &pagination_token {
                query.push(("pagination_token", token.clone()));
            }

            let page: TimelineResponse = self.api.get_json(&path, &query, "fetch_tweets").await?;
            page_count += 1;

            let data = page.data.unwrap_or_default();
            if data.is_empty() {
                if let Some(errors) = page.errors.filter(|e| !e.is_empty()) {
                    let message = errors
                        .iter()
                        .map(|p| p.describe())
                        .collect::<Vec<_>>()
                        .join("; ");
                    error!("Twitter API error: {}", message);
                    if tweets.is_empty() {
                        return Err(FetchError::Upstream {
                            operation: "fetch_tweets".to_string(),
                            status: 200,
                            message,
                        });
                    }
                }
                debug!("Page {} returned no tweets", page_count);
                break;
            }

            let media = media_index(page.includes.as_ref());
            debug!(
                "Page {} returned {} tweets, {} media",
                page_count,
                data.len(),
                media.len()
            );
            tweets.extend(data.iter().filter_map(|t| tweet_from_v2(t, &media, author)));

            pagination_token = page.meta.and_then(|m| m.next_token);
            if pagination_token.is_none() {
                break;
            }
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
        let profile = self.lookup_user(username).await?;
        let author = profile.to_author();
        self.user_tweets(&profile.rest_id, count, filter, Some(&author))
            .await
    }

    pub fn finish(&mut self) -> Result<()> {
        self.api.finish()
    }
}
