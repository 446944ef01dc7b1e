//! Truth Social API client.
//!
//! Talks to the Mastodon-compatible REST API behind truthsocial.com with a browser
//! identity and a persisted cookie jar. Two calls make up every fetch: an account
//! lookup by handle, then the account's status timeline.

use log::{debug, info, warn};

use super::normalize::{normalize_account, normalize_statuses, WEB_ORIGIN};
use super::types::{Account, Status};
use crate::config::TruthSocialConfig;
use crate::error::{FetchError, Result};
use crate::http::{ApiClient, BrowserProfile};
use crate::records::{AccountSummary, Post};
use crate::session::CookieJar;

/// Largest page the statuses endpoint serves.
pub const PAGE_SIZE: usize = 40;
/// Upper bound on timeline pages fetched for one request.
pub const MAX_PAGES: u32 = 10;

/// Which statuses the timeline request leaves out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusFilter {
    pub exclude_replies: bool,
    pub exclude_reblogs: bool,
}

impl Default for StatusFilter {
    fn default() -> Self {
        StatusFilter {
            exclude_replies: true,
            exclude_reblogs: true,
        }
    }
}

#[derive(Debug)]
pub struct TruthSocialClient {
    api: ApiClient,
}

impl TruthSocialClient {
    /// Builds a client from configuration, loading the cookie jar if one is configured.
    pub fn new(config: &TruthSocialConfig) -> Result<Self> {
        let api = ApiClient::new(
            &config.api_base,
            config.timeout,
            &BrowserProfile::chrome(Some(WEB_ORIGIN)),
        )?
        .with_bearer(&config.access_token)?;

        let api = match &config.cookie_file {
            Some(path) => api.with_cookie_jar(CookieJar::load(path)),
            None => api,
        };

        Ok(TruthSocialClient { api })
    }

    /// Resolves a handle to its account.
    ///
    /// A 404 from the lookup endpoint, or an empty body, means the handle does not exist.
    pub async fn lookup(&mut self, handle: &str) -> Result<Account> {
        info!("Looking up Truth Social account @{}", handle);

        let account: Option<Account> = match self
            .api
            .get_json(
                "v1/accounts/lookup",
                &[("acct", handle.to_string())],
                "lookup_account",
            )
            .await
        {
            Ok(account) => account,
            Err(FetchError::Upstream { status: 404, .. }) => None,
            Err(e) => return Err(e),
        };

        let account = account.ok_or_else(|| FetchError::UserNotFound(handle.to_string()))?;
        if account.id.is_none() {
            warn!("Lookup for @{} returned an account without an id", handle);
            return Err(FetchError::MissingIdentifier(handle.to_string()));
        }

        info!(
            "Found account {} (@{})",
            account.id.as_deref().unwrap_or_default(),
            handle
        );
        Ok(account)
    }

    /// Fetches up to `limit` statuses of an account, newest first.
    ///
    /// Pages backwards with `max_id` until `limit` is reached, a page comes back empty,
    /// or [`MAX_PAGES`] pages have been read.
    pub async fn statuses(
        &mut self,
        account_id: &str,
        limit: usize,
        filter: StatusFilter,
    ) -> Result<Vec<Status>> {
        info!(
            "Fetching up to {} statuses for account {}",
            limit, account_id
        );

        let path = format!(
            "v1/accounts/{}/statuses",
            urlencoding::encode(account_id)
        );
        let mut statuses: Vec<Status> = Vec::new();
        let mut max_id: Option<String> = None;
        let mut page_count: u32 = 0;

        while statuses.len() < limit {
            let page_size = (limit - statuses.len()).min(PAGE_SIZE);
            let mut query = vec![
                ("limit", page_size.to_string()),
                ("exclude_replies", filter.exclude_replies.to_string()),
                ("exclude_reblogs", filter.exclude_reblogs.to_string()),
            ];
            if let Some(id) = &max_id {
                query.push(("max_id", id.clone()));
            }

            let page: Vec<Status> = self.api.get_json(&path, &query, "fetch_statuses").await?;
            page_count += 1;
            debug!("Page {} returned {} statuses", page_count, page.len());

            if page.is_empty() {
                break;
            }
            let page_len = page.len();
            max_id = page.iter().rev().find_map(|status| status.id.clone());
            let before = statuses.len();
            statuses.extend(page.into_iter().filter(|status| status.id.is_some()));
            let skipped = page_len - (statuses.len() - before);
            if skipped > 0 {
                warn!("Skipped {} statuses without an id", skipped);
            }

            if max_id.is_none() {
                warn!("Page without status ids, cannot continue paging");
                break;
            }
            if page_count >= MAX_PAGES && statuses.len() < limit {
                warn!(
                    "Reached max page limit ({}), stopping. Fetched {} statuses so far.",
                    MAX_PAGES,
                    statuses.len()
                );
                break;
            }
        }

        statuses.truncate(limit);
        info!(
            "Fetched {} statuses for account {} ({} pages)",
            statuses.len(),
            account_id,
            page_count
        );
        Ok(statuses)
    }

    /// Looks up `handle` and returns its account summary.
    pub async fn account_summary(&mut self, handle: &str) -> Result<AccountSummary> {
        let account = self.lookup(handle).await?;
        Ok(normalize_account(&account))
    }

    /// Looks up `handle` and returns up to `limit` normalized posts.
    pub async fn fetch_posts(
        &mut self,
        handle: &str,
        limit: usize,
        filter: StatusFilter,
    ) -> Result<Vec<Post>> {
        let account = self.lookup(handle).await?;
        let account_id = account
            .id
            .clone()
            .ok_or_else(|| FetchError::MissingIdentifier(handle.to_string()))?;

        let statuses = self.statuses(&account_id, limit, filter).await?;
        Ok(normalize_statuses(&statuses, handle, limit))
    }

    /// Persists the cookie jar. Call once the request chain is over.
    pub fn finish(&mut self) -> Result<()> {
        self.api.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use wiremock::matchers::{header, method, path, query_param, query_param_is_missing};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_config(mock_server: &MockServer) -> TruthSocialConfig {
        TruthSocialConfig {
            access_token: "test_access_token".into(),
            api_base: format!("{}/api", mock_server.uri()),
            cookie_file: None,
            timeout: Duration::from_secs(5),
        }
    }

    fn statuses_json(ids: std::ops::RangeInclusive<u32>) -> serde_json::Value {
        serde_json::Value::Array(
            ids.rev()
                .map(|id| {
                    serde_json::json!({
                        "id": id.to_string(),
                        "created_at": "2025-01-01T00:00:00.000Z",
                        "content": format!("<p>post {}</p>", id),
                    })
                })
                .collect(),
        )
    }

    #[tokio::test]
    async fn test_lookup_success() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v1/accounts/lookup"))
            .and(query_param("acct", "realDonaldTrump"))
            .and(header("authorization", "Bearer test_access_token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "107780257626128497",
                "username": "realDonaldTrump",
                "display_name": "Donald J. Trump"
            })))
            .mount(&mock_server)
            .await;

        let mut client = TruthSocialClient::new(&test_config(&mock_server)).unwrap();
        let summary = client.account_summary("realDonaldTrump").await.unwrap();
        assert_eq!(summary.id, "107780257626128497");
        assert_eq!(summary.display_name, "Donald J. Trump");
    }

    #[tokio::test]
    async fn test_lookup_not_found() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v1/accounts/lookup"))
            .respond_with(
                ResponseTemplate::new(404)
                    .set_body_json(serde_json::json!({"error": "Record not found"})),
            )
            .mount(&mock_server)
            .await;

        let mut client = TruthSocialClient::new(&test_config(&mock_server)).unwrap();
        let err = client.lookup("nobody").await.unwrap_err();
        assert!(matches!(err, FetchError::UserNotFound(ref h) if h == "nobody"));
    }

    #[tokio::test]
    async fn test_lookup_without_id() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v1/accounts/lookup"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"username": "x"})),
            )
            .mount(&mock_server)
            .await;

        let mut client = TruthSocialClient::new(&test_config(&mock_server)).unwrap();
        let err = client.lookup("x").await.unwrap_err();
        assert!(matches!(err, FetchError::MissingIdentifier(_)));
    }

    #[tokio::test]
    async fn test_statuses_pages_with_max_id() {
        let mock_server = MockServer::start().await;

        // First page: ids 50..=11 (40 statuses, newest first)
        Mock::given(method("GET"))
            .and(path("/api/v1/accounts/42/statuses"))
            .and(query_param("limit", "40"))
            .and(query_param("exclude_replies", "true"))
            .and(query_param_is_missing("max_id"))
            .respond_with(ResponseTemplate::new(200).set_body_json(statuses_json(11..=50)))
            .expect(1)
            .mount(&mock_server)
            .await;
        // Second page continues below the last id seen
        Mock::given(method("GET"))
            .and(path("/api/v1/accounts/42/statuses"))
            .and(query_param("limit", "5"))
            .and(query_param("max_id", "11"))
            .respond_with(ResponseTemplate::new(200).set_body_json(statuses_json(1..=10)))
            .expect(1)
            .mount(&mock_server)
            .await;

        let mut client = TruthSocialClient::new(&test_config(&mock_server)).unwrap();
        let statuses = client
            .statuses("42", 45, StatusFilter::default())
            .await
            .unwrap();

        // The provider over-delivered on the second page; the result is cut to the limit
        assert_eq!(statuses.len(), 45);
        assert_eq!(statuses[0].id.as_deref(), Some("50"));
        assert_eq!(statuses[44].id.as_deref(), Some("6"));
    }

    #[tokio::test]
    async fn test_statuses_without_ids_do_not_count_toward_limit() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v1/accounts/5/statuses"))
            .and(query_param("limit", "3"))
            .and(query_param_is_missing("max_id"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {"id": "30", "content": "<p>a</p>"},
                {"content": "<p>no id</p>"},
                {"id": "20", "content": "<p>b</p>"}
            ])))
            .expect(1)
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/v1/accounts/5/statuses"))
            .and(query_param("limit", "1"))
            .and(query_param("max_id", "20"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!([{"id": "10", "content": "<p>c</p>"}])),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        let mut client = TruthSocialClient::new(&test_config(&mock_server)).unwrap();
        let statuses = client
            .statuses("5", 3, StatusFilter::default())
            .await
            .unwrap();
        let ids: Vec<&str> = statuses.iter().filter_map(|s| s.id.as_deref()).collect();
        assert_eq!(ids, vec!["30", "20", "10"]);
    }

    #[tokio::test]
    async fn test_statuses_stop_on_empty_page() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v1/accounts/7/statuses"))
            .and(query_param_is_missing("max_id"))
            .respond_with(ResponseTemplate::new(200).set_body_json(statuses_json(1..=3)))
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/v1/accounts/7/statuses"))
            .and(query_param("max_id", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
            .expect(1)
            .mount(&mock_server)
            .await;

        let mut client = TruthSocialClient::new(&test_config(&mock_server)).unwrap();
        let statuses = client
            .statuses(
                "7",
                20,
                StatusFilter {
                    exclude_replies: false,
                    exclude_reblogs: false,
                },
            )
            .await
            .unwrap();
        assert_eq!(statuses.len(), 3);
    }
}
