//! HTTP plumbing shared by every provider client.
//!
//! This module builds a `reqwest` client that presents itself as a desktop Chrome
//! browser, joins endpoint paths onto a configurable base URL, attaches credentials
//! and cookies, and turns non-success responses into [`FetchError::Upstream`].
//! Nothing here retries.

use log::{debug, error, info};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, COOKIE};
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use url::Url;

use crate::error::{FetchError, Result};
use crate::session::CookieJar;

pub const CHROME_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Sanitizes text for safe logging by truncating and escaping control characters.
///
/// This function:
/// - Truncates long text to prevent log flooding
/// - Replaces control characters that could manipulate log output
/// - Flattens newlines to prevent log injection
///
/// # Parameters
///
/// - `text`: The text to sanitize
/// - `max_chars`: Maximum number of characters kept before truncation
pub(crate) fn sanitize_for_logging(text: &str, max_chars: usize) -> String {
    let sanitized: String = text
        .chars()
        .map(|c| match c {
            '\n' | '\r' | '\t' => ' ',
            c if c.is_control() => '?',
            c => c,
        })
        .collect();

    if sanitized.chars().count() > max_chars {
        let kept: String = sanitized.chars().take(max_chars).collect();
        format!("{}... [truncated, {} total bytes]", kept, text.len())
    } else {
        sanitized
    }
}

/// Builds the Authorization header value for bearer token authentication.
///
/// ```rust
/// use socialfetch::http::build_bearer_auth_header;
///
/// assert_eq!(build_bearer_auth_header("abc"), "Bearer abc");
/// ```
pub fn build_bearer_auth_header(token: &str) -> String {
    format!("Bearer {}", token)
}

/// The browser identity presented on every request.
#[derive(Debug, Clone)]
pub struct BrowserProfile {
    pub user_agent: String,
    /// Sent as both `Origin` and `Referer` (with a trailing slash) when set
    pub origin: Option<String>,
}

impl BrowserProfile {
    /// Desktop Chrome 120 on Windows.
    pub fn chrome(origin: Option<&str>) -> Self {
        BrowserProfile {
            user_agent: CHROME_USER_AGENT.to_string(),
            origin: origin.map(|o| o.trim_end_matches('/').to_string()),
        }
    }

    fn default_headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));

        if let Some(origin) = &self.origin {
            headers.insert(reqwest::header::ORIGIN, header_value(origin)?);
            headers.insert(
                reqwest::header::REFERER,
                header_value(&format!("{}/", origin))?,
            );
        }
        Ok(headers)
    }
}

fn header_value(value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value)
        .map_err(|e| FetchError::Config(format!("invalid header value: {}", e)))
}

/// Pulls a human-readable message out of an error body, falling back to the body itself.
fn upstream_message(body: &str) -> String {
    if let Ok(json) = serde_json::from_str::<serde_json::Value>(body) {
        for key in ["error_description", "error", "detail", "title", "message"] {
            if let Some(message) = json.get(key).and_then(|v| v.as_str()) {
                return sanitize_for_logging(message, 200);
            }
        }
    }
    if body.trim().is_empty() {
        return "empty response body".to_string();
    }
    sanitize_for_logging(body, 200)
}

/// An HTTP client bound to one API root.
#[derive(Debug)]
pub struct ApiClient {
    http: Client,
    base: Url,
    auth: Option<(HeaderName, HeaderValue)>,
    jar: Option<CookieJar>,
}

impl ApiClient {
    /// Creates a client for `base` (for example `https://truthsocial.com/api`).
    pub fn new(base: &str, timeout: Duration, profile: &BrowserProfile) -> Result<Self> {
        let base = Url::parse(&format!("{}/", base.trim_end_matches('/')))?;
        let http = Client::builder()
            .user_agent(profile.user_agent.as_str())
            .default_headers(profile.default_headers()?)
            .timeout(timeout)
            .build()?;

        debug!("Created API client for {}", base);
        Ok(ApiClient {
            http,
            base,
            auth: None,
            jar: None,
        })
    }

    /// Sends `Authorization: Bearer <token>` on every request.
    pub fn with_bearer(self, token: &str) -> Result<Self> {
        let mut value = header_value(&build_bearer_auth_header(token))?;
        value.set_sensitive(true);
        Ok(ApiClient {
            auth: Some((reqwest::header::AUTHORIZATION, value)),
            ..self
        })
    }

    /// Sends an arbitrary credential header (for example `x-api-key`) on every request.
    pub fn with_key_header(self, name: &str, key: &str) -> Result<Self> {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| FetchError::Config(format!("invalid header name '{}': {}", name, e)))?;
        let mut value = header_value(key)?;
        value.set_sensitive(true);
        Ok(ApiClient {
            auth: Some((name, value)),
            ..self
        })
    }

    /// Attaches a cookie jar that is sent with and updated by every request.
    pub fn with_cookie_jar(self, jar: CookieJar) -> Self {
        ApiClient {
            jar: Some(jar),
            ..self
        }
    }

    pub fn cookie_jar(&self) -> Option<&CookieJar> {
        self.jar.as_ref()
    }

    /// Joins `path` onto the base URL and appends `query` pairs.
    pub fn url(&self, path: &str, query: &[(&str, String)]) -> Result<Url> {
        let mut url = self.base.join(path.trim_start_matches('/'))?;
        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
        }
        Ok(url)
    }

    /// Performs a GET and decodes the JSON body.
    ///
    /// # Parameters
    ///
    /// - `path`: endpoint path relative to the base URL
    /// - `query`: query string pairs
    /// - `operation_name`: human-readable name for the operation (for logging and errors)
    ///
    /// # Returns
    ///
    /// - `Ok(T)`: the decoded body of a 2xx response
    /// - `Err(FetchError::Upstream)`: any other status
    /// - `Err(FetchError::Http | FetchError::Json)`: transport or decode failure
    pub async fn get_json<T>(
        &mut self,
        path: &str,
        query: &[(&str, String)],
        operation_name: &str,
    ) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let url = self.url(path, query)?;
        info!("Making request for operation: {}", operation_name);
        debug!("Request URL: {}", url);

        let mut request = self.http.get(url);
        if let Some((name, value)) = &self.auth {
            request = request.header(name.clone(), value.clone());
        }
        if let Some(cookies) = self.jar.as_ref().and_then(CookieJar::header_value) {
            debug!("Sending {} stored cookies", cookies.matches('=').count());
            request = request.header(COOKIE, cookies);
        }

        let response = request.send().await?;
        let status = response.status();
        info!(
            "Received response with status: {} for operation: {}",
            status, operation_name
        );

        if let Some(jar) = self.jar.as_mut() {
            jar.absorb(response.headers());
        }

        let body = response.text().await?;
        if status.is_success() {
            debug!(
                "Response summary for '{}': {} bytes received",
                operation_name,
                body.len()
            );
            return Ok(serde_json::from_str(&body)?);
        }

        error!("Operation '{}' failed - Status: {}", operation_name, status);
        debug!(
            "Error response for '{}': {}",
            operation_name,
            sanitize_for_logging(&body, 200)
        );
        Err(FetchError::Upstream {
            operation: operation_name.to_string(),
            status: status.as_u16(),
            message: upstream_message(&body),
        })
    }

    /// Persists the cookie jar, if any. Call once after the request chain.
    pub fn finish(&mut self) -> Result<()> {
        match self.jar.as_mut() {
            Some(jar) => jar.save(),
            None => Ok(()),
        }
    }
}
