//! Persisted browser cookie jar.
//!
//! Cloudflare-fronted sites hand out clearance cookies on the first response. Keeping
//! them between runs makes the helper look like a returning browser instead of a
//! fresh client every time. The file is read once when a client is built and written
//! once when the call chain ends.

use chrono::{DateTime, Utc};
use cookie::Cookie;
use log::{debug, info, warn};
use reqwest::header::{HeaderMap, SET_COOKIE};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{FetchError, Result};

/// Browsers cap cookie lifetimes at 400 days.
const MAX_COOKIE_AGE_SECS: i64 = 400 * 24 * 60 * 60;

/// One stored cookie.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredCookie {
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

impl StoredCookie {
    fn is_expired(&self, now: DateTime<Utc>) -> bool {
        matches!(self.expires_at, Some(at) if at <= now)
    }
}

/// Name-keyed cookies backed by an optional JSON file.
#[derive(Debug, Default)]
pub struct CookieJar {
    path: Option<PathBuf>,
    cookies: BTreeMap<String, StoredCookie>,
    dirty: bool,
}

impl CookieJar {
    /// A jar that never touches the filesystem.
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Loads the jar from `path`.
    ///
    /// A missing file yields an empty jar. An unreadable or corrupt file is logged and
    /// replaced on the next save. Expired cookies are dropped on load.
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let mut jar = CookieJar {
            path: Some(path.clone()),
            ..Default::default()
        };

        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No cookie file at {}, starting fresh", path.display());
                return jar;
            }
            Err(e) => {
                warn!("Failed to read cookie file {}: {}", path.display(), e);
                return jar;
            }
        };

        match serde_json::from_str::<BTreeMap<String, StoredCookie>>(&raw) {
            Ok(cookies) => {
                let now = Utc::now();
                let before = cookies.len();
                jar.cookies = cookies
                    .into_iter()
                    .filter(|(_, cookie)| !cookie.is_expired(now))
                    .collect();
                jar.dirty = jar.cookies.len() != before;
                info!(
                    "Loaded {} cookies from {} ({} expired)",
                    jar.cookies.len(),
                    path.display(),
                    before - jar.cookies.len()
                );
            }
            Err(e) => {
                warn!(
                    "Ignoring corrupt cookie file {}: {}",
                    path.display(),
                    e
                );
                jar.dirty = true;
            }
        }

        jar
    }

    pub fn len(&self) -> usize {
        self.cookies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cookies.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.cookies.get(name).map(|c| c.value.as_str())
    }

    /// The `Cookie` request header value, or `None` when the jar is empty.
    pub fn header_value(&self) -> Option<String> {
        if self.cookies.is_empty() {
            return None;
        }
        Some(
            self.cookies
                .iter()
                .map(|(name, cookie)| format!("{}={}", name, cookie.value))
                .collect::<Vec<_>>()
                .join("; "),
        )
    }

    /// Merges every `Set-Cookie` header of a response into the jar.
    ///
    /// A cookie that arrives already expired (or with `Max-Age=0`) removes the stored one.
    pub fn absorb(&mut self, headers: &HeaderMap) {
        let now = Utc::now();
        for raw in headers.get_all(SET_COOKIE) {
            let Ok(raw) = raw.to_str() else {
                warn!("Skipping non-UTF-8 Set-Cookie header");
                continue;
            };
            match Cookie::parse(raw.to_string()) {
                Ok(parsed) => self.store(&parsed, now),
                Err(e) => warn!("Skipping malformed Set-Cookie header: {}", e),
            }
        }
    }

    fn store(&mut self, parsed: &Cookie<'_>, now: DateTime<Utc>) {
        let expires_at = match parsed.max_age() {
            Some(max_age) => {
                let secs = max_age.whole_seconds().clamp(0, MAX_COOKIE_AGE_SECS);
                Some(now + chrono::Duration::seconds(secs))
            }
            None => parsed
                .expires_datetime()
                .and_then(|at| DateTime::from_timestamp(at.unix_timestamp(), 0)),
        };
        let stored = StoredCookie {
            value: parsed.value().to_string(),
            expires_at,
        };

        if stored.is_expired(now) {
            if self.cookies.remove(parsed.name()).is_some() {
                debug!("Cookie {} expired by server", parsed.name());
                self.dirty = true;
            }
            return;
        }

        if self.cookies.get(parsed.name()) != Some(&stored) {
            debug!("Storing cookie {}", parsed.name());
            self.cookies.insert(parsed.name().to_string(), stored);
            self.dirty = true;
        }
    }

    /// Writes the jar back to its file if anything changed.
    pub fn save(&mut self) -> Result<()> {
        let Some(path) = self.path.as_ref() else {
            return Ok(());
        };
        if !self.dirty {
            debug!("Cookie jar unchanged, not writing {}", path.display());
            return Ok(());
        }

        let body = serde_json::to_string_pretty(&self.cookies)?;
        fs::write(path, body).map_err(|e| {
            FetchError::Session(format!(
                "Failed to write cookie file {}: {}",
                path.display(),
                e
            ))
        })?;
        info!("Saved {} cookies to {}", self.cookies.len(), path.display());
        self.dirty = false;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    fn set_cookie_headers(values: &[&str]) -> HeaderMap {
        let mut headers = HeaderMap::new();
        for value in values {
            headers.append(SET_COOKIE, HeaderValue::from_str(value).unwrap());
        }
        headers
    }

    #[test]
    fn test_absorb_and_header_value() {
        let mut jar = CookieJar::in_memory();
        jar.absorb(&set_cookie_headers(&[
            "__cf_bm=abc123; Path=/; HttpOnly; Secure",
            "_tsid=xyz; Max-Age=3600",
        ]));
        assert_eq!(jar.len(), 2);
        assert_eq!(jar.get("__cf_bm"), Some("abc123"));
        assert_eq!(jar.header_value().unwrap(), "__cf_bm=abc123; _tsid=xyz");
    }

    #[test]
    fn test_max_age_zero_removes_cookie() {
        let mut jar = CookieJar::in_memory();
        jar.absorb(&set_cookie_headers(&["session=1"]));
        jar.absorb(&set_cookie_headers(&["session=; Max-Age=0"]));
        assert!(jar.is_empty());
        assert!(jar.header_value().is_none());
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cookies.json");

        let mut jar = CookieJar::load(&path);
        assert!(jar.is_empty());
        jar.absorb(&set_cookie_headers(&["__cf_bm=first; Max-Age=600"]));
        jar.save().unwrap();

        let reloaded = CookieJar::load(&path);
        assert_eq!(reloaded.get("__cf_bm"), Some("first"));
    }

    #[test]
    fn test_expired_cookies_dropped_on_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cookies.json");
        fs::write(
            &path,
            r#"{"old": {"value": "1", "expires_at": "2001-01-01T00:00:00Z"}, "keep": {"value": "2"}}"#,
        )
        .unwrap();

        let jar = CookieJar::load(&path);
        assert_eq!(jar.get("old"), None);
        assert_eq!(jar.get("keep"), Some("2"));
    }

    #[test]
    fn test_corrupt_file_is_replaced() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cookies.json");
        fs::write(&path, "not json").unwrap();

        let mut jar = CookieJar::load(&path);
        assert!(jar.is_empty());
        jar.save().unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap().trim(), "{}");
    }
}
