//! Configuration module for the social helpers.
//!
//! This module contains the credential structures and environment variable handling
//! for the Truth Social and Twitter/X integrations. Every loader comes in two forms:
//! `from_env()` reads the process environment, `from_lookup()` takes any key lookup
//! so callers (and tests) can supply values from elsewhere.

use log::{debug, error, info, warn};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::{FetchError, Result};

pub const TRUTHSOCIAL_TOKEN_VAR: &str = "TRUTHSOCIAL_TOKEN";
pub const TRUTHSOCIAL_API_BASE_VAR: &str = "TRUTHSOCIAL_API_BASE";
pub const TRUTHSOCIAL_COOKIE_FILE_VAR: &str = "TRUTHSOCIAL_COOKIE_FILE";
pub const TWITTER_BEARER_TOKEN_VAR: &str = "TWITTER_BEARER_TOKEN";
pub const TWITTER_API_BASE_VAR: &str = "TWITTER_API_BASE";
pub const TWITTER_DATA_API_URL_VAR: &str = "TWITTER_DATA_API_URL";
pub const TWITTER_DATA_API_KEY_VAR: &str = "TWITTER_DATA_API_KEY";
pub const TIMEOUT_SECS_VAR: &str = "SOCIALFETCH_TIMEOUT_SECS";

pub const DEFAULT_TRUTHSOCIAL_API_BASE: &str = "https://truthsocial.com/api";
pub const DEFAULT_TWITTER_API_BASE: &str = "https://api.x.com";
pub const DEFAULT_COOKIE_FILE: &str = ".truthsocial_cookies.json";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Masks a secret for logging, keeping at most 8 characters on each side.
pub(crate) fn mask_token(token: &str) -> String {
    let chars: Vec<char> = token.chars().collect();
    let len = chars.len();
    let prefix: String = chars.iter().take(8).collect();

    if len > 16 {
        let suffix: String = chars[len - 8..].iter().collect();
        format!("{}...{}", prefix, suffix)
    } else {
        format!("{}...", prefix)
    }
}

/// Reads a variable, treating an empty value the same as an unset one.
fn optional<F>(lookup: &F, name: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(name)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Reads a secret variable, recording its name in `missing` when absent.
fn required_secret<F>(lookup: &F, name: &str, missing: &mut Vec<String>) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    match optional(lookup, name) {
        Some(value) => {
            info!(
                "Found {} environment variable with length: {}",
                name,
                value.len()
            );
            debug!("{} (masked): {}", name, mask_token(&value));
            if value.len() < 10 {
                warn!(
                    "{} seems unusually short ({} characters)",
                    name,
                    value.len()
                );
            }
            Some(value)
        }
        None => {
            error!("Make sure {} environment variable is set", name);
            missing.push(name.to_string());
            None
        }
    }
}

fn base_url<F>(lookup: &F, name: &str, default: &str) -> String
where
    F: Fn(&str) -> Option<String>,
{
    match optional(lookup, name) {
        Some(base) => {
            info!("Using {} override: {}", name, base);
            base.trim_end_matches('/').to_string()
        }
        None => default.to_string(),
    }
}

fn timeout<F>(lookup: &F) -> Result<Duration>
where
    F: Fn(&str) -> Option<String>,
{
    match optional(lookup, TIMEOUT_SECS_VAR) {
        Some(raw) => raw
            .parse::<u64>()
            .ok()
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
            .ok_or_else(|| {
                FetchError::Config(format!(
                    "{} must be a positive number of seconds, got '{}'",
                    TIMEOUT_SECS_VAR, raw
                ))
            }),
        None => Ok(Duration::from_secs(DEFAULT_TIMEOUT_SECS)),
    }
}

/// Reads a variable from the process environment.
pub fn env_lookup(name: &str) -> Option<String> {
    env::var(name).ok()
}

/// Credentials and endpoints for the Truth Social helper.
#[derive(Debug, Clone)]
pub struct TruthSocialConfig {
    /// Bearer token copied from a logged-in browser session
    pub access_token: String,
    /// API root, `https://truthsocial.com/api` unless overridden
    pub api_base: String,
    /// Where the browser cookie jar is persisted; `None` disables it
    pub cookie_file: Option<PathBuf>,
    pub timeout: Duration,
}

impl TruthSocialConfig {
    /// Loads the configuration from the process environment.
    ///
    /// # Required Environment Variables
    ///
    /// - `TRUTHSOCIAL_TOKEN`: bearer token for the Truth Social API
    ///
    /// # Optional Environment Variables
    ///
    /// - `TRUTHSOCIAL_API_BASE`: API root (defaults to `https://truthsocial.com/api`)
    /// - `TRUTHSOCIAL_COOKIE_FILE`: cookie jar path, or `off` to disable it
    /// - `SOCIALFETCH_TIMEOUT_SECS`: per-request timeout (defaults to 30)
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(env_lookup)
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        info!("Loading Truth Social configuration");

        let mut missing = Vec::new();
        let access_token = required_secret(&lookup, TRUTHSOCIAL_TOKEN_VAR, &mut missing);
        let access_token = match access_token {
            Some(token) => token,
            None => return Err(FetchError::MissingCredentials(missing)),
        };

        let cookie_file = match optional(&lookup, TRUTHSOCIAL_COOKIE_FILE_VAR) {
            Some(path) if path.eq_ignore_ascii_case("off") => {
                info!("Cookie jar disabled via {}", TRUTHSOCIAL_COOKIE_FILE_VAR);
                None
            }
            Some(path) => Some(PathBuf::from(path)),
            None => Some(PathBuf::from(DEFAULT_COOKIE_FILE)),
        };

        let config = TruthSocialConfig {
            access_token,
            api_base: base_url(
                &lookup,
                TRUTHSOCIAL_API_BASE_VAR,
                DEFAULT_TRUTHSOCIAL_API_BASE,
            ),
            cookie_file,
            timeout: timeout(&lookup)?,
        };

        info!("Truth Social configuration loaded successfully");
        Ok(config)
    }
}

/// Credentials for the Twitter API v2 backend.
#[derive(Debug, Clone)]
pub struct TwitterApiConfig {
    /// App-only or user-context bearer token
    pub bearer_token: String,
    pub api_base: String,
    pub timeout: Duration,
}

impl TwitterApiConfig {
    /// Loads the configuration from the process environment.
    ///
    /// Requires `TWITTER_BEARER_TOKEN`; `TWITTER_API_BASE` overrides the API root.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(env_lookup)
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        info!("Loading Twitter API configuration");

        let mut missing = Vec::new();
        let bearer_token = match required_secret(&lookup, TWITTER_BEARER_TOKEN_VAR, &mut missing)
        {
            Some(token) => token,
            None => return Err(FetchError::MissingCredentials(missing)),
        };

        Ok(TwitterApiConfig {
            bearer_token,
            api_base: base_url(&lookup, TWITTER_API_BASE_VAR, DEFAULT_TWITTER_API_BASE),
            timeout: timeout(&lookup)?,
        })
    }
}

/// Credentials for the hosted Twitter data API.
#[derive(Debug, Clone)]
pub struct DataApiConfig {
    pub api_url: String,
    pub api_key: String,
    pub timeout: Duration,
}

impl DataApiConfig {
    /// Loads the configuration from the process environment.
    ///
    /// Requires both `TWITTER_DATA_API_URL` and `TWITTER_DATA_API_KEY`. When both are
    /// missing the error names both.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(env_lookup)
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        info!("Loading Twitter data API configuration");

        let mut missing = Vec::new();
        let api_url = match optional(&lookup, TWITTER_DATA_API_URL_VAR) {
            Some(url) => Some(url.trim_end_matches('/').to_string()),
            None => {
                error!(
                    "Make sure {} environment variable is set",
                    TWITTER_DATA_API_URL_VAR
                );
                missing.push(TWITTER_DATA_API_URL_VAR.to_string());
                None
            }
        };
        let api_key = required_secret(&lookup, TWITTER_DATA_API_KEY_VAR, &mut missing);

        match (api_url, api_key) {
            (Some(api_url), Some(api_key)) => Ok(DataApiConfig {
                api_url,
                api_key,
                timeout: timeout(&lookup)?,
            }),
            _ => Err(FetchError::MissingCredentials(missing)),
        }
    }
}
