//! # Socialfetch Library
//!
//! Fetches recent posts from Truth Social and Twitter/X and reshapes them into a
//! small, flat JSON schema. Each helper binary runs one chain per invocation:
//! resolve a handle to an account identifier, page through the account's
//! timeline, normalize the records and print a single JSON document.
//!
//! ## Providers
//!
//! - Truth Social: the Mastodon-compatible REST API, called with a browser identity
//!   (Chrome User-Agent, Origin/Referer) and a cookie jar persisted between runs
//! - Twitter/X: either the API v2 with a bearer token, or a hosted data API that
//!   relays the web GraphQL payloads
//!
//! ## Configuration
//!
//! Credentials come from environment variables only:
//! - `TRUTHSOCIAL_TOKEN`: Truth Social bearer token
//! - `TWITTER_BEARER_TOKEN`: Twitter API v2 bearer token
//! - `TWITTER_DATA_API_URL`, `TWITTER_DATA_API_KEY`: data API endpoint and key
//!
//! See [`config`] for the optional overrides.
//!
//! ## Output
//!
//! - `{"success": true, "posts": [...], "count": n}` and friends on success
//! - `{"success": false, "error": "..."}` with exit code 1 on any failure

pub mod cli;
pub mod config;
mod de;
pub mod error;
pub mod http;
pub mod records;
pub mod session;
pub mod text;
pub mod truthsocial;
pub mod twitter;

// Re-export commonly used types and functions
pub use cli::{Outcome, Output};
pub use config::{DataApiConfig, TruthSocialConfig, TwitterApiConfig};
pub use error::{FetchError, Result};
pub use records::{AccountSummary, Author, Media, Post, Tweet, TwitterProfile};
pub use text::{normalize_handle, to_plain_text};
pub use truthsocial::TruthSocialClient;
pub use twitter::{DataApiClient, TwitterApiClient};
