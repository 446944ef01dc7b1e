//! Truth Social integration module.
//!
//! Account lookup and status timelines over the Mastodon-compatible REST API,
//! plus the mapping from statuses to output posts.

mod client;
mod normalize;
mod types;

pub use client::{StatusFilter, TruthSocialClient, MAX_PAGES, PAGE_SIZE};
pub use normalize::{normalize_account, normalize_status, normalize_statuses, status_url};
pub use types::{Account, MediaAttachment, Status};
