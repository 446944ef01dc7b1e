//! Twitter/X integration module.
//!
//! Two interchangeable backends fetch the same records: the public API v2 with an
//! app-only bearer token, and a hosted data API that relays the web GraphQL
//! payloads. Both resolve a username first and then page the user's timeline.

mod api;
mod data_api;
mod graphql;
mod normalize;
mod types;

pub use api::{TwitterApiClient, MAX_PAGE_SIZE, MIN_PAGE_SIZE};
pub use data_api::DataApiClient;
pub use normalize::{
    profile_from_graphql, profile_from_v2, timeline_from_graphql, tweet_url, TimelinePage,
};

use crate::records::Tweet;

/// Upper bound on timeline pages fetched for one request.
pub const MAX_PAGES: u32 = 10;

/// Which tweets a timeline fetch leaves out. Nothing is excluded by default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TweetFilter {
    pub exclude_replies: bool,
    pub exclude_retweets: bool,
}

impl TweetFilter {
    /// Value of the v2 `exclude` query parameter, if anything is excluded.
    pub(crate) fn exclude_param(&self) -> Option<String> {
        let mut parts = Vec::new();
        if self.exclude_replies {
            parts.push("replies");
        }
        if self.exclude_retweets {
            parts.push("retweets");
        }
        (!parts.is_empty()).then(|| parts.join(","))
    }

    pub(crate) fn keeps(&self, tweet: &Tweet) -> bool {
        !(self.exclude_replies && tweet.is_reply || self.exclude_retweets && tweet.is_retweet)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exclude_param() {
        assert_eq!(TweetFilter::default().exclude_param(), None);
        let both = TweetFilter {
            exclude_replies: true,
            exclude_retweets: true,
        };
        assert_eq!(both.exclude_param().as_deref(), Some("replies,retweets"));
        let retweets = TweetFilter {
            exclude_replies: false,
            exclude_retweets: true,
        };
        assert_eq!(retweets.exclude_param().as_deref(), Some("retweets"));
    }
}
