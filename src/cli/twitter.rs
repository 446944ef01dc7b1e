//! `twitter_helper`: fetch tweets and profiles as JSON from either backend.

use clap::{Parser, Subcommand, ValueEnum};
use log::info;
use serde_json::{json, Value};
use std::ffi::OsString;

use super::{parse_count, settle, Outcome};
use crate::config::{DataApiConfig, TwitterApiConfig};
use crate::error::Result;
use crate::records::{Tweet, TwitterProfile};
use crate::text::normalize_handle;
use crate::twitter::{DataApiClient, TweetFilter, TwitterApiClient};

/// Where tweets come from.
#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Backend {
    /// Twitter API v2 with `TWITTER_BEARER_TOKEN`
    #[default]
    Api,
    /// Hosted data API with `TWITTER_DATA_API_URL` and `TWITTER_DATA_API_KEY`
    DataApi,
}

#[derive(Parser, Debug)]
#[command(
    name = "twitter_helper",
    version,
    about = "Fetch Twitter/X tweets and profiles as JSON"
)]
struct Cli {
    #[arg(long, global = true, value_enum, default_value_t = Backend::Api)]
    backend: Backend,

    /// Pretty-print the JSON document
    #[arg(long, global = true)]
    pretty: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Recent tweets of a user
    #[command(name = "get_tweets", visible_alias = "get-tweets")]
    GetTweets {
        /// Screen name, with or without a leading @
        username: String,
        /// Number of tweets (1-200, default 20)
        count: Option<String>,
        #[arg(long)]
        exclude_replies: bool,
        #[arg(long)]
        exclude_retweets: bool,
    },
    /// Profile of a user
    #[command(
        name = "get_profile",
        visible_aliases = ["get-profile", "get_user_info"]
    )]
    GetProfile { username: String },
}

/// A connected client for the selected backend.
enum Client {
    Api(TwitterApiClient),
    DataApi(DataApiClient),
}

impl Client {
    fn connect<F>(backend: Backend, lookup: &F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        info!("Using {:?} backend", backend);
        match backend {
            Backend::Api => {
                let config = TwitterApiConfig::from_lookup(lookup)?;
                Ok(Client::Api(TwitterApiClient::new(&config)?))
            }
            Backend::DataApi => {
                let config = DataApiConfig::from_lookup(lookup)?;
                Ok(Client::DataApi(DataApiClient::new(&config)?))
            }
        }
    }

    async fn profile(&mut self, username: &str) -> Result<TwitterProfile> {
        match self {
            Client::Api(client) => client.lookup_user(username).await,
            Client::DataApi(client) => client.get_profile(username).await,
        }
    }

    async fn tweets(
        &mut self,
        username: &str,
        count: usize,
        filter: TweetFilter,
    ) -> Result<Vec<Tweet>> {
        match self {
            Client::Api(client) => client.fetch_tweets(username, count, filter).await,
            Client::DataApi(client) => client.fetch_tweets(username, count, filter).await,
        }
    }

    fn finish(&mut self) -> Result<()> {
        match self {
            Client::Api(client) => client.finish(),
            Client::DataApi(client) => client.finish(),
        }
    }
}

/// Runs the helper with `args` (program name first) and an environment lookup.
pub async fn run<I, T, F>(args: I, lookup: F) -> Outcome
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
    F: Fn(&str) -> Option<String>,
{
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(err) => return Outcome::from_clap_error(err),
    };

    let result = match cli.command {
        Command::GetTweets {
            username,
            count,
            exclude_replies,
            exclude_retweets,
        } => {
            let filter = TweetFilter {
                exclude_replies,
                exclude_retweets,
            };
            get_tweets(cli.backend, &username, count.as_deref(), filter, &lookup).await
        }
        Command::GetProfile { username } => get_profile(cli.backend, &username, &lookup).await,
    };

    Outcome::from_result(result, cli.pretty)
}

async fn get_tweets<F>(
    backend: Backend,
    username: &str,
    count: Option<&str>,
    filter: TweetFilter,
    lookup: &F,
) -> Result<Value>
where
    F: Fn(&str) -> Option<String>,
{
    let username = normalize_handle(username)?;
    let count = parse_count(count)?;
    let mut client = Client::connect(backend, lookup)?;

    let result = client.tweets(&username, count, filter).await;
    let tweets = settle(result, client.finish())?;

    info!("Returning {} tweets for @{}", tweets.len(), username);
    Ok(json!({"success": true, "count": tweets.len(), "tweets": tweets}))
}

async fn get_profile<F>(backend: Backend, username: &str, lookup: &F) -> Result<Value>
where
    F: Fn(&str) -> Option<String>,
{
    let username = normalize_handle(username)?;
    let mut client = Client::connect(backend, lookup)?;

    let result = client.profile(&username).await;
    let user = settle(result, client.finish())?;
    Ok(json!({"success": true, "user": user}))
}
