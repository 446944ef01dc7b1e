//! `truthsocial_helper`: fetch Truth Social posts and accounts as JSON.

use clap::{Parser, Subcommand};
use log::info;
use serde_json::{json, Value};
use std::ffi::OsString;

use super::{parse_count, settle, Outcome};
use crate::config::TruthSocialConfig;
use crate::error::Result;
use crate::text::normalize_handle;
use crate::truthsocial::{StatusFilter, TruthSocialClient};

/// Handle used by `verify` when none is given.
pub const DEFAULT_VERIFY_HANDLE: &str = "realDonaldTrump";

#[derive(Parser, Debug)]
#[command(
    name = "truthsocial_helper",
    version,
    about = "Fetch Truth Social posts and accounts as JSON"
)]
struct Cli {
    /// Pretty-print the JSON document
    #[arg(long, global = true)]
    pretty: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Recent posts of an account
    #[command(name = "get_posts", visible_alias = "get-posts")]
    GetPosts {
        /// Account handle, with or without a leading @
        handle: String,
        /// Number of posts (1-200, default 20)
        limit: Option<String>,
        /// Keep replies in the timeline
        #[arg(long)]
        include_replies: bool,
        /// Keep reblogs in the timeline
        #[arg(long)]
        include_reblogs: bool,
    },
    /// Account summary
    Lookup { handle: String },
    /// Check that the configured token works by looking up an account
    Verify { handle: Option<String> },
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
        Command::GetPosts {
            handle,
            limit,
            include_replies,
            include_reblogs,
        } => {
            let filter = StatusFilter {
                exclude_replies: !include_replies,
                exclude_reblogs: !include_reblogs,
            };
            get_posts(&handle, limit.as_deref(), filter, &lookup).await
        }
        Command::Lookup { handle } => lookup_account(&handle, &lookup).await,
        Command::Verify { handle } => {
            verify(handle.as_deref().unwrap_or(DEFAULT_VERIFY_HANDLE), &lookup).await
        }
    };

    Outcome::from_result(result, cli.pretty)
}

fn connect<F>(lookup: &F) -> Result<TruthSocialClient>
where
    F: Fn(&str) -> Option<String>,
{
    let config = TruthSocialConfig::from_lookup(lookup)?;
    TruthSocialClient::new(&config)
}

async fn get_posts<F>(
    handle: &str,
    limit: Option<&str>,
    filter: StatusFilter,
    lookup: &F,
) -> Result<Value>
where
    F: Fn(&str) -> Option<String>,
{
    let handle = normalize_handle(handle)?;
    let limit = parse_count(limit)?;
    let mut client = connect(lookup)?;

    let result = client.fetch_posts(&handle, limit, filter).await;
    let posts = settle(result, client.finish())?;

    info!("Returning {} posts for @{}", posts.len(), handle);
    Ok(json!({"success": true, "count": posts.len(), "posts": posts}))
}

async fn lookup_account<F>(handle: &str, lookup: &F) -> Result<Value>
where
    F: Fn(&str) -> Option<String>,
{
    let handle = normalize_handle(handle)?;
    let mut client = connect(lookup)?;

    let result = client.account_summary(&handle).await;
    let account = settle(result, client.finish())?;
    Ok(json!({"success": true, "account": account}))
}

async fn verify<F>(handle: &str, lookup: &F) -> Result<Value>
where
    F: Fn(&str) -> Option<String>,
{
    let handle = normalize_handle(handle)?;
    let mut client = connect(lookup)?;

    let result = client.account_summary(&handle).await;
    let account = settle(result, client.finish())?;
    info!("Token verified against @{}", handle);
    Ok(json!({"success": true, "valid": true, "account": account}))
}
