//! Twitter Helper
//!
//! Fetches tweets or a user profile from Twitter/X and prints them as JSON.
//!
//! ```bash
//! TWITTER_BEARER_TOKEN=... twitter_helper get_tweets NASA 10
//! TWITTER_DATA_API_URL=... TWITTER_DATA_API_KEY=... \
//!     twitter_helper --backend data-api get_profile NASA
//! ```
//!
//! Logs go to stderr; set `RUST_LOG=debug` for request details.

use socialfetch::cli::twitter;
use socialfetch::config::env_lookup;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Initialize the logging system
    env_logger::init();

    let outcome = twitter::run(std::env::args_os(), env_lookup).await;
    println!("{}", outcome.render());
    std::process::exit(outcome.exit_code);
}
