//! Truth Social Helper
//!
//! Fetches posts or account details from Truth Social and prints them as JSON.
//!
//! ```bash
//! TRUTHSOCIAL_TOKEN=... truthsocial_helper get_posts realDonaldTrump 10
//! TRUTHSOCIAL_TOKEN=... truthsocial_helper lookup @realDonaldTrump --pretty
//! TRUTHSOCIAL_TOKEN=... truthsocial_helper verify
//! ```
//!
//! Logs go to stderr; set `RUST_LOG=debug` for request details.

use socialfetch::cli::truthsocial;
use socialfetch::config::env_lookup;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Initialize the logging system
    env_logger::init();

    let outcome = truthsocial::run(std::env::args_os(), env_lookup).await;
    println!("{}", outcome.render());
    std::process::exit(outcome.exit_code);
}
