//! Command-line front ends of the helper binaries.
//!
//! Every invocation ends in exactly one [`Outcome`]: a JSON document (or usage
//! text for `--help`) plus the process exit code. Failures of any kind are
//! folded into `{"success": false, "error": "..."}` with exit code 1, so callers
//! only ever have to parse stdout.
//!
//! The `run` functions take the argument list and an environment lookup so the
//! whole flow can be driven from tests without touching the process environment.

pub mod truthsocial;
pub mod twitter;

use log::{error, warn};
use serde_json::{json, Value};

use crate::error::{FetchError, Result};

/// Number of records fetched when no count is given.
pub const DEFAULT_COUNT: usize = 20;
/// Largest count a single invocation may ask for.
pub const MAX_COUNT: usize = 200;

/// What a helper prints on stdout.
#[derive(Debug, Clone, PartialEq)]
pub enum Output {
    Json { document: Value, pretty: bool },
    Text(String),
}

/// The printed output and exit code of one invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    pub output: Output,
    pub exit_code: i32,
}

impl Outcome {
    pub fn success(document: Value, pretty: bool) -> Self {
        Outcome {
            output: Output::Json { document, pretty },
            exit_code: 0,
        }
    }

    pub fn failure(err: &FetchError, pretty: bool) -> Self {
        error!("Command failed ({}): {}", err.kind(), err);
        Outcome::error_message(err.to_string(), pretty)
    }

    fn error_message(message: String, pretty: bool) -> Self {
        Outcome {
            output: Output::Json {
                document: json!({"success": false, "error": message}),
                pretty,
            },
            exit_code: 1,
        }
    }

    fn from_result(result: Result<Value>, pretty: bool) -> Self {
        match result {
            Ok(document) => Outcome::success(document, pretty),
            Err(err) => Outcome::failure(&err, pretty),
        }
    }

    /// Turns a clap parse failure into an outcome. `--help` and `--version`
    /// print their text and succeed; everything else is a usage error.
    fn from_clap_error(err: clap::Error) -> Self {
        use clap::error::ErrorKind;

        match err.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => Outcome {
                output: Output::Text(err.to_string()),
                exit_code: 0,
            },
            ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => {
                error!("No command given");
                Outcome::error_message(
                    "Missing command; run with --help for usage".to_string(),
                    false,
                )
            }
            _ => {
                let message = usage_error_message(&err);
                error!("Invalid arguments: {}", message);
                Outcome::error_message(message, false)
            }
        }
    }

    /// The exact text written to stdout.
    pub fn render(&self) -> String {
        match &self.output {
            Output::Json { document, pretty } => {
                let rendered = if *pretty {
                    serde_json::to_string_pretty(document)
                } else {
                    serde_json::to_string(document)
                };
                // A `Value` always serializes; keep the envelope shape even if it did not
                rendered.unwrap_or_else(|_| {
                    r#"{"success":false,"error":"failed to serialize output"}"#.to_string()
                })
            }
            Output::Text(text) => text.trim_end().to_string(),
        }
    }
}

/// First paragraph of a clap error, without the `error: ` prefix, on one line.
fn usage_error_message(err: &clap::Error) -> String {
    let rendered = err.to_string();
    let first = rendered.split("\n\n").next().unwrap_or_default();
    let first = first.trim().strip_prefix("error: ").unwrap_or(first.trim());
    first.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Parses an optional record count, defaulting to [`DEFAULT_COUNT`].
pub fn parse_count(raw: Option<&str>) -> Result<usize> {
    let Some(raw) = raw else {
        return Ok(DEFAULT_COUNT);
    };
    match raw.trim().parse::<usize>() {
        Ok(count) if (1..=MAX_COUNT).contains(&count) => Ok(count),
        _ => Err(FetchError::InvalidArgument(format!(
            "Count must be a number between 1 and {}, got '{}'",
            MAX_COUNT, raw
        ))),
    }
}

/// Combines the result of a request chain with the result of persisting its
/// session. A chain failure wins; a save failure only surfaces on success.
fn settle<T>(result: Result<T>, finished: Result<()>) -> Result<T> {
    match (result, finished) {
        (Ok(value), Ok(())) => Ok(value),
        (Ok(_), Err(save_err)) => Err(save_err),
        (Err(err), Ok(())) => Err(err),
        (Err(err), Err(save_err)) => {
            warn!("Failed to persist session after error: {}", save_err);
            Err(err)
        }
    }
}
