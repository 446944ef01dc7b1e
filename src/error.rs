//! Error types shared by every helper.
//!
//! All failures end up in the same place: the top of a binary turns them into a
//! `{"success": false, "error": "..."}` document and exit code 1. The variants
//! only exist so the library can log and test them precisely.

use thiserror::Error;

/// Everything that can go wrong while fetching and reshaping posts.
#[derive(Error, Debug)]
pub enum FetchError {
    /// One or more required environment variables are unset or empty
    #[error("Missing required environment variable(s): {}", .0.join(", "))]
    MissingCredentials(Vec<String>),

    /// A command-line argument was missing or malformed
    #[error("{0}")]
    InvalidArgument(String),

    /// The provider answered with a non-success status
    #[error("Upstream error for operation '{operation}' ({status}): {message}")]
    Upstream {
        operation: String,
        status: u16,
        message: String,
    },

    /// The lookup endpoint did not resolve the handle
    #[error("User @{0} not found")]
    UserNotFound(String),

    /// The lookup response carried no usable identifier
    #[error("Could not get user ID for @{0}")]
    MissingIdentifier(String),

    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A base URL could not be parsed or joined
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// The cookie file could not be written
    #[error("Session error: {0}")]
    Session(String),

    /// A configuration value was present but unusable
    #[error("Configuration error: {0}")]
    Config(String),
}

impl FetchError {
    /// Short machine-friendly name of the error category, used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MissingCredentials(_) => "missing_credentials",
            Self::InvalidArgument(_) => "invalid_argument",
            Self::Upstream { .. } => "upstream",
            Self::UserNotFound(_) | Self::MissingIdentifier(_) => "lookup",
            Self::Http(_) => "http",
            Self::Json(_) => "json",
            Self::Url(_) | Self::Config(_) => "config",
            Self::Session(_) => "session",
        }
    }
}

pub type Result<T> = std::result::Result<T, FetchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_credentials_names_every_variable() {
        let err = FetchError::MissingCredentials(vec![
            "TWITTER_DATA_API_URL".into(),
            "TWITTER_DATA_API_KEY".into(),
        ]);
        assert_eq!(
            err.to_string(),
            "Missing required environment variable(s): TWITTER_DATA_API_URL, TWITTER_DATA_API_KEY"
        );
        assert_eq!(err.kind(), "missing_credentials");
    }

    #[test]
    fn lookup_errors_mention_the_handle() {
        assert_eq!(
            FetchError::UserNotFound("nobody".into()).to_string(),
            "User @nobody not found"
        );
        assert_eq!(
            FetchError::MissingIdentifier("ghost".into()).to_string(),
            "Could not get user ID for @ghost"
        );
    }
}
