//! Error types for tofu-forms
//!
//! The first five variants are the failures a submission can end in. Their
//! `Display` output is the exact message surfaced in an `Error` state.

use thiserror::Error;

/// Errors produced by tofu-forms
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Both the first attempt and the retry were rate limited
    #[error("Too Many Requests")]
    RateLimited,

    /// Backend flagged the submission as automated traffic
    #[error("Please complete the captcha challenge")]
    BotChallenge,

    /// Backend answered with a non-success status
    #[error("{status_text}")]
    RemoteRejected {
        /// HTTP status code
        status: u16,
        /// Status text of the response
        status_text: String,
    },

    /// Network failure, timeout or abort, with the transport's own message
    #[error("{0}")]
    Transport(String),

    /// Local precondition failed before any request was made
    #[error("{0}")]
    Validation(String),

    /// Payload could not be encoded into a request body
    #[error("failed to encode payload: {0}")]
    Encode(String),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(String),
}

impl Error {
    /// Whether this error came back from the remote service (as opposed to a
    /// local or transport failure)
    pub const fn is_remote(&self) -> bool {
        matches!(
            self,
            Self::RateLimited | Self::BotChallenge | Self::RemoteRejected { .. }
        )
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Encode(err.to_string())
    }
}

/// Result type alias for tofu-forms
pub type Result<T> = std::result::Result<T, Error>;
