//! Submission lifecycle engine
//!
//! Runs one submission attempt end to end:
//! 1. Loading - the payload is applied before any network I/O
//! 2. Exchange - POST, with a single delayed retry on rate limiting
//! 3. Outcome - Success, or Error with the captcha fallback dispatched on a
//!    spam verdict
//!
//! The completion callback fires once, on the terminal state.

mod engine;
mod options;

pub use engine::SubmissionEngine;
pub use options::{DEFAULT_TIMEOUT, RETRY_DELAY, RequestOptions};

/// Status the endpoint returns for an accepted submission
pub const STATUS_SUCCESS: u16 = 200;

/// Status the endpoint returns for likely spam or bot traffic
pub const STATUS_SPAMBOT: u16 = 422;

/// Status the endpoint returns when rate limiting
pub const STATUS_RATELIMIT: u16 = 429;
