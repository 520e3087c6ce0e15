//! Per-engine request options

use std::time::Duration;

/// Default per-request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Wait before retrying a rate-limited submission
pub const RETRY_DELAY: Duration = Duration::from_secs(10);

/// Options applied to every request an engine sends
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestOptions {
    /// Abort an exchange after this long
    pub timeout: Duration,
    /// Wait between a rate-limited attempt and its retry
    pub retry_delay: Duration,
    /// Extra headers, sent after the encoding's own headers
    pub headers: Vec<(String, String)>,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            retry_delay: RETRY_DELAY,
            headers: Vec::new(),
        }
    }
}

impl RequestOptions {
    /// Set the per-request timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the rate-limit retry delay
    #[must_use]
    pub fn with_retry_delay(mut self, retry_delay: Duration) -> Self {
        self.retry_delay = retry_delay;
        self
    }

    /// Add a header to every request
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}
