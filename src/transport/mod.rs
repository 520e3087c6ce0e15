//! Transport for submission requests
//!
//! The lifecycle engine only needs a single POST with a timeout. Keeping it
//! behind a trait lets tests and other runtimes swap the HTTP stack out.

mod http;

pub use http::HttpTransport;

use crate::error::Result;
use crate::types::FormData;
use async_trait::async_trait;
use std::time::Duration;

/// Encoded request body
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    /// `multipart/form-data` fields, duplicates preserved
    Multipart(FormData),
    /// Raw JSON text
    Json(String),
}

/// A fully prepared POST request
#[derive(Debug, Clone, PartialEq)]
pub struct OutgoingRequest {
    /// Target URL
    pub url: String,
    /// Body
    pub body: RequestBody,
    /// Extra headers, applied in order
    pub headers: Vec<(String, String)>,
    /// Abort the exchange after this long
    pub timeout: Duration,
}

/// Status line of a response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    /// Numeric status code
    pub status: u16,
    /// Status text, e.g. "Not Found"
    pub status_text: String,
}

impl TransportResponse {
    /// Build a response from a status code, using its canonical reason phrase
    pub fn from_status(status: u16) -> Self {
        let status_text = reqwest::StatusCode::from_u16(status)
            .ok()
            .and_then(|s| s.canonical_reason())
            .unwrap_or_default()
            .to_string();
        Self {
            status,
            status_text,
        }
    }
}

/// Performs a single POST exchange
///
/// Implementations fail with [`crate::Error::Transport`] on network errors,
/// timeouts and aborts; any HTTP status (including 4xx/5xx) is a successful
/// exchange.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send the request and return the response status
    async fn post(&self, request: &OutgoingRequest) -> Result<TransportResponse>;
}
