//! The lifecycle engine shared by form and JSON submissions

use crate::encoding::PayloadEncoding;
use crate::error::{Error, Result};
use crate::fallback::{FallbackForm, LogSink, SubmissionSink};
use crate::state::{CompletionCallback, StateMachine};
use crate::submit::{RequestOptions, STATUS_RATELIMIT, STATUS_SPAMBOT, STATUS_SUCCESS};
use crate::transport::{HttpTransport, OutgoingRequest, Transport, TransportResponse};
use crate::types::RequestState;
use std::sync::Arc;
use tracing::{debug, warn};

/// Runs submissions against a transport, dispatching captcha fallbacks to a sink
///
/// Holds no per-submission state: each [`run`](Self::run) works only on the
/// payload and the state machine it is given. Cloning is cheap.
#[derive(Clone)]
pub struct SubmissionEngine {
    transport: Arc<dyn Transport>,
    sink: Arc<dyn SubmissionSink>,
    options: RequestOptions,
}

impl SubmissionEngine {
    /// Create an engine with default options
    pub fn new(transport: Arc<dyn Transport>, sink: Arc<dyn SubmissionSink>) -> Self {
        Self {
            transport,
            sink,
            options: RequestOptions::default(),
        }
    }

    /// Engine over reqwest that logs captcha fallbacks
    pub fn http() -> Result<Self> {
        Ok(Self::new(Arc::new(HttpTransport::new()?), Arc::new(LogSink)))
    }

    /// Replace the request options
    #[must_use]
    pub fn with_options(mut self, options: RequestOptions) -> Self {
        self.options = options;
        self
    }

    /// Replace the fallback sink
    #[must_use]
    pub fn with_sink(mut self, sink: Arc<dyn SubmissionSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Options applied to every request
    pub const fn options(&self) -> &RequestOptions {
        &self.options
    }

    /// Run one submission attempt
    ///
    /// Applies `Loading` before any I/O, then exactly one terminal state. The
    /// callback runs once, after the terminal state is applied. Failures
    /// never surface as `Err`; they end in an `Error` state carrying the
    /// payload that was sent.
    ///
    /// `fallback` is only built when the endpoint flags the submission as spam.
    ///
    /// Taking `machine` by `&mut` serializes submissions that share a state
    /// container; independent containers run concurrently.
    pub async fn run<E, F>(
        &self,
        machine: &mut StateMachine<E::Payload>,
        endpoint: &str,
        encoding: &E,
        payload: E::Payload,
        fallback: F,
        on_complete: Option<CompletionCallback<E::Payload>>,
    ) -> RequestState<E::Payload>
    where
        E: PayloadEncoding,
        F: FnOnce() -> FallbackForm + Send,
    {
        let mut on_complete = on_complete;
        machine.apply(
            RequestState::Loading {
                data: payload.clone(),
            },
            &mut on_complete,
        );

        let terminal = match self.exchange(endpoint, encoding, &payload, fallback).await {
            Ok(()) => {
                debug!(endpoint, "submission succeeded");
                RequestState::Success { data: payload }
            }
            Err(error) => {
                warn!(endpoint, error = %error, "submission failed");
                RequestState::Error {
                    error,
                    data: payload,
                }
            }
        };

        machine.apply(terminal, &mut on_complete);
        machine.state().clone()
    }

    async fn exchange<E, F>(
        &self,
        endpoint: &str,
        encoding: &E,
        payload: &E::Payload,
        fallback: F,
    ) -> Result<()>
    where
        E: PayloadEncoding,
        F: FnOnce() -> FallbackForm + Send,
    {
        let headers = merge_headers(encoding.headers(), &self.options.headers);
        let request = OutgoingRequest {
            url: endpoint.to_string(),
            body: encoding.body(payload)?,
            headers,
            timeout: self.options.timeout,
        };

        let mut response = self.send(&request, 1).await?;

        // One retry after the delay, then give up
        if response.status == STATUS_RATELIMIT {
            warn!(
                endpoint,
                delay_ms = self.options.retry_delay.as_millis(),
                "rate limited, retrying once"
            );
            tokio::time::sleep(self.options.retry_delay).await;

            response = self.send(&request, 2).await?;
            if response.status == STATUS_RATELIMIT {
                return Err(Error::RateLimited);
            }
        }

        if response.status == STATUS_SPAMBOT {
            warn!(endpoint, "submission flagged as spam, dispatching native form");
            self.sink.dispatch(fallback());
            return Err(Error::BotChallenge);
        }

        if response.status != STATUS_SUCCESS {
            return Err(Error::RemoteRejected {
                status: response.status,
                status_text: response.status_text,
            });
        }

        Ok(())
    }

    async fn send(&self, request: &OutgoingRequest, attempt: u32) -> Result<TransportResponse> {
        debug!(endpoint = %request.url, attempt, "posting submission");
        let response = self.transport.post(request).await?;
        debug!(
            endpoint = %request.url,
            attempt,
            status = response.status,
            "submission response"
        );
        Ok(response)
    }
}

/// Caller headers replace encoding headers of the same name
fn merge_headers(
    mut headers: Vec<(String, String)>,
    overrides: &[(String, String)],
) -> Vec<(String, String)> {
    for (name, value) in overrides {
        headers.retain(|(existing, _)| !existing.eq_ignore_ascii_case(name));
        headers.push((name.clone(), value.clone()));
    }
    headers
}

impl std::fmt::Debug for SubmissionEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubmissionEngine")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}
