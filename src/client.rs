//! Submission entry points
//!
//! Each client owns the state of one entry point, the way a UI component
//! would own its request state:
//! - [`FormClient`] posts a form as multipart data
//! - [`JsonClient`] posts injected data as a JSON record
//! - [`EmailSubscriber`] validates an email and posts it as JSON

use crate::encoding::{JsonEncoding, MultipartEncoding, PayloadEncoding};
use crate::endpoint::EndpointResolver;
use crate::error::Error;
use crate::fallback::FallbackForm;
use crate::payload::{build_json_data, extract_form_data};
use crate::state::{CompletionCallback, StateMachine, StateObserver};
use crate::submit::SubmissionEngine;
use crate::types::{FormData, FormSnapshot, InjectedData, JsonData, RequestState};
use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

/// Minimal structural email check: `local@domain.tld`, no spaces
static RE_EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

/// Message for a malformed email address
pub const INVALID_EMAIL: &str = "Invalid email address";

/// One endpoint with its own request state, posting payloads of `E`
///
/// [`FormClient`] and [`JsonClient`] fix the encoding and add the entry
/// point that builds their payload.
#[derive(Debug)]
pub struct SubmissionClient<E: PayloadEncoding> {
    endpoint: String,
    engine: SubmissionEngine,
    encoding: E,
    machine: StateMachine<E::Payload>,
}

/// Submits HTML forms as multipart data
pub type FormClient = SubmissionClient<MultipartEncoding>;

/// Submits injected data as JSON
pub type JsonClient = SubmissionClient<JsonEncoding>;

impl<E: PayloadEncoding + Default> SubmissionClient<E> {
    /// Client for a form id or endpoint URL
    pub fn new(form_id_or_url: &str, engine: SubmissionEngine) -> Self {
        Self::with_resolver(form_id_or_url, &EndpointResolver::default(), engine)
    }

    /// Client resolving short ids against a custom base
    pub fn with_resolver(
        form_id_or_url: &str,
        resolver: &EndpointResolver,
        engine: SubmissionEngine,
    ) -> Self {
        Self {
            endpoint: resolver.resolve(form_id_or_url),
            engine,
            encoding: E::default(),
            machine: StateMachine::new(),
        }
    }
}

impl<E: PayloadEncoding> SubmissionClient<E> {
    /// Resolved endpoint
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Current request state
    pub const fn state(&self) -> &RequestState<E::Payload> {
        self.machine.state()
    }

    /// Observe state transitions
    pub fn observe(&mut self, observer: impl StateObserver<E::Payload> + 'static) {
        self.machine.observe(observer);
    }

    /// Apply a state directly, firing the callback if it is terminal
    pub fn update_state(
        &mut self,
        state: RequestState<E::Payload>,
        on_complete: Option<CompletionCallback<E::Payload>>,
    ) {
        let mut on_complete = on_complete;
        self.machine.apply(state, &mut on_complete);
    }

    async fn submit<F>(
        &mut self,
        data: E::Payload,
        fallback: F,
        on_complete: Option<CompletionCallback<E::Payload>>,
    ) -> RequestState<E::Payload>
    where
        F: FnOnce(&str) -> FallbackForm + Send,
    {
        let endpoint = self.endpoint.as_str();
        self.engine
            .run(
                &mut self.machine,
                endpoint,
                &self.encoding,
                data,
                || fallback(endpoint),
                on_complete,
            )
            .await
    }
}

impl SubmissionClient<MultipartEncoding> {
    /// Submit `form` plus `injected` fields
    ///
    /// Returns the terminal state, which is also left in [`state`](Self::state).
    pub async fn handle_form_submit(
        &mut self,
        form: &FormSnapshot,
        injected: Option<&InjectedData>,
        on_complete: Option<CompletionCallback<FormData>>,
    ) -> RequestState<FormData> {
        let data = extract_form_data(form, injected);
        debug!(endpoint = %self.endpoint, fields = data.len(), "submitting form");

        self.submit(
            data,
            |endpoint| FallbackForm::for_form(endpoint, form, injected),
            on_complete,
        )
        .await
    }
}

impl SubmissionClient<JsonEncoding> {
    /// Send the filtered `injected` data as the whole JSON record
    pub async fn send_data(
        &mut self,
        on_complete: Option<CompletionCallback<JsonData>>,
        injected: Option<&InjectedData>,
    ) -> RequestState<JsonData> {
        let data = build_json_data(injected);
        debug!(endpoint = %self.endpoint, fields = data.len(), "sending JSON data");

        self.submit(
            data,
            |endpoint| FallbackForm::for_json(endpoint, injected),
            on_complete,
        )
        .await
    }
}

/// Subscribes an email address through a JSON endpoint
#[derive(Debug)]
pub struct EmailSubscriber {
    inner: JsonClient,
}

impl EmailSubscriber {
    /// Subscriber for a form id or endpoint URL
    pub fn new(form_id_or_url: &str, engine: SubmissionEngine) -> Self {
        Self {
            inner: JsonClient::new(form_id_or_url, engine),
        }
    }

    /// Subscriber resolving short ids against a custom base
    pub fn with_resolver(
        form_id_or_url: &str,
        resolver: &EndpointResolver,
        engine: SubmissionEngine,
    ) -> Self {
        Self {
            inner: JsonClient::with_resolver(form_id_or_url, resolver, engine),
        }
    }

    /// Resolved endpoint
    pub fn endpoint(&self) -> &str {
        self.inner.endpoint()
    }

    /// Current request state
    pub const fn state(&self) -> &RequestState<JsonData> {
        self.inner.state()
    }

    /// Observe state transitions
    pub fn observe(&mut self, observer: impl StateObserver<JsonData> + 'static) {
        self.inner.observe(observer);
    }

    /// Trim and validate `email`, then send `{email}`
    ///
    /// A malformed address ends in an `Error` state without any request.
    pub async fn subscribe(
        &mut self,
        email: &str,
        on_complete: Option<CompletionCallback<JsonData>>,
    ) -> RequestState<JsonData> {
        let email = email.trim();
        let mut data = JsonData::new();
        data.insert("email".to_string(), email.into());

        if !is_valid_email(email) {
            debug!(email, "rejecting invalid email");
            self.inner.update_state(
                RequestState::Error {
                    error: Error::Validation(INVALID_EMAIL.to_string()),
                    data,
                },
                on_complete,
            );
            return self.inner.state().clone();
        }

        self.inner.send_data(on_complete, Some(&data)).await
    }
}

/// Whether `email` passes the structural check
pub fn is_valid_email(email: &str) -> bool {
    RE_EMAIL.is_match(email)
}
