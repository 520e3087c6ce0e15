//! Scripted transport and recording fallback sink

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;
use tofu_forms::Error;
use tofu_forms::fallback::{FallbackForm, SubmissionSink};
use tofu_forms::transport::{OutgoingRequest, Transport, TransportResponse};
use tokio::time::Instant;

/// Transport that replays scripted outcomes and records every request
#[derive(Default)]
pub struct MockTransport {
    outcomes: Mutex<VecDeque<tofu_forms::Result<TransportResponse>>>,
    requests: Mutex<Vec<(OutgoingRequest, Instant)>>,
}

#[allow(dead_code)]
impl MockTransport {
    /// Respond with these statuses, in order
    pub fn with_statuses(statuses: &[u16]) -> Self {
        let transport = Self::default();
        {
            let mut outcomes = transport.outcomes.lock().unwrap();
            for &status in statuses {
                outcomes.push_back(Ok(TransportResponse::from_status(status)));
            }
        }
        transport
    }

    /// Fail the first request with a transport error
    pub fn failing(message: &str) -> Self {
        let transport = Self::default();
        transport
            .outcomes
            .lock()
            .unwrap()
            .push_back(Err(Error::Transport(message.to_string())));
        transport
    }

    /// Number of requests made
    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    /// Requests made, in order
    pub fn requests(&self) -> Vec<OutgoingRequest> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .map(|(request, _)| request.clone())
            .collect()
    }

    /// When each request was made
    pub fn call_times(&self) -> Vec<Instant> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .map(|(_, at)| *at)
            .collect()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn post(&self, request: &OutgoingRequest) -> tofu_forms::Result<TransportResponse> {
        self.requests
            .lock()
            .unwrap()
            .push((request.clone(), Instant::now()));
        self.outcomes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(Error::Transport("no scripted response".to_string())))
    }
}

/// Sink that keeps every dispatched fallback form
#[derive(Default)]
pub struct RecordingSink {
    forms: Mutex<Vec<FallbackForm>>,
}

#[allow(dead_code)]
impl RecordingSink {
    /// Forms dispatched so far
    pub fn forms(&self) -> Vec<FallbackForm> {
        self.forms.lock().unwrap().clone()
    }
}

impl SubmissionSink for RecordingSink {
    fn dispatch(&self, form: FallbackForm) {
        self.forms.lock().unwrap().push(form);
    }
}
