//! tofu-forms - form and JSON submissions for HeroTofu endpoints
//!
//! Submits HTML form data or JSON payloads to a form-processing endpoint and
//! tracks each request through `Idle → Loading → Success | Error`:
//!
//! 1. Resolve the endpoint from a form id or URL ([`endpoint`])
//! 2. Build the payload from the form and injected data ([`payload`])
//! 3. Run the request lifecycle with rate-limit retry and captcha fallback ([`submit`])
//!
//! The [`client`] module exposes the entry points most callers want:
//! [`FormClient`], [`JsonClient`] and [`EmailSubscriber`].

pub mod client;
pub mod config;
pub mod encoding;
pub mod endpoint;
pub mod error;
pub mod fallback;
pub mod payload;
pub mod state;
pub mod submit;
pub mod transport;
pub mod types;

pub use client::{EmailSubscriber, FormClient, JsonClient, SubmissionClient};
pub use error::{Error, Result};
pub use state::{StateMachine, StateObserver};
pub use submit::{RequestOptions, SubmissionEngine};
pub use types::{FormData, FormSnapshot, InjectedData, JsonData, RequestState};
