//! CLI commands

mod config;
mod form;
mod json;
mod progress;
mod style;
mod subscribe;

pub use config::run_config;
pub use form::{FormOptions, run_form};
pub use json::run_json;
pub use progress::CliProgress;
pub use subscribe::run_subscribe;

use anstream::{eprintln, println};
use std::process::ExitCode;
use style::{Stylize, check, cross, link};
use tofu_forms::config::{Config, FallbackMode};
use tofu_forms::fallback::FALLBACK_TARGET;
use tofu_forms::{Error, RequestState, SubmissionEngine};

/// Parse `key=value`
pub fn parse_pair(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got `{raw}`"))?;
    if key.is_empty() {
        return Err(format!("empty key in `{raw}`"));
    }
    Ok((key.to_string(), value.to_string()))
}

/// Engine configured from the effective config
fn build_engine(config: &Config) -> tofu_forms::Result<SubmissionEngine> {
    Ok(SubmissionEngine::http()?
        .with_options(config.request_options())
        .with_sink(config.fallback.sink()))
}

/// Print the terminal state and map it to an exit code
fn report<D>(endpoint: &str, state: &RequestState<D>, fallback: FallbackMode) -> ExitCode {
    match state {
        RequestState::Success { .. } => {
            println!("{} Submitted to {}", check(), link(endpoint));
            ExitCode::SUCCESS
        }
        RequestState::Error { error, .. } => {
            eprintln!("{} {}", cross(), error.to_string().failure());
            if matches!(error, Error::BotChallenge) {
                eprintln!("  {}", captcha_hint(endpoint, fallback).muted());
            }
            ExitCode::FAILURE
        }
        RequestState::Idle | RequestState::Loading { .. } => ExitCode::FAILURE,
    }
}

/// What happened to the submission after a captcha verdict
fn captcha_hint(endpoint: &str, fallback: FallbackMode) -> String {
    match fallback {
        FallbackMode::Browser => format!(
            "The form was re-sent from your browser (target {FALLBACK_TARGET}); finish the captcha there."
        ),
        FallbackMode::Log => format!("Open {endpoint} in a browser to complete the captcha."),
        FallbackMode::None => {
            "Nothing was re-sent (fallback = none); submit the form from a browser instead."
                .to_string()
        }
    }
}
