//! Subscribe command - subscribe an email address

use crate::cli::{CliProgress, build_engine, report};
use dialoguer::Input;
use std::process::ExitCode;
use tofu_forms::config::Config;
use tofu_forms::{EmailSubscriber, Error, Result};

/// Run the subscribe command, prompting for the email when not given
pub async fn run_subscribe(config: &Config, form_id: &str, email: Option<String>) -> Result<ExitCode> {
    let email = match email {
        Some(email) => email,
        None => Input::<String>::new()
            .with_prompt("Email address")
            .interact_text()
            .map_err(|e| Error::Io(format!("failed to read email: {e}")))?,
    };

    let engine = build_engine(config)?;
    let mut subscriber = EmailSubscriber::with_resolver(form_id, &config.resolver()?, engine);
    subscriber.observe(CliProgress::new(format!("Subscribing {}...", email.trim())));

    let state = subscriber.subscribe(&email, None).await;
    Ok(report(subscriber.endpoint(), &state, config.fallback))
}
