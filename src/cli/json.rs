//! JSON command - send key/value data as a JSON record

use crate::cli::{CliProgress, build_engine, report};
use serde_json::Value;
use std::process::ExitCode;
use tofu_forms::config::Config;
use tofu_forms::{InjectedData, JsonClient, Result};

/// Run the json command
///
/// Values that parse as JSON (numbers, booleans) keep their type; anything
/// else is sent as a string.
pub async fn run_json(config: &Config, form_id: &str, data: Vec<(String, String)>) -> Result<ExitCode> {
    let engine = build_engine(config)?;
    let mut client = JsonClient::with_resolver(form_id, &config.resolver()?, engine);
    client.observe(CliProgress::new(format!("Sending data to {}...", client.endpoint())));

    let injected: InjectedData = data
        .into_iter()
        .map(|(key, raw)| {
            let value = serde_json::from_str(&raw).unwrap_or(Value::String(raw));
            (key, value)
        })
        .collect();

    let state = client.send_data(None, Some(&injected)).await;
    Ok(report(client.endpoint(), &state, config.fallback))
}
