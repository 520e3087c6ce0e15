//! Form command - submit fields as multipart form data

use crate::cli::{CliProgress, build_engine, report};
use std::process::ExitCode;
use tofu_forms::config::Config;
use tofu_forms::{FormClient, FormSnapshot, InjectedData, Result};

/// Options for the form command
#[derive(Debug, Clone, Default)]
pub struct FormOptions {
    /// Native form fields, in order
    pub fields: Vec<(String, String)>,
    /// Extra injected fields
    pub injected: Vec<(String, String)>,
}

/// Run the form command
pub async fn run_form(config: &Config, form_id: &str, options: FormOptions) -> Result<ExitCode> {
    let engine = build_engine(config)?;
    let mut client = FormClient::with_resolver(form_id, &config.resolver()?, engine);
    client.observe(CliProgress::new(format!("Submitting form to {}...", client.endpoint())));

    let form = options
        .fields
        .into_iter()
        .fold(FormSnapshot::new(), |form, (name, value)| form.field(name, value));

    let injected: InjectedData = options
        .injected
        .into_iter()
        .map(|(key, value)| (key, value.into()))
        .collect();
    let injected = (!injected.is_empty()).then_some(injected);

    let state = client.handle_form_submit(&form, injected.as_ref(), None).await;
    Ok(report(client.endpoint(), &state, config.fallback))
}
