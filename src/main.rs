//! tofu - submit forms to HeroTofu endpoints
//!
//! CLI binary for sending form data, JSON records and email subscriptions.

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tofu_forms::config::{Config, FallbackMode};
use tracing_subscriber::EnvFilter;

mod cli;

#[derive(Parser)]
#[command(name = "tofu")]
#[command(about = "Submit forms and JSON data to HeroTofu endpoints")]
#[command(version)]
struct Cli {
    /// Config file (defaults to <config dir>/tofu/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Request timeout in milliseconds
    #[arg(long, global = true)]
    timeout: Option<u64>,

    /// What to do when the endpoint asks for a captcha
    #[arg(long, global = true, value_enum)]
    fallback: Option<FallbackMode>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Submit fields as multipart form data
    Form {
        /// Form id or endpoint URL
        form: String,

        /// Form field, repeatable (name=value)
        #[arg(short, long = "field", value_parser = cli::parse_pair)]
        fields: Vec<(String, String)>,

        /// Extra injected field, repeatable (key=value)
        #[arg(short, long = "inject", value_parser = cli::parse_pair)]
        inject: Vec<(String, String)>,
    },

    /// Send key/value data as a JSON record
    Json {
        /// Form id or endpoint URL
        form: String,

        /// Data entry, repeatable (key=value)
        #[arg(short, long = "data", value_parser = cli::parse_pair)]
        data: Vec<(String, String)>,
    },

    /// Subscribe an email address
    Subscribe {
        /// Form id or endpoint URL
        form: String,

        /// Email address (prompted for when omitted)
        email: Option<String>,
    },

    /// Show the effective configuration
    Config,
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "tofu_forms=debug,tofu=debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Effective config plus the file it was read from
fn load_config(cli: &Cli) -> Result<(Config, Option<PathBuf>)> {
    let (mut config, path) = match cli.config {
        Some(ref path) => {
            let mut config = Config::load_from(path)?;
            config.apply_env(|key| std::env::var(key).ok());
            (config, Some(path.clone()))
        }
        None => (Config::load()?, Config::default_path()),
    };

    if let Some(timeout) = cli.timeout {
        config.timeout_ms = timeout;
    }
    if let Some(fallback) = cli.fallback {
        config.fallback = fallback;
    }
    config.validate()?;
    Ok((config, path))
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let (config, config_path) = load_config(&cli)?;

    let code = match cli.command {
        Commands::Form {
            form,
            fields,
            inject,
        } => {
            cli::run_form(
                &config,
                &form,
                cli::FormOptions {
                    fields,
                    injected: inject,
                },
            )
            .await?
        }
        Commands::Json { form, data } => cli::run_json(&config, &form, data).await?,
        Commands::Subscribe { form, email } => cli::run_subscribe(&config, &form, email).await?,
        Commands::Config => {
            cli::run_config(&config, config_path.as_deref())?;
            ExitCode::SUCCESS
        }
    };

    Ok(code)
}
