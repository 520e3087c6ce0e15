//! Config command - print the effective configuration

use crate::cli::style::Stylize;
use anstream::{print, println};
use std::path::Path;
use tofu_forms::Result;
use tofu_forms::config::Config;

/// Print the effective configuration and the file it was loaded from
pub fn run_config(config: &Config, path: Option<&Path>) -> Result<()> {
    match path {
        Some(path) => {
            let note = if path.exists() { "" } else { " (not found, using defaults)" };
            println!(
                "{} {}{}",
                "Config file:".emphasis(),
                path.display(),
                note.muted()
            );
        }
        None => println!("{}", "No config directory on this platform".muted()),
    }
    println!();
    print!("{}", config.to_toml()?);
    Ok(())
}
