//! Configuration file for the `tofu` command
//!
//! Lives at `<config dir>/tofu/config.toml`. Every key is optional:
//!
//! ```toml
//! base_url = "https://public.herotofu.com/v1"
//! timeout_ms = 30000
//! retry_delay_ms = 10000
//! fallback = "browser"   # browser | log | none
//! ```

use crate::endpoint::{DEFAULT_BASE_URL, EndpointResolver};
use crate::error::{Error, Result};
use crate::fallback::{BrowserSink, LogSink, NoopSink, SubmissionSink};
use crate::submit::{DEFAULT_TIMEOUT, RETRY_DELAY, RequestOptions};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Environment variable overriding `base_url`
pub const BASE_URL_ENV: &str = "TOFU_BASE_URL";

/// What to do with a captcha fallback
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum FallbackMode {
    /// Open an auto-submitting page in the browser
    #[default]
    Browser,
    /// Only log that a captcha is required
    Log,
    /// Ignore
    None,
}

impl FallbackMode {
    /// Sink implementing this mode
    pub fn sink(self) -> Arc<dyn SubmissionSink> {
        match self {
            Self::Browser => Arc::new(BrowserSink::default()),
            Self::Log => Arc::new(LogSink),
            Self::None => Arc::new(NoopSink),
        }
    }
}

/// Effective configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL for short form ids
    pub base_url: String,
    /// Per-request timeout in milliseconds
    pub timeout_ms: u64,
    /// Rate-limit retry delay in milliseconds
    pub retry_delay_ms: u64,
    /// Captcha fallback handling
    pub fallback: FallbackMode,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_ms: duration_ms(DEFAULT_TIMEOUT),
            retry_delay_ms: duration_ms(RETRY_DELAY),
            fallback: FallbackMode::default(),
        }
    }
}

fn duration_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

impl Config {
    /// Default config file location
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("tofu").join("config.toml"))
    }

    /// Load from the default location, then apply environment overrides
    ///
    /// A missing file yields the defaults.
    pub fn load() -> Result<Self> {
        let mut config = match Self::default_path() {
            Some(path) if path.exists() => Self::load_from(&path)?,
            _ => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Load from an explicit file
    pub fn load_from(path: &Path) -> Result<Self> {
        debug!(path = %path.display(), "loading config");
        let text = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&text)
            .map_err(|e| Error::Config(format!("{}: {e}", path.display())))?;
        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from an environment lookup
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(base_url) = lookup(BASE_URL_ENV).filter(|v| !v.trim().is_empty()) {
            debug!(base_url = %base_url, "base URL overridden from environment");
            self.base_url = base_url;
        }
    }

    /// Check `base_url` and `timeout_ms`
    ///
    /// Run again after applying overrides.
    pub fn validate(&self) -> Result<()> {
        EndpointResolver::with_base(&self.base_url)?;
        if self.timeout_ms == 0 {
            return Err(Error::Config("timeout_ms must be greater than zero".to_string()));
        }
        Ok(())
    }

    /// Endpoint resolver for `base_url`
    pub fn resolver(&self) -> Result<EndpointResolver> {
        EndpointResolver::with_base(&self.base_url)
    }

    /// Request options from the timeouts
    pub fn request_options(&self) -> RequestOptions {
        RequestOptions::default()
            .with_timeout(Duration::from_millis(self.timeout_ms))
            .with_retry_delay(Duration::from_millis(self.retry_delay_ms))
    }

    /// Render as TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::Config(e.to_string()))
    }
}
