//! Native form fallback for bot-flagged submissions
//!
//! When the backend answers "likely spam", the submission is repeated as a
//! plain browser form post so the endpoint's own captcha page can run. This
//! is a one-way command: whatever happens in the browser is never reported
//! back into the request state.

use crate::error::Result;
use crate::payload::{injected_fields, native_fields};
use crate::types::{FormSnapshot, InjectedData};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, info, warn};

/// Target for the fallback submission: a new browsing context
pub const FALLBACK_TARGET: &str = "_blank";

/// Encoding used when re-posting a form
pub const FORM_ENCTYPE: &str = "multipart/form-data";

/// A form to be submitted natively by a browser
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FallbackForm {
    /// `action` attribute: the resolved endpoint
    pub action: String,
    /// `target` attribute, always `_blank`
    pub target: String,
    /// `enctype` attribute, set for re-posted forms only
    pub enctype: Option<String>,
    /// Fields of the original form, in document order
    pub fields: Vec<(String, String)>,
    /// Hidden fields added from injected data
    pub hidden: Vec<(String, String)>,
}

impl FallbackForm {
    /// Re-post of an existing form plus injected hidden fields
    pub fn for_form(action: &str, form: &FormSnapshot, injected: Option<&InjectedData>) -> Self {
        Self {
            action: action.to_string(),
            target: FALLBACK_TARGET.to_string(),
            enctype: Some(FORM_ENCTYPE.to_string()),
            fields: native_fields(form),
            hidden: injected_fields(injected),
        }
    }

    /// A fresh form carrying only injected hidden fields
    pub fn for_json(action: &str, injected: Option<&InjectedData>) -> Self {
        Self {
            action: action.to_string(),
            target: FALLBACK_TARGET.to_string(),
            enctype: None,
            fields: Vec::new(),
            hidden: injected_fields(injected),
        }
    }

    /// Render as a page that submits itself on load
    pub fn to_html(&self) -> String {
        let mut html = String::from(
            "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n\
             <title>Complete the captcha challenge</title>\n</head>\n<body>\n",
        );

        let _ = write!(
            html,
            "<form method=\"POST\" action=\"{}\" target=\"{}\"",
            escape_html(&self.action),
            escape_html(&self.target)
        );
        if let Some(ref enctype) = self.enctype {
            let _ = write!(html, " enctype=\"{}\"", escape_html(enctype));
        }
        html.push_str(">\n");

        for (name, value) in self.fields.iter().chain(&self.hidden) {
            let _ = writeln!(
                html,
                "<input type=\"hidden\" name=\"{}\" value=\"{}\">",
                escape_html(name),
                escape_html(value)
            );
        }

        html.push_str("<noscript><button type=\"submit\">Continue</button></noscript>\n");
        html.push_str("</form>\n<script>document.forms[0].submit();</script>\n");
        html.push_str("</body>\n</html>\n");
        html
    }
}

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Receives fallback submissions
///
/// Fire-and-forget: implementations must not fail the caller. Errors are
/// logged and dropped.
pub trait SubmissionSink: Send + Sync {
    /// Submit the form natively
    fn dispatch(&self, form: FallbackForm);
}

/// Sink that discards fallback submissions
pub struct NoopSink;

impl SubmissionSink for NoopSink {
    fn dispatch(&self, _form: FallbackForm) {}
}

/// Sink that only logs the fallback submission
pub struct LogSink;

impl SubmissionSink for LogSink {
    fn dispatch(&self, form: FallbackForm) {
        warn!(
            action = %form.action,
            fields = form.fields.len() + form.hidden.len(),
            "captcha challenge required, open the form action in a browser"
        );
    }
}

/// Sink that writes an auto-submitting page and opens it in the browser
pub struct BrowserSink {
    dir: PathBuf,
    open: bool,
}

impl Default for BrowserSink {
    fn default() -> Self {
        Self::new(std::env::temp_dir())
    }
}

impl BrowserSink {
    /// Write pages into `dir` and open them
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            open: true,
        }
    }

    /// Write pages into `dir` without launching a browser
    pub fn write_only(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            open: false,
        }
    }

    /// Write the page for `form`, returning its path
    pub fn write_page(&self, form: &FallbackForm) -> Result<PathBuf> {
        std::fs::create_dir_all(&self.dir)?;
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or_default();
        let path = self
            .dir
            .join(format!("tofu-fallback-{}-{nanos}.html", std::process::id()));
        std::fs::write(&path, form.to_html())?;
        debug!(path = %path.display(), "wrote fallback page");
        Ok(path)
    }
}

impl SubmissionSink for BrowserSink {
    fn dispatch(&self, form: FallbackForm) {
        let path = match self.write_page(&form) {
            Ok(path) => path,
            Err(e) => {
                warn!(error = %e, "failed to write fallback page");
                return;
            }
        };

        if !self.open {
            info!(path = %path.display(), "fallback page written");
            return;
        }

        if let Err(e) = open_in_browser(&path) {
            warn!(error = %e, path = %path.display(), "failed to open browser");
        }
    }
}

fn open_in_browser(path: &Path) -> std::io::Result<()> {
    #[cfg(target_os = "macos")]
    let mut command = std::process::Command::new("open");
    #[cfg(target_os = "windows")]
    let mut command = {
        let mut c = std::process::Command::new("cmd");
        c.args(["/C", "start", ""]);
        c
    };
    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    let mut command = std::process::Command::new("xdg-open");

    // Not waited on: the browser outlives us
    command.arg(path).spawn().map(drop)
}
