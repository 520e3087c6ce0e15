//! Terminal styling helpers

use indicatif::ProgressStyle;
use owo_colors::{OwoColorize, Stream, Style};
use std::fmt::Display;
use supports_hyperlinks::Stream as LinkStream;
use terminal_link::Link;

/// Semantic styles for CLI output
pub trait Stylize: Display + Sized {
    /// Highlighted value (ids, URLs, usernames)
    fn accent(&self) -> String {
        self.if_supports_color(Stream::Stdout, |s| s.style(Style::new().cyan()))
            .to_string()
    }

    /// Bold heading text
    fn emphasis(&self) -> String {
        self.if_supports_color(Stream::Stdout, |s| s.style(Style::new().bold()))
            .to_string()
    }

    /// Secondary text
    fn muted(&self) -> String {
        self.if_supports_color(Stream::Stdout, |s| s.style(Style::new().dimmed()))
            .to_string()
    }

    /// Error text
    fn failure(&self) -> String {
        self.if_supports_color(Stream::Stderr, |s| s.style(Style::new().red()))
            .to_string()
    }
}

impl<T: Display> Stylize for T {}

/// Green check mark
pub fn check() -> String {
    "✓".if_supports_color(Stream::Stdout, |s| s.green()).to_string()
}

/// Red cross
pub fn cross() -> String {
    "✗".if_supports_color(Stream::Stderr, |s| s.red()).to_string()
}

/// Spinner used while a request is in flight
pub fn spinner_style() -> ProgressStyle {
    ProgressStyle::with_template("{spinner:.cyan} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", " "])
}

/// `url` as a clickable link when the terminal supports it
pub fn link(url: &str) -> String {
    if supports_hyperlinks::on(LinkStream::Stdout) {
        Link::new(&url.accent(), url).to_string()
    } else {
        url.accent()
    }
}
