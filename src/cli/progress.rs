//! Spinner-driven state observer

use crate::cli::style::spinner_style;
use indicatif::ProgressBar;
use std::time::Duration;
use tofu_forms::StateObserver;
use tofu_forms::types::RequestState;

/// Shows a spinner while a submission is loading
///
/// Cleared on the terminal state; the command prints the outcome itself.
pub struct CliProgress {
    spinner: ProgressBar,
    message: String,
}

impl CliProgress {
    /// Progress with the given loading message
    pub fn new(message: impl Into<String>) -> Self {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(spinner_style());
        Self {
            spinner,
            message: message.into(),
        }
    }
}

impl<D> StateObserver<D> for CliProgress {
    fn on_state(&self, state: &RequestState<D>) {
        match state {
            RequestState::Idle => {}
            RequestState::Loading { .. } => {
                self.spinner.set_message(self.message.clone());
                self.spinner.enable_steady_tick(Duration::from_millis(80));
            }
            RequestState::Success { .. } | RequestState::Error { .. } => {
                self.spinner.finish_and_clear();
            }
        }
    }
}
