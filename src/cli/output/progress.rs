//! Spinner helpers for long-running commands.

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::time::Duration;

const SPINNER_TEMPLATE: &str = "[{elapsed_precise}] {spinner:.green} {msg}";
const SPINNER_CHARS: &str = "⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏";

/// Create a spinner for an operation of unknown length.
///
/// In JSON mode the spinner is hidden so stdout and stderr stay clean for
/// machine consumers.
pub fn create_spinner(message: impl Into<String>, json_mode: bool) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if json_mode {
        spinner.set_draw_target(ProgressDrawTarget::hidden());
    }
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template(SPINNER_TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars(SPINNER_CHARS),
    );
    spinner.set_message(message.into());
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner
}

/// Extension trait for finishing spinners with a status marker
pub trait ProgressBarExt {
    fn finish_success(&self, message: impl Into<String>);

    fn finish_warning(&self, message: impl Into<String>);
}

impl ProgressBarExt for ProgressBar {
    fn finish_success(&self, message: impl Into<String>) {
        self.finish_with_message(format!("✓ {}", message.into()));
    }

    fn finish_warning(&self, message: impl Into<String>) {
        self.finish_with_message(format!("! {}", message.into()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hidden_spinner_in_json_mode() {
        let spinner = create_spinner("Ranking services", true);
        assert!(spinner.is_hidden());
        assert_eq!(spinner.message(), "Ranking services");
        spinner.finish_success("done");
        assert!(spinner.is_finished());
    }

    #[test]
    fn test_finish_warning_marks_message() {
        let spinner = create_spinner("Ranking services", true);
        spinner.finish_warning("fallback used");
        assert_eq!(spinner.message(), "! fallback used");
    }
}
