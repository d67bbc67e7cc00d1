//! Terminal spinner backed by indicatif

use indicatif::{ProgressBar, ProgressStyle};
use tracing::debug;

use super::ProgressIndicator;

const TICK_CHARS: &str = "⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ ";

/// Spinner drawn on stderr while results print to stdout
pub struct Spinner {
    bar: ProgressBar,
}

impl Spinner {
    /// Create a spinner showing `title`
    pub fn new(title: &str) -> Self {
        debug!(%title, "Spinner::new: called");
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg} [{elapsed}]")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_chars(TICK_CHARS),
        );
        bar.set_message(title.to_string());
        Self { bar }
    }

    /// A spinner that never draws (non-interactive output)
    pub fn hidden() -> Self {
        debug!("Spinner::hidden: called");
        Self {
            bar: ProgressBar::hidden(),
        }
    }
}

impl ProgressIndicator for Spinner {
    fn tick(&self) {
        self.bar.tick();
    }

    fn println(&self, line: &str) {
        self.bar.suspend(|| println!("{}", line));
    }

    fn finish(&self) {
        self.bar.finish_and_clear();
    }
}
