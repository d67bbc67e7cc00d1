//! Interactive confirmation before sending

use eyre::{Context, Result};
use rustyline::DefaultEditor;
use rustyline::config::{Behavior, Config};
use rustyline::error::ReadlineError;
use tracing::debug;

/// Asks the operator a yes/no question
pub trait Confirm {
    fn confirm(&self, prompt: &str) -> Result<bool>;
}

/// Prompts on the controlling terminal
///
/// Stdin carries the service log, so the answer is read from the terminal
/// directly rather than from stdin.
pub struct TerminalConfirm;

impl Confirm for TerminalConfirm {
    fn confirm(&self, prompt: &str) -> Result<bool> {
        debug!(%prompt, "TerminalConfirm::confirm: called");
        let config = Config::builder().behavior(Behavior::PreferTerm).auto_add_history(false).build();
        let mut editor = DefaultEditor::with_config(config).context("Failed to open terminal for confirmation")?;

        match editor.readline(&format!("{} [y/N] ", prompt)) {
            Ok(line) => Ok(is_affirmative(&line)),
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
                debug!("TerminalConfirm::confirm: interrupted");
                Ok(false)
            }
            Err(e) => Err(e).context("Failed to read confirmation (use --yes for non-interactive use)"),
        }
    }
}

/// Answers yes without asking (`--yes`)
pub struct AssumeYes;

impl Confirm for AssumeYes {
    fn confirm(&self, prompt: &str) -> Result<bool> {
        debug!(%prompt, "AssumeYes::confirm: called");
        Ok(true)
    }
}

/// Prompt shown before a batch is sent
pub fn confirmation_prompt(target_count: usize) -> String {
    format!("Send this service log to {} cluster(s)?", target_count)
}

fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes" | "send")
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_affirmative() {
        assert!(is_affirmative("y"));
        assert!(is_affirmative("YES\n"));
        assert!(is_affirmative(" Send "));
        assert!(!is_affirmative(""));
        assert!(!is_affirmative("n"));
        assert!(!is_affirmative("yep"));
    }

    #[test]
    fn test_confirmation_prompt() {
        assert_eq!(confirmation_prompt(3), "Send this service log to 3 cluster(s)?");
    }

    #[test]
    fn test_assume_yes() {
        assert!(AssumeYes.confirm("anything").unwrap());
    }
}
