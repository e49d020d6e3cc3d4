/*!
 * User confirmation before destructive operations
 */

use dialoguer::theme::ColorfulTheme;

use crate::error::{Result, ResultExt};

/// Trait for asking the user a yes/no question
pub trait Confirm {
    /// Ask `message`; `false` means the user declined
    fn confirm(&self, message: &str) -> Result<bool>;
}

/// Interactive prompt on the terminal
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalPrompt;

impl Confirm for TerminalPrompt {
    fn confirm(&self, message: &str) -> Result<bool> {
        dialoguer::Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(message)
            .default(false)
            .interact()
            .with_context(|| "confirmation prompt failed")
    }
}

/// Fixed answer, for non-interactive use
#[derive(Debug, Clone, Copy)]
pub struct AutoAnswer(pub bool);

impl Confirm for AutoAnswer {
    fn confirm(&self, _message: &str) -> Result<bool> {
        Ok(self.0)
    }
}
