//! Interactive prompts
//!
//! Reconcilers ask for a [`Resolution`] through the [`Prompt`] trait; the
//! terminal implementation uses an `inquire` select list. Tests substitute a
//! scripted prompt.

use inquire::Select;

use crate::error::Result;
use crate::sync::Resolution;

pub trait Prompt {
    /// Ask the operator to pick one of `choices`
    fn choose(&self, message: &str, choices: &[Resolution]) -> Result<Resolution>;
}

/// Terminal prompt backed by `inquire`
#[derive(Debug, Default, Clone, Copy)]
pub struct InquirePrompt;

impl Prompt for InquirePrompt {
    fn choose(&self, message: &str, choices: &[Resolution]) -> Result<Resolution> {
        let answer = Select::new(message, choices.to_vec())
            .with_help_message("↑↓ to move, enter to select")
            .prompt()?;
        Ok(answer)
    }
}
