// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! User prompts.
//!
//! Some operations need the user to make a call, e.g., whether a restore
//! should carry on after an install failed. Prompts go through the
//! [`Prompter`] trait so they can be answered ahead of time with `--yes`.

use inquire::Confirm;
use tracing::{debug, instrument};

/// Ask the user yes or no questions.
pub trait Prompter {
    /// Ask for confirmation.
    ///
    /// # Errors
    ///
    /// - Return [`PromptError`] if the user cannot be asked, or cancels.
    fn confirm(&self, message: &str, default: bool) -> Result<bool>;
}

/// Prompter that asks through the terminal.
#[derive(Debug, Clone, Copy, Default)]
pub struct InquirePrompter;

impl InquirePrompter {
    /// Construct new terminal prompter.
    pub fn new() -> Self {
        Self
    }
}

impl Prompter for InquirePrompter {
    #[instrument(skip(self), level = "debug")]
    fn confirm(&self, message: &str, default: bool) -> Result<bool> {
        let answer = Confirm::new(message).with_default(default).prompt()?;
        Ok(answer)
    }
}

/// Prompter that always gives the same answer without asking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedPrompter(pub bool);

impl Prompter for FixedPrompter {
    fn confirm(&self, message: &str, _default: bool) -> Result<bool> {
        debug!("answer {} to {message:?}", if self.0 { "yes" } else { "no" });
        Ok(self.0)
    }
}

/// Prompt error types.
#[derive(Debug, thiserror::Error)]
pub enum PromptError {
    /// Prompt fails or is canceled by the user.
    #[error(transparent)]
    Inquire(#[from] inquire::InquireError),
}

/// Friendly result alias :3
pub type Result<T, E = PromptError> = std::result::Result<T, E>;
