//! Confirmation prompts for destructive actions.

#[cfg(test)]
use mockall::automock;

/// A yes/no question put to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub title: String,
    pub message: String,
    /// Irreversible actions get stronger wording in the UI.
    pub destructive: bool,
}

impl Prompt {
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            destructive: false,
        }
    }

    pub fn destructive(mut self) -> Self {
        self.destructive = true;
        self
    }
}

/// Asks the user to confirm an action.
#[cfg_attr(test, automock)]
pub trait Confirm: Send + Sync {
    fn confirm(&self, prompt: &Prompt) -> bool;
}

/// Answers every prompt the same way (`--yes` on the command line, tests).
#[derive(Debug, Clone, Copy)]
pub struct AutoConfirm(pub bool);

impl Confirm for AutoConfirm {
    fn confirm(&self, _prompt: &Prompt) -> bool {
        self.0
    }
}
