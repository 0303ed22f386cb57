//! Confirmation prompts for destructive actions.

use olab_core::result::AppResult;

/// A yes/no question put to the operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmDialog {
    /// Dialog title.
    pub title: String,
    /// Question text.
    pub message: String,
}

impl ConfirmDialog {
    /// Create a dialog titled "Confirmation".
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            title: "Confirmation".to_string(),
            message: message.into(),
        }
    }
}

/// Answers confirmation dialogs.
pub trait Confirm {
    /// Return `true` when the operator accepts.
    fn confirm(&self, dialog: &ConfirmDialog) -> AppResult<bool>;
}

/// Always gives the same answer. Used for `--force` and in tests.
#[derive(Debug, Clone, Copy)]
pub struct AutoConfirm(pub bool);

impl Confirm for AutoConfirm {
    fn confirm(&self, _dialog: &ConfirmDialog) -> AppResult<bool> {
        Ok(self.0)
    }
}
