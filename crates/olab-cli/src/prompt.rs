//! Terminal prompts.

use olab_admin::{Confirm, ConfirmDialog};
use olab_core::error::AppError;
use olab_core::result::AppResult;

/// Asks confirmation questions on the terminal. Defaults to "no".
#[derive(Debug, Clone, Copy, Default)]
pub struct DialoguerConfirm;

impl Confirm for DialoguerConfirm {
    fn confirm(&self, dialog: &ConfirmDialog) -> AppResult<bool> {
        dialoguer::Confirm::new()
            .with_prompt(format!("{}: {}", dialog.title, dialog.message))
            .default(false)
            .interact()
            .map_err(|e| AppError::internal(format!("Input error: {}", e)))
    }
}

/// Pick the confirmation strategy for a command's `--force` flag.
pub fn confirmer(force: bool) -> Box<dyn Confirm> {
    if force {
        Box::new(olab_admin::confirm::AutoConfirm(true))
    } else {
        Box::new(DialoguerConfirm)
    }
}

/// Read a line of text.
pub fn input(prompt: &str) -> AppResult<String> {
    dialoguer::Input::<String>::new()
        .with_prompt(prompt)
        .allow_empty(true)
        .interact_text()
        .map_err(|e| AppError::internal(format!("Input error: {}", e)))
}

/// Read a password without echo.
pub fn password(prompt: &str) -> AppResult<String> {
    dialoguer::Password::new()
        .with_prompt(prompt)
        .interact()
        .map_err(|e| AppError::internal(format!("Input error: {}", e)))
}

/// Read a password that may be left empty.
pub fn optional_password(prompt: &str) -> AppResult<String> {
    dialoguer::Password::new()
        .with_prompt(prompt)
        .allow_empty_password(true)
        .interact()
        .map_err(|e| AppError::internal(format!("Input error: {}", e)))
}

/// Pick one entry from a menu; returns its index.
pub fn select<T: std::fmt::Display>(prompt: &str, items: &[T]) -> AppResult<usize> {
    dialoguer::Select::new()
        .with_prompt(prompt)
        .items(items)
        .default(0)
        .interact()
        .map_err(|e| AppError::internal(format!("Input error: {}", e)))
}
