//! Status messages shown to the operator.

use std::collections::VecDeque;

use olab_core::error::AppError;

/// How an alert should be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Informational outcome.
    Info,
    /// Something failed.
    Error,
}

/// A single status message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    /// Presentation.
    pub severity: Severity,
    /// Text shown to the operator.
    pub message: String,
}

/// FIFO of pending alerts. The oldest one is the one currently shown.
#[derive(Debug, Default)]
pub struct AlertQueue {
    pending: VecDeque<Alert>,
}

impl AlertQueue {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an informational message.
    pub fn info(&mut self, message: impl Into<String>) {
        self.pending.push_back(Alert {
            severity: Severity::Info,
            message: message.into(),
        });
    }

    /// Queue an error message.
    pub fn error(&mut self, error: &AppError) {
        self.pending.push_back(Alert {
            severity: Severity::Error,
            message: error.to_string(),
        });
    }

    /// The alert currently shown.
    pub fn current(&self) -> Option<&Alert> {
        self.pending.front()
    }

    /// Close the current alert.
    pub fn dismiss(&mut self) -> Option<Alert> {
        self.pending.pop_front()
    }

    /// Take every pending alert.
    pub fn drain(&mut self) -> Vec<Alert> {
        self.pending.drain(..).collect()
    }

    /// Whether nothing is pending.
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fifo_and_dismiss() {
        let mut alerts = AlertQueue::new();
        alerts.info("first");
        alerts.error(&AppError::network("down"));

        assert_eq!(alerts.current().unwrap().message, "first");
        alerts.dismiss();
        let current = alerts.current().unwrap();
        assert_eq!(current.severity, Severity::Error);
        assert_eq!(current.message, "NETWORK: down");

        assert_eq!(alerts.drain().len(), 1);
        assert!(alerts.is_empty());
    }
}
