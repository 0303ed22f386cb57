//! Local staging markers for ACL rows.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Local-only marker distinguishing modified or deleted rows from
/// persisted state. A row that was never saved is recognised by its
/// synthetic id, not by its status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RowStatus {
    /// Matches the server copy.
    #[default]
    Unchanged,
    /// A permission flag was modified.
    Edited,
    /// Marked for deletion.
    Deleted,
}

impl RowStatus {
    /// Return the status as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unchanged => "unchanged",
            Self::Edited => "edited",
            Self::Deleted => "deleted",
        }
    }
}

impl fmt::Display for RowStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The backend call a staged row requires on save.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    /// `POST` a new row.
    Create,
    /// `PUT` an edited row.
    Update,
    /// `DELETE` a row.
    Delete,
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Create => write!(f, "create"),
            Self::Update => write!(f, "update"),
            Self::Delete => write!(f, "delete"),
        }
    }
}
