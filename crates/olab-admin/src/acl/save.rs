//! Dispatching staged ACL changes and reporting per-row outcomes.

use futures::future::join_all;
use tracing::{info, warn};

use olab_client::AdminApi;
use olab_core::error::AppError;
use olab_core::types::AclId;
use olab_entity::acl::{AclRow, ChangeKind};

/// What happened to one staged row on save.
#[derive(Debug, Clone)]
pub enum RowOutcome {
    /// A local row was created; `row` carries the server-assigned id.
    Created {
        /// The synthetic id the row had locally.
        local_id: AclId,
        /// The row as stored by the backend.
        row: AclRow,
    },
    /// An edited row was updated.
    Updated {
        /// Row id.
        id: AclId,
    },
    /// A row was deleted on the backend.
    Deleted {
        /// Row id.
        id: AclId,
    },
    /// A local row was deleted before it was ever saved; no call was made.
    Discarded {
        /// The synthetic id.
        local_id: AclId,
    },
    /// The backend call failed; the row keeps its staged status.
    Failed {
        /// Row id.
        id: AclId,
        /// The call that was attempted.
        change: ChangeKind,
        /// Why it failed.
        error: AppError,
    },
}

impl RowOutcome {
    /// The local id of the row this outcome is about.
    pub fn row_id(&self) -> AclId {
        match self {
            Self::Created { local_id, .. } | Self::Discarded { local_id } => *local_id,
            Self::Updated { id } | Self::Deleted { id } | Self::Failed { id, .. } => *id,
        }
    }
}

/// Per-row results of one save.
#[derive(Debug, Clone, Default)]
pub struct SaveReport {
    outcomes: Vec<RowOutcome>,
}

impl SaveReport {
    /// Build a report from outcomes.
    pub fn new(outcomes: Vec<RowOutcome>) -> Self {
        Self { outcomes }
    }

    /// Every outcome, in table order.
    pub fn outcomes(&self) -> &[RowOutcome] {
        &self.outcomes
    }

    /// Whether the save had nothing to do.
    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    /// Outcomes that failed.
    pub fn failures(&self) -> impl Iterator<Item = &RowOutcome> {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, RowOutcome::Failed { .. }))
    }

    /// Whether any call failed.
    pub fn has_failures(&self) -> bool {
        self.failures().next().is_some()
    }

    fn count(&self, pred: impl Fn(&RowOutcome) -> bool) -> usize {
        self.outcomes.iter().filter(|o| pred(o)).count()
    }

    /// One-line summary for status messages.
    pub fn summary(&self) -> String {
        format!(
            "{} created, {} updated, {} deleted, {} failed",
            self.count(|o| matches!(o, RowOutcome::Created { .. })),
            self.count(|o| matches!(o, RowOutcome::Updated { .. })),
            self.count(|o| matches!(o, RowOutcome::Deleted { .. } | RowOutcome::Discarded { .. })),
            self.count(|o| matches!(o, RowOutcome::Failed { .. })),
        )
    }
}

/// Issue one backend call per staged row, all concurrently, and collect
/// each row's outcome. Failures are captured, never propagated.
pub async fn dispatch(
    api: &dyn AdminApi,
    token: &str,
    changes: Vec<(ChangeKind, AclRow)>,
) -> Vec<RowOutcome> {
    let calls = changes.into_iter().map(|(change, row)| async move {
        let result = match change {
            ChangeKind::Create => api
                .post_acl(token, &row)
                .await
                .map(|created| RowOutcome::Created {
                    local_id: row.id,
                    row: created,
                }),
            ChangeKind::Update => api
                .put_acl(token, &row)
                .await
                .map(|_| RowOutcome::Updated { id: row.id }),
            ChangeKind::Delete => api
                .delete_acl(token, &row)
                .await
                .map(|_| RowOutcome::Deleted { id: row.id }),
        };

        match result {
            Ok(outcome) => {
                info!(acl_id = %row.id, %change, "ACL saved");
                outcome
            }
            Err(error) => {
                warn!(acl_id = %row.id, %change, error = %error, "ACL save failed");
                RowOutcome::Failed {
                    id: row.id,
                    change,
                    error,
                }
            }
        }
    });

    join_all(calls).await
}
