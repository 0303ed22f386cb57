//! The ACL page: filter, staged table and reference data in one place.

use std::sync::Arc;

use tracing::{info, warn};

use olab_client::AdminApi;
use olab_core::result::AppResult;
use olab_core::types::AclId;
use olab_entity::acl::Permission;
use olab_entity::reference::{find_group, find_role, Group, Role};

use super::filter::{AclFilter, FilterState};
use super::save::{RowOutcome, SaveReport};
use super::table::AclTable;
use crate::alert::AlertQueue;
use crate::confirm::{Confirm, ConfirmDialog};

/// Drives the ACL page for one logged-in session.
pub struct AclEditor {
    api: Arc<dyn AdminApi>,
    token: String,
    table: AclTable,
    filter: AclFilter,
    groups: Vec<Group>,
    roles: Vec<Role>,
    alerts: AlertQueue,
    loading: bool,
}

impl std::fmt::Debug for AclEditor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AclEditor")
            .field("table", &self.table)
            .field("filter", &self.filter)
            .field("groups", &self.groups.len())
            .field("roles", &self.roles.len())
            .field("loading", &self.loading)
            .finish_non_exhaustive()
    }
}

impl AclEditor {
    /// Create an editor with an empty table.
    pub fn new(api: Arc<dyn AdminApi>, token: impl Into<String>) -> Self {
        Self {
            api,
            token: token.into(),
            table: AclTable::new(),
            filter: AclFilter::new(),
            groups: Vec::new(),
            roles: Vec::new(),
            alerts: AlertQueue::new(),
            loading: false,
        }
    }

    /// The staged table.
    pub fn table(&self) -> &AclTable {
        &self.table
    }

    /// The current filter.
    pub fn filter(&self) -> &AclFilter {
        &self.filter
    }

    /// Mutable access to the filter, for setting controls one by one.
    pub fn filter_mut(&mut self) -> &mut AclFilter {
        &mut self.filter
    }

    /// Known groups.
    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    /// Known roles.
    pub fn roles(&self) -> &[Role] {
        &self.roles
    }

    /// Pending status messages.
    pub fn alerts_mut(&mut self) -> &mut AlertQueue {
        &mut self.alerts
    }

    /// Whether a fetch is in flight.
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Fetch groups, then roles.
    pub async fn init(&mut self) -> AppResult<()> {
        self.loading = true;
        let result = self.fetch_reference().await;
        self.loading = false;

        if let Err(e) = &result {
            self.alerts.error(e);
        }
        result
    }

    async fn fetch_reference(&mut self) -> AppResult<()> {
        self.groups = self.api.get_groups(&self.token).await?;
        self.roles = self.api.get_roles(&self.token).await?;
        info!(
            groups = self.groups.len(),
            roles = self.roles.len(),
            "Loaded ACL reference data"
        );
        Ok(())
    }

    /// Replace the table with the rows matching the current filter.
    pub async fn load(&mut self) -> AppResult<()> {
        self.loading = true;
        let result = self.api.get_acls(&self.token, &self.filter.to_query()).await;
        self.loading = false;

        match result {
            Ok(rows) => {
                info!(rows = rows.len(), "Loaded ACL rows");
                self.table.load(rows);
                Ok(())
            }
            Err(e) => {
                self.alerts.error(&e);
                Err(e)
            }
        }
    }

    /// Apply a filter snapshot, reloading when it changed.
    pub async fn on_filter_change(&mut self, state: FilterState) -> AppResult<bool> {
        if !self.filter.on_state_change(state) {
            return Ok(false);
        }
        self.load().await?;
        Ok(true)
    }

    /// Append local rows for the selected objects using the chosen group
    /// and role (wildcards when unset).
    pub fn create_rows(&mut self) -> Vec<AclId> {
        let group = self
            .filter
            .group_id()
            .and_then(|id| find_group(&self.groups, id));
        let role = self
            .filter
            .role_id()
            .and_then(|id| find_role(&self.roles, id));
        self.table.create_rows(self.filter.selection(), group, role)
    }

    /// A grid cell click.
    pub fn cell_clicked(&mut self, id: AclId, column: &str) -> AppResult<bool> {
        self.table.cell_clicked(id, column)
    }

    /// Set one permission on a row.
    pub fn set_permission(
        &mut self,
        id: AclId,
        permission: Permission,
        value: bool,
    ) -> AppResult<()> {
        self.table.set_permission(id, permission, value)
    }

    /// Select rows; see [`AclTable::select`].
    pub fn select(&mut self, ids: impl IntoIterator<Item = AclId>) -> usize {
        self.table.select(ids)
    }

    /// Toggle deletion on the selected rows.
    pub fn mark_selected_deleted(&mut self) {
        self.table.mark_selected_deleted();
    }

    /// Toggle deletion on the given rows.
    pub fn mark_deleted(&mut self, ids: &[AclId]) {
        self.table.mark_deleted(ids);
    }

    /// Ask for confirmation, then send every staged change and reconcile.
    ///
    /// Returns `None` when the operator declines. Per-row failures are
    /// queued as alerts and left staged.
    pub async fn save(&mut self, confirm: &dyn Confirm) -> AppResult<Option<SaveReport>> {
        if !confirm.confirm(&ConfirmDialog::new("Save ACL Changes?"))? {
            return Ok(None);
        }

        let report = self.table.save(self.api.as_ref(), &self.token).await;
        self.table.apply_save_report(&report);

        for outcome in report.failures() {
            if let RowOutcome::Failed { id, change, error } = outcome {
                warn!(acl_id = %id, %change, "ACL change left staged");
                self.alerts.error(error);
            }
        }
        if !report.is_empty() {
            self.alerts.info(format!("ACLs saved: {}", report.summary()));
        }

        Ok(Some(report))
    }

    /// Ask for confirmation, then empty the table. Returns whether it was
    /// cleared.
    pub fn clear(&mut self, confirm: &dyn Confirm) -> AppResult<bool> {
        if !confirm.confirm(&ConfirmDialog::new("Clear ACL Table?"))? {
            return Ok(false);
        }
        self.table.clear();
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alert::Severity;
    use crate::confirm::AutoConfirm;
    use olab_client::{ApiCall, MemoryAdminApi};
    use olab_core::types::{GroupId, MapId, NodeId, RoleId};
    use olab_entity::acl::{AclRow, ObjectType, RowStatus};

    fn row(id: i64, group: i64) -> AclRow {
        AclRow {
            id: AclId(id),
            object_type: ObjectType::Maps,
            object_index: 5,
            group_id: Some(GroupId(group)),
            role_id: Some(RoleId(1)),
            group_name: format!("g{group}"),
            role_name: "r1".into(),
            read: false,
            write: false,
            execute: false,
            status: RowStatus::Unchanged,
        }
    }

    async fn editor() -> (MemoryAdminApi, AclEditor) {
        let api = MemoryAdminApi::new();
        api.set_groups(vec![Group {
            id: GroupId(2),
            name: "authors".into(),
        }])
        .await;
        api.set_roles(vec![Role {
            id: RoleId(7),
            name: "editor".into(),
        }])
        .await;
        api.set_acls(vec![row(1, 2), row(2, 3)]).await;

        let editor = AclEditor::new(Arc::new(api.clone()), MemoryAdminApi::TOKEN);
        (api, editor)
    }

    #[tokio::test]
    async fn test_init_fetches_groups_then_roles() {
        let (api, mut editor) = editor().await;
        editor.init().await.unwrap();
        assert_eq!(api.calls().await, vec![ApiCall::GetGroups, ApiCall::GetRoles]);
        assert_eq!(editor.groups()[0].name, "authors");
        assert!(!editor.is_loading());
    }

    #[tokio::test]
    async fn test_filter_change_reloads() {
        let (api, mut editor) = editor().await;
        let state = FilterState {
            group_id: Some(GroupId(2)),
            ..Default::default()
        };

        assert!(editor.on_filter_change(state.clone()).await.unwrap());
        assert_eq!(editor.table().len(), 1);
        assert!(!editor.on_filter_change(state).await.unwrap());
        assert_eq!(api.calls().await.len(), 1);
    }

    #[tokio::test]
    async fn test_create_rows_uses_chosen_group_and_role() {
        let (_api, mut editor) = editor().await;
        editor.init().await.unwrap();
        editor.filter_mut().set_group(Some(GroupId(2)));
        editor.filter_mut().set_role(Some(RoleId(7)));
        editor.filter_mut().select_maps([MapId(3)]);
        editor.filter_mut().select_nodes([NodeId(8), NodeId(9)]);

        let ids = editor.create_rows();
        assert_eq!(ids, vec![AclId(-1), AclId(-2)]);
        let created = editor.table().row(AclId(-2)).unwrap();
        assert_eq!(created.group_name, "authors");
        assert_eq!(created.role_name, "editor");
        assert_eq!(created.object_index, 9);
    }

    #[tokio::test]
    async fn test_save_declined_makes_no_calls() {
        let (api, mut editor) = editor().await;
        editor.load().await.unwrap();
        editor.cell_clicked(AclId(1), "execute").unwrap();
        api.clear_calls().await;

        assert!(editor.save(&AutoConfirm(false)).await.unwrap().is_none());
        assert!(api.calls().await.is_empty());
        assert!(editor.table().has_pending_changes());
    }

    #[tokio::test]
    async fn test_save_surfaces_failures_as_alerts() {
        let (api, mut editor) = editor().await;
        editor.load().await.unwrap();
        api.fail_acl(AclId(2)).await;

        editor.cell_clicked(AclId(1), "read").unwrap();
        editor.cell_clicked(AclId(2), "read").unwrap();
        let report = editor.save(&AutoConfirm(true)).await.unwrap().unwrap();
        assert!(report.has_failures());

        assert_eq!(editor.table().row(AclId(1)).unwrap().status, RowStatus::Unchanged);
        assert_eq!(editor.table().row(AclId(2)).unwrap().status, RowStatus::Edited);

        let alerts = editor.alerts_mut().drain();
        assert_eq!(alerts[0].severity, Severity::Error);
        assert!(alerts[0].message.contains("ACL 2"));
        assert_eq!(alerts[1].message, "ACLs saved: 0 created, 1 updated, 0 deleted, 1 failed");
    }

    #[tokio::test]
    async fn test_load_failure_is_alerted() {
        let (api, mut editor) = editor().await;
        api.set_offline(true).await;
        assert!(editor.load().await.is_err());
        assert_eq!(editor.alerts_mut().current().unwrap().severity, Severity::Error);
    }

    #[tokio::test]
    async fn test_clear_requires_confirmation() {
        let (_api, mut editor) = editor().await;
        editor.load().await.unwrap();

        assert!(!editor.clear(&AutoConfirm(false)).unwrap());
        assert_eq!(editor.table().len(), 2);
        assert!(editor.clear(&AutoConfirm(true)).unwrap());
        assert!(editor.table().is_empty());
    }
}
