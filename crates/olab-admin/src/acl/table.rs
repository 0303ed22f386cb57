//! The staged ACL table.
//!
//! Rows loaded from the backend start `Unchanged`. Local edits move them to
//! `Edited` or `Deleted`; rows created locally get decrementing negative ids
//! and are only ever sent as creates. Nothing reaches the backend until
//! [`AclTable::save`], and the resulting [`SaveReport`] is folded back in by
//! [`AclTable::apply_save_report`].

use tracing::{debug, info};

use olab_client::AdminApi;
use olab_core::error::AppError;
use olab_core::result::AppResult;
use olab_core::types::{AclId, GroupId, RoleId, Selection};
use olab_entity::acl::model::WILDCARD_NAME;
use olab_entity::acl::{AclRow, ChangeKind, ObjectType, Permission, RowStatus};
use olab_entity::reference::{Group, Role};

use super::filter::{ObjectSelection, Targets};
use super::save::{self, RowOutcome, SaveReport};

/// In-memory ACL rows with staged changes.
#[derive(Debug, Clone)]
pub struct AclTable {
    rows: Vec<AclRow>,
    selection: Selection<AclId>,
    next_index: i64,
}

impl Default for AclTable {
    fn default() -> Self {
        Self::new()
    }
}

impl AclTable {
    /// Create an empty table. The first local row gets id `-1`.
    pub fn new() -> Self {
        Self {
            rows: Vec::new(),
            selection: Selection::new(),
            next_index: -1,
        }
    }

    /// Rows in display order.
    pub fn rows(&self) -> &[AclRow] {
        &self.rows
    }

    /// Look up a row.
    pub fn row(&self, id: AclId) -> Option<&AclRow> {
        self.rows.iter().find(|r| r.id == id)
    }

    fn row_mut(&mut self, id: AclId) -> AppResult<&mut AclRow> {
        self.rows
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| AppError::not_found(format!("ACL row {id} is not in the table")))
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Replace the table with freshly fetched rows, dropping every staged
    /// change (including unsaved local rows) and the selection.
    pub fn load(&mut self, rows: Vec<AclRow>) {
        self.rows = rows
            .into_iter()
            .map(|mut row| {
                row.status = RowStatus::Unchanged;
                row
            })
            .collect();
        self.selection.clear();
        debug!(rows = self.rows.len(), "ACL table loaded");
    }

    /// Empty the table.
    pub fn clear(&mut self) {
        self.rows.clear();
        self.selection.clear();
    }

    /// Mark a row edited. Local rows and rows staged for deletion keep
    /// their state.
    pub fn mark_changed(&mut self, id: AclId) -> AppResult<()> {
        let row = self.row_mut(id)?;
        if !row.is_pending_create() && !row.is_pending_delete() {
            row.status = RowStatus::Edited;
        }
        Ok(())
    }

    /// Set one permission flag on a row and mark it edited.
    pub fn set_permission(
        &mut self,
        id: AclId,
        permission: Permission,
        value: bool,
    ) -> AppResult<()> {
        self.row_mut(id)?.set_permission(permission, value);
        self.mark_changed(id)
    }

    /// A click on a grid cell. Clicking a permission column flips that flag
    /// and marks the row edited; other columns are ignored. Returns whether
    /// the row was touched.
    pub fn cell_clicked(&mut self, id: AclId, column: &str) -> AppResult<bool> {
        let Some(permission) = Permission::from_column(column) else {
            return Ok(false);
        };
        let current = self
            .row(id)
            .ok_or_else(|| AppError::not_found(format!("ACL row {id} is not in the table")))?
            .permission(permission);
        self.set_permission(id, permission, !current)?;
        Ok(true)
    }

    /// Replace the row selection. Unknown rows and rows lacking a group or
    /// role are not selectable and are dropped. Returns the selection size.
    pub fn select(&mut self, ids: impl IntoIterator<Item = AclId>) -> usize {
        let selectable: Vec<AclId> = ids
            .into_iter()
            .filter(|id| self.row(*id).is_some_and(AclRow::is_selectable))
            .collect();
        self.selection.set(selectable);
        self.selection.len()
    }

    /// Currently selected rows.
    pub fn selection(&self) -> &Selection<AclId> {
        &self.selection
    }

    /// Toggle deletion on the given rows: a row already staged for deletion
    /// returns to `Unchanged`, any other row becomes `Deleted`. Clears the
    /// selection afterwards.
    pub fn mark_deleted(&mut self, ids: &[AclId]) {
        for row in self.rows.iter_mut().filter(|r| ids.contains(&r.id)) {
            row.status = match row.status {
                RowStatus::Deleted => RowStatus::Unchanged,
                _ => RowStatus::Deleted,
            };
        }
        self.selection.clear();
    }

    /// Toggle deletion on the selected rows.
    pub fn mark_selected_deleted(&mut self) {
        let ids = self.selection.to_vec();
        self.mark_deleted(&ids);
    }

    /// Append one local row per selected node, or per selected map when no
    /// node is selected. Without a group or role the wildcard `*` is used.
    /// Returns the ids of the new rows.
    pub fn create_rows(
        &mut self,
        selection: &ObjectSelection,
        group: Option<&Group>,
        role: Option<&Role>,
    ) -> Vec<AclId> {
        let objects: Vec<(ObjectType, i64)> = match selection.targets() {
            Targets::Nodes(ids) => ids.iter().map(|n| (ObjectType::Nodes, n.get())).collect(),
            Targets::Maps(ids) => ids.iter().map(|m| (ObjectType::Maps, m.get())).collect(),
            Targets::None => Vec::new(),
        };

        let mut created = Vec::with_capacity(objects.len());
        for (object_type, object_index) in objects {
            let id = AclId(self.next_index);
            self.next_index -= 1;

            self.rows.push(AclRow {
                id,
                object_type,
                object_index,
                group_id: Some(group.map_or(GroupId::WILDCARD, |g| g.id)),
                role_id: Some(role.map_or(RoleId::WILDCARD, |r| r.id)),
                group_name: group.map_or_else(|| WILDCARD_NAME.to_string(), |g| g.name.clone()),
                role_name: role.map_or_else(|| WILDCARD_NAME.to_string(), |r| r.name.clone()),
                read: false,
                write: false,
                execute: false,
                status: RowStatus::Unchanged,
            });
            created.push(id);
        }

        info!(count = created.len(), "Created local ACL rows");
        created
    }

    /// Backend calls a save would make, in table order.
    pub fn pending_changes(&self) -> Vec<(ChangeKind, AclRow)> {
        self.rows
            .iter()
            .filter_map(|r| r.pending_change().map(|c| (c, r.clone())))
            .collect()
    }

    /// Whether anything is staged.
    pub fn has_pending_changes(&self) -> bool {
        self.rows
            .iter()
            .any(|r| r.pending_change().is_some() || r.is_pending_delete())
    }

    /// Send every staged change and report what happened to each row.
    ///
    /// The table itself is not modified; pass the report to
    /// [`AclTable::apply_save_report`] to reconcile.
    pub async fn save(&self, api: &dyn AdminApi, token: &str) -> SaveReport {
        let mut outcomes = save::dispatch(api, token, self.pending_changes()).await;

        outcomes.extend(
            self.rows
                .iter()
                .filter(|r| r.is_pending_create() && r.is_pending_delete())
                .map(|r| RowOutcome::Discarded { local_id: r.id }),
        );

        SaveReport::new(outcomes)
    }

    /// Fold a save report back into the table: created rows take their
    /// server id, updated rows return to `Unchanged`, deleted and discarded
    /// rows disappear, failed rows keep their staged status.
    pub fn apply_save_report(&mut self, report: &SaveReport) {
        for outcome in report.outcomes() {
            match outcome {
                RowOutcome::Created { local_id, row } => {
                    if let Some(slot) = self.rows.iter_mut().find(|r| r.id == *local_id) {
                        *slot = AclRow {
                            status: RowStatus::Unchanged,
                            ..row.clone()
                        };
                    }
                }
                RowOutcome::Updated { id } => {
                    if let Some(slot) = self.rows.iter_mut().find(|r| r.id == *id) {
                        slot.status = RowStatus::Unchanged;
                    }
                }
                RowOutcome::Deleted { id } => self.rows.retain(|r| r.id != *id),
                RowOutcome::Discarded { local_id } => self.rows.retain(|r| r.id != *local_id),
                RowOutcome::Failed { .. } => {}
            }
        }
        self.selection.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use olab_client::{ApiCall, MemoryAdminApi};
    use olab_core::types::{MapId, NodeId};

    const TOKEN: &str = MemoryAdminApi::TOKEN;

    fn server_row(id: i64) -> AclRow {
        AclRow {
            id: AclId(id),
            object_type: ObjectType::Maps,
            object_index: 100 + id,
            group_id: Some(GroupId(1)),
            role_id: Some(RoleId(1)),
            group_name: "learners".into(),
            role_name: "learner".into(),
            read: true,
            write: false,
            execute: false,
            status: RowStatus::Unchanged,
        }
    }

    fn nodes(ids: &[i64]) -> ObjectSelection {
        let mut sel = ObjectSelection::default();
        sel.nodes.set(ids.iter().map(|i| NodeId(*i)));
        sel
    }

    #[test]
    fn test_mark_changed_rules() {
        let mut table = AclTable::new();
        table.load(vec![server_row(1), server_row(2)]);
        table.create_rows(&nodes(&[5]), None, None);

        table.mark_changed(AclId(1)).unwrap();
        assert_eq!(table.row(AclId(1)).unwrap().status, RowStatus::Edited);

        table.mark_changed(AclId(-1)).unwrap();
        assert_eq!(table.row(AclId(-1)).unwrap().status, RowStatus::Unchanged);

        table.mark_deleted(&[AclId(2)]);
        table.mark_changed(AclId(2)).unwrap();
        assert_eq!(table.row(AclId(2)).unwrap().status, RowStatus::Deleted);

        assert!(table.mark_changed(AclId(99)).is_err());
    }

    #[test]
    fn test_mark_deleted_toggles() {
        let mut table = AclTable::new();
        table.load(vec![server_row(1), server_row(2)]);
        table.mark_changed(AclId(2)).unwrap();

        table.mark_deleted(&[AclId(1), AclId(2)]);
        assert_eq!(table.row(AclId(1)).unwrap().status, RowStatus::Deleted);
        assert_eq!(table.row(AclId(2)).unwrap().status, RowStatus::Deleted);

        table.mark_deleted(&[AclId(1), AclId(2)]);
        assert_eq!(table.row(AclId(1)).unwrap().status, RowStatus::Unchanged);
        assert_eq!(table.row(AclId(2)).unwrap().status, RowStatus::Unchanged);
    }

    #[test]
    fn test_create_rows_for_nodes_with_wildcards() {
        let mut table = AclTable::new();
        let ids = table.create_rows(&nodes(&[10, 11, 12]), None, None);

        assert_eq!(ids, vec![AclId(-1), AclId(-2), AclId(-3)]);
        for row in table.rows() {
            assert_eq!(row.object_type, ObjectType::Nodes);
            assert_eq!(row.group_name, "*");
            assert_eq!(row.role_name, "*");
            assert_eq!(row.group_id, Some(GroupId::WILDCARD));
            assert_eq!(row.permission_string(), "---");
        }

        let next = table.create_rows(&nodes(&[13]), None, None);
        assert_eq!(next, vec![AclId(-4)]);
    }

    #[test]
    fn test_create_rows_ignores_maps_when_nodes_selected() {
        let mut sel = nodes(&[7]);
        sel.maps.set([MapId(1), MapId(2)]);
        let group = Group {
            id: GroupId(3),
            name: "authors".into(),
        };

        let mut table = AclTable::new();
        table.create_rows(&sel, Some(&group), None);
        assert_eq!(table.len(), 1);
        let row = &table.rows()[0];
        assert_eq!(row.object_type, ObjectType::Nodes);
        assert_eq!(row.object_index, 7);
        assert_eq!(row.group_name, "authors");
        assert_eq!(row.role_name, "*");

        let mut maps_only = ObjectSelection::default();
        maps_only.maps.set([MapId(1), MapId(2)]);
        table.create_rows(&maps_only, None, None);
        assert_eq!(table.len(), 3);
        assert_eq!(table.rows()[2].object_type, ObjectType::Maps);
    }

    #[test]
    fn test_load_clears_pending_state() {
        let mut table = AclTable::new();
        table.load(vec![server_row(1)]);
        table.mark_changed(AclId(1)).unwrap();
        table.create_rows(&nodes(&[3]), None, None);
        assert!(table.has_pending_changes());

        table.load(vec![server_row(1)]);
        assert!(!table.has_pending_changes());
        assert_eq!(table.len(), 1);
        assert_eq!(table.row(AclId(1)).unwrap().status, RowStatus::Unchanged);
    }

    #[test]
    fn test_cell_click_only_on_permission_columns() {
        let mut table = AclTable::new();
        table.load(vec![server_row(1)]);

        assert!(!table.cell_clicked(AclId(1), "groupName").unwrap());
        assert_eq!(table.row(AclId(1)).unwrap().status, RowStatus::Unchanged);

        assert!(table.cell_clicked(AclId(1), "write").unwrap());
        let row = table.row(AclId(1)).unwrap();
        assert!(row.write);
        assert_eq!(row.status, RowStatus::Edited);
    }

    #[test]
    fn test_select_drops_unselectable_rows() {
        let mut orphan = server_row(2);
        orphan.role_id = None;

        let mut table = AclTable::new();
        table.load(vec![server_row(1), orphan]);
        assert_eq!(table.select([AclId(1), AclId(2), AclId(9)]), 1);

        table.mark_selected_deleted();
        assert_eq!(table.row(AclId(1)).unwrap().status, RowStatus::Deleted);
        assert_eq!(table.row(AclId(2)).unwrap().status, RowStatus::Unchanged);
        assert!(table.selection().is_empty());
    }

    #[tokio::test]
    async fn test_cell_click_then_save_issues_one_update() {
        let api = MemoryAdminApi::new();
        api.set_acls(vec![server_row(1)]).await;

        let mut table = AclTable::new();
        table.load(vec![server_row(1)]);
        table.cell_clicked(AclId(1), "read").unwrap();
        assert_eq!(table.row(AclId(1)).unwrap().status, RowStatus::Edited);

        let report = table.save(&api, TOKEN).await;
        assert_eq!(api.calls().await, vec![ApiCall::PutAcl(AclId(1))]);
        assert!(!report.has_failures());

        table.apply_save_report(&report);
        assert_eq!(table.row(AclId(1)).unwrap().status, RowStatus::Unchanged);
        assert!(!api.acls().await[0].read);
    }

    #[tokio::test]
    async fn test_local_rows_are_only_ever_created() {
        let api = MemoryAdminApi::new();
        let mut table = AclTable::new();
        table.create_rows(&nodes(&[1, 2, 3]), None, None);

        table.mark_changed(AclId(-1)).unwrap();
        table.set_permission(AclId(-2), Permission::Read, true).unwrap();
        table.mark_deleted(&[AclId(-3)]);

        let report = table.save(&api, TOKEN).await;
        let calls = api.calls().await;
        assert_eq!(
            calls,
            vec![ApiCall::PostAcl(AclId(-1)), ApiCall::PostAcl(AclId(-2))]
        );
        assert!(calls.iter().all(|c| matches!(c, ApiCall::PostAcl(_))));

        table.apply_save_report(&report);
        let ids: Vec<_> = table.rows().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![AclId(1000), AclId(1001)]);
        assert!(table.rows().iter().all(|r| r.status == RowStatus::Unchanged));
        assert!(table.rows()[1].read);
    }

    #[tokio::test]
    async fn test_failed_rows_keep_status() {
        let api = MemoryAdminApi::new();
        api.set_acls(vec![server_row(1), server_row(2)]).await;
        api.fail_acl(AclId(2)).await;

        let mut table = AclTable::new();
        table.load(vec![server_row(1), server_row(2)]);
        table.mark_deleted(&[AclId(1), AclId(2)]);

        let report = table.save(&api, TOKEN).await;
        assert!(report.has_failures());
        assert_eq!(report.summary(), "0 created, 0 updated, 1 deleted, 1 failed");

        table.apply_save_report(&report);
        assert_eq!(table.len(), 1);
        assert_eq!(table.row(AclId(2)).unwrap().status, RowStatus::Deleted);
        assert!(table.has_pending_changes());
    }

    #[tokio::test]
    async fn test_save_with_nothing_staged_makes_no_calls() {
        let api = MemoryAdminApi::new();
        let mut table = AclTable::new();
        table.load(vec![server_row(1)]);

        let report = table.save(&api, TOKEN).await;
        assert!(report.is_empty());
        assert!(api.calls().await.is_empty());
    }
}
