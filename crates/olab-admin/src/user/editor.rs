//! The users page.
//!
//! Unlike ACLs, user mutations are not staged: deletes, imports and detail
//! saves go to the backend immediately and the local list follows the
//! backend's answer.

use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info};

use olab_client::{AdminApi, FileUpload};
use olab_core::error::AppError;
use olab_core::result::AppResult;
use olab_core::types::{Selection, UserId};
use olab_entity::reference::{Group, Role};
use olab_entity::user::{User, UserDetail};

use crate::alert::AlertQueue;
use crate::confirm::{Confirm, ConfirmDialog};

/// File extensions accepted by [`UserEditor::import_file`].
pub const IMPORT_EXTENSIONS: &[&str] = &["xlsx"];

/// Drives the users page for one logged-in session.
pub struct UserEditor {
    api: Arc<dyn AdminApi>,
    token: String,
    users: Vec<User>,
    groups: Vec<Group>,
    roles: Vec<Role>,
    selection: Selection<UserId>,
    detail: Option<UserDetail>,
    alerts: AlertQueue,
    loading: bool,
}

impl std::fmt::Debug for UserEditor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserEditor")
            .field("users", &self.users.len())
            .field("selection", &self.selection)
            .field("loading", &self.loading)
            .finish_non_exhaustive()
    }
}

impl UserEditor {
    /// Create an editor with no users loaded.
    pub fn new(api: Arc<dyn AdminApi>, token: impl Into<String>) -> Self {
        Self {
            api,
            token: token.into(),
            users: Vec::new(),
            groups: Vec::new(),
            roles: Vec::new(),
            selection: Selection::new(),
            detail: None,
            alerts: AlertQueue::new(),
            loading: false,
        }
    }

    /// Loaded users.
    pub fn users(&self) -> &[User] {
        &self.users
    }

    /// Known groups.
    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    /// Known roles.
    pub fn roles(&self) -> &[Role] {
        &self.roles
    }

    /// The user open in the detail form.
    pub fn detail(&self) -> Option<&UserDetail> {
        self.detail.as_ref()
    }

    /// Pending status messages.
    pub fn alerts_mut(&mut self) -> &mut AlertQueue {
        &mut self.alerts
    }

    /// Whether a fetch is in flight.
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Fetch users, then groups, then roles.
    pub async fn load(&mut self) -> AppResult<()> {
        self.loading = true;
        let result = self.fetch_all().await;
        self.loading = false;

        if let Err(e) = &result {
            self.alerts.error(e);
        }
        result
    }

    async fn fetch_all(&mut self) -> AppResult<()> {
        self.users = self.api.get_users(&self.token).await?;
        self.groups = self.api.get_groups(&self.token).await?;
        self.roles = self.api.get_roles(&self.token).await?;
        info!(users = self.users.len(), "Loaded users");
        Ok(())
    }

    /// Open a user in the detail form with masked passwords.
    pub fn select_row(&mut self, id: UserId) -> AppResult<&UserDetail> {
        let user = self
            .users
            .iter()
            .find(|u| u.id == id)
            .cloned()
            .ok_or_else(|| AppError::not_found(format!("User {id} not found")))?;
        Ok(&*self.detail.insert(UserDetail::masked(user)))
    }

    /// Replace the row selection, keeping only loaded users. Returns
    /// whether the export action is available.
    pub fn set_selection(&mut self, ids: impl IntoIterator<Item = UserId>) -> bool {
        let known: Vec<UserId> = ids
            .into_iter()
            .filter(|id| self.users.iter().any(|u| u.id == *id))
            .collect();
        self.selection.set(known);
        self.export_visible()
    }

    /// Rows currently selected.
    pub fn selection(&self) -> &Selection<UserId> {
        &self.selection
    }

    /// Export is offered only while something is selected.
    pub fn export_visible(&self) -> bool {
        !self.selection.is_empty()
    }

    /// Delete users on the backend, then locally.
    ///
    /// Returns `false` when the operator declines. On failure the list is
    /// left as it was.
    pub async fn delete_selected(
        &mut self,
        ids: &[UserId],
        confirm: &dyn Confirm,
    ) -> AppResult<bool> {
        if ids.is_empty() {
            return Err(AppError::validation("No users selected"));
        }
        let dialog = ConfirmDialog::new(format!("Delete {} user(s)?", ids.len()));
        if !confirm.confirm(&dialog)? {
            return Ok(false);
        }

        if let Err(e) = self.api.delete_users(&self.token, ids).await {
            self.alerts.error(&e);
            return Err(e);
        }

        self.users.retain(|u| !ids.contains(&u.id));
        let remaining: Vec<UserId> = self
            .selection
            .iter()
            .filter(|id| !ids.contains(id))
            .collect();
        self.selection.set(remaining);
        self.detail = None;

        info!(count = ids.len(), "Deleted users");
        self.alerts.info("User(s) deleted");
        Ok(true)
    }

    /// Upload a spreadsheet of users. Imported users are shown first.
    pub async fn import_file(&mut self, path: &Path) -> AppResult<usize> {
        let upload = match FileUpload::from_path(path, IMPORT_EXTENSIONS).await {
            Ok(upload) => upload,
            Err(e) => {
                self.alerts.error(&e);
                return Err(e);
            }
        };

        let imported = match self.api.import_users(&self.token, &upload).await {
            Ok(users) => users,
            Err(e) => {
                self.alerts.error(&e);
                return Err(e);
            }
        };

        let count = imported.len();
        self.users.splice(0..0, imported);

        info!(file = %upload.file_name, count, "Imported users");
        self.alerts.info(format!("{count} User(s) Uploaded"));
        Ok(count)
    }

    /// Replace the loaded row with the same id.
    pub fn on_user_changed(&mut self, user: User) -> AppResult<()> {
        let slot = self
            .users
            .iter_mut()
            .find(|u| u.id == user.id)
            .ok_or_else(|| AppError::not_found(format!("User {} not found", user.id)))?;
        *slot = user;
        Ok(())
    }

    /// Validate and submit the detail form. A masked password is not sent.
    pub async fn save_detail(&mut self, detail: UserDetail) -> AppResult<User> {
        if let Err(e) = detail.validate() {
            self.alerts.error(&e);
            return Err(e);
        }

        let password = detail
            .password_changed()
            .then_some(detail.password.as_str());
        let saved = match self
            .api
            .update_user(&self.token, &detail.user, password)
            .await
        {
            Ok(user) => user,
            Err(e) => {
                self.alerts.error(&e);
                return Err(e);
            }
        };

        self.on_user_changed(saved.clone())?;
        self.detail = Some(UserDetail::masked(saved.clone()));
        debug!(user_id = %saved.id, password_changed = password.is_some(), "User saved");
        self.alerts.info("User saved");
        Ok(saved)
    }

    /// Write the selected users as pretty JSON. Returns how many were
    /// written.
    pub fn export_selected<W: Write>(&self, writer: W) -> AppResult<usize> {
        let selected: Vec<&User> = self
            .users
            .iter()
            .filter(|u| self.selection.contains(&u.id))
            .collect();
        serde_json::to_writer_pretty(writer, &selected)?;
        Ok(selected.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alert::Severity;
    use crate::confirm::AutoConfirm;
    use olab_client::{ApiCall, MemoryAdminApi};
    use olab_core::error::ErrorKind;
    use olab_entity::user::MASKED_PASSWORD;

    fn user(id: i64, name: &str) -> User {
        User {
            id: UserId(id),
            username: name.into(),
            nick_name: None,
            email: None,
            roles: vec![],
        }
    }

    async fn editor() -> (MemoryAdminApi, UserEditor) {
        let api = MemoryAdminApi::new();
        api.set_users(vec![user(1, "alice"), user(2, "bob"), user(3, "carol")])
            .await;
        let mut editor = UserEditor::new(Arc::new(api.clone()), MemoryAdminApi::TOKEN);
        editor.load().await.unwrap();
        api.clear_calls().await;
        (api, editor)
    }

    #[tokio::test]
    async fn test_load_order() {
        let api = MemoryAdminApi::new();
        let mut editor = UserEditor::new(Arc::new(api.clone()), MemoryAdminApi::TOKEN);
        editor.load().await.unwrap();
        assert_eq!(
            api.calls().await,
            vec![ApiCall::GetUsers, ApiCall::GetGroups, ApiCall::GetRoles]
        );
        assert!(!editor.is_loading());
    }

    #[tokio::test]
    async fn test_failed_load_alerts_and_stops_loading() {
        let api = MemoryAdminApi::new();
        api.set_offline(true).await;
        let mut editor = UserEditor::new(Arc::new(api.clone()), MemoryAdminApi::TOKEN);

        assert!(editor.load().await.is_err());
        assert!(!editor.is_loading());
        assert!(editor.users().is_empty());
        assert!(editor.groups().is_empty());
        assert!(editor.roles().is_empty());
        assert_eq!(
            editor.alerts_mut().current().unwrap().severity,
            Severity::Error
        );
    }

    #[tokio::test]
    async fn test_select_row_masks_password() {
        let (_api, mut editor) = editor().await;
        let detail = editor.select_row(UserId(2)).unwrap();
        assert_eq!(detail.user.username, "bob");
        assert_eq!(detail.password, MASKED_PASSWORD);
        assert_eq!(detail.verify_password, MASKED_PASSWORD);

        assert!(editor.select_row(UserId(9)).is_err());
    }

    #[tokio::test]
    async fn test_selection_controls_export() {
        let (_api, mut editor) = editor().await;
        assert!(!editor.export_visible());
        assert!(editor.set_selection([UserId(1), UserId(3), UserId(42)]));
        assert_eq!(editor.selection().len(), 2);

        let mut out = Vec::new();
        assert_eq!(editor.export_selected(&mut out).unwrap(), 2);
        let exported: Vec<User> = serde_json::from_slice(&out).unwrap();
        assert_eq!(exported[1].username, "carol");

        assert!(!editor.set_selection([]));
    }

    #[tokio::test]
    async fn test_delete_removes_rows_after_success() {
        let (api, mut editor) = editor().await;
        editor.select_row(UserId(1)).unwrap();
        editor.set_selection([UserId(1), UserId(2)]);

        let deleted = editor
            .delete_selected(&[UserId(1)], &AutoConfirm(true))
            .await
            .unwrap();
        assert!(deleted);
        assert_eq!(api.calls().await, vec![ApiCall::DeleteUsers(vec![UserId(1)])]);
        assert_eq!(editor.users().len(), 2);
        assert!(editor.detail().is_none());
        assert_eq!(editor.selection().to_vec(), vec![UserId(2)]);
        assert_eq!(editor.alerts_mut().dismiss().unwrap().message, "User(s) deleted");
    }

    #[tokio::test]
    async fn test_failed_delete_keeps_rows() {
        let (api, mut editor) = editor().await;
        api.set_offline(true).await;

        let err = editor
            .delete_selected(&[UserId(1)], &AutoConfirm(true))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Network);
        assert_eq!(editor.users().len(), 3);
        assert_eq!(editor.alerts_mut().current().unwrap().severity, Severity::Error);
    }

    #[tokio::test]
    async fn test_declined_delete_makes_no_call() {
        let (api, mut editor) = editor().await;
        assert!(!editor
            .delete_selected(&[UserId(1)], &AutoConfirm(false))
            .await
            .unwrap());
        assert!(api.calls().await.is_empty());
    }

    #[tokio::test]
    async fn test_import_prepends_users() {
        let (api, mut editor) = editor().await;
        api.set_import_result(vec![user(10, "dave"), user(11, "erin")])
            .await;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Users.XLSX");
        std::fs::write(&path, b"sheet").unwrap();

        assert_eq!(editor.import_file(&path).await.unwrap(), 2);
        let names: Vec<_> = editor.users().iter().map(|u| u.username.as_str()).collect();
        assert_eq!(names, vec!["dave", "erin", "alice", "bob", "carol"]);
        assert_eq!(editor.alerts_mut().dismiss().unwrap().message, "2 User(s) Uploaded");
    }

    #[tokio::test]
    async fn test_import_rejects_other_types() {
        let (api, mut editor) = editor().await;
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("users.csv");
        std::fs::write(&path, b"a,b").unwrap();

        let err = editor.import_file(&path).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
        assert!(api.calls().await.is_empty());
    }

    #[tokio::test]
    async fn test_on_user_changed_unknown_id() {
        let (_api, mut editor) = editor().await;
        let err = editor.on_user_changed(user(99, "ghost")).unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
        assert_eq!(editor.users().len(), 3);
    }

    #[tokio::test]
    async fn test_save_detail_validates_then_updates() {
        let (api, mut editor) = editor().await;
        let mut detail = editor.select_row(UserId(2)).unwrap().clone();

        detail.password = "new".into();
        let err = editor.save_detail(detail.clone()).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
        assert!(api.calls().await.is_empty());

        detail.verify_password = "new".into();
        detail.user.email = Some("bob@example.org".into());
        let saved = editor.save_detail(detail).await.unwrap();
        assert_eq!(saved.email.as_deref(), Some("bob@example.org"));
        assert_eq!(api.calls().await, vec![ApiCall::UpdateUser(UserId(2))]);
        assert_eq!(
            editor.users()[1].email.as_deref(),
            Some("bob@example.org")
        );
        assert_eq!(editor.detail().unwrap().password, MASKED_PASSWORD);
    }
}
