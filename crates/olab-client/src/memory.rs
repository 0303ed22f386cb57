//! In-memory [`AdminApi`] that records every call.
//!
//! Holds users, groups, roles and ACL rows in a Tokio mutex. Individual ACL
//! rows or the whole backend can be switched to fail, which lets callers
//! exercise their error paths without a server.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use olab_core::error::AppError;
use olab_core::result::AppResult;
use olab_core::types::{AclId, UserId};
use olab_entity::acl::{AclQuery, AclRow, ObjectType};
use olab_entity::reference::{Group, Role};
use olab_entity::session::{AuthInfo, Credentials};
use olab_entity::user::User;

use crate::api::AdminApi;
use crate::upload::FileUpload;

/// A call received by [`MemoryAdminApi`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiCall {
    /// `login` with the given username.
    Login(String),
    /// `get_users`.
    GetUsers,
    /// `update_user` for the given user.
    UpdateUser(UserId),
    /// `delete_users` with the given ids.
    DeleteUsers(Vec<UserId>),
    /// `import_users` with the given file name.
    ImportUsers(String),
    /// `get_groups`.
    GetGroups,
    /// `get_roles`.
    GetRoles,
    /// `get_acls` with the given query.
    GetAcls(AclQuery),
    /// `post_acl` for the given local row id.
    PostAcl(AclId),
    /// `put_acl` for the given row id.
    PutAcl(AclId),
    /// `delete_acl` for the given row id.
    DeleteAcl(AclId),
}

#[derive(Debug)]
struct InnerState {
    accounts: HashMap<String, String>,
    token: String,
    users: Vec<User>,
    import_result: Vec<User>,
    groups: Vec<Group>,
    roles: Vec<Role>,
    acls: Vec<AclRow>,
    next_acl_id: i64,
    failing_acls: HashSet<AclId>,
    offline: bool,
    calls: Vec<ApiCall>,
}

/// In-memory backend double.
#[derive(Debug, Clone)]
pub struct MemoryAdminApi {
    state: Arc<Mutex<InnerState>>,
}

impl Default for MemoryAdminApi {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryAdminApi {
    /// Token handed out by [`AdminApi::login`] and accepted by every call.
    pub const TOKEN: &'static str = "memory-token";

    /// Create an empty backend with no accounts.
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(InnerState {
                accounts: HashMap::new(),
                token: Self::TOKEN.to_string(),
                users: Vec::new(),
                import_result: Vec::new(),
                groups: Vec::new(),
                roles: Vec::new(),
                acls: Vec::new(),
                next_acl_id: 1000,
                failing_acls: HashSet::new(),
                offline: false,
                calls: Vec::new(),
            })),
        }
    }

    /// Add a login account.
    pub async fn add_account(&self, username: &str, password: &str) {
        let mut state = self.state.lock().await;
        state
            .accounts
            .insert(username.to_string(), password.to_string());
    }

    /// Replace the stored users.
    pub async fn set_users(&self, users: Vec<User>) {
        self.state.lock().await.users = users;
    }

    /// Users returned (and stored) by the next import.
    pub async fn set_import_result(&self, users: Vec<User>) {
        self.state.lock().await.import_result = users;
    }

    /// Replace the stored groups.
    pub async fn set_groups(&self, groups: Vec<Group>) {
        self.state.lock().await.groups = groups;
    }

    /// Replace the stored roles.
    pub async fn set_roles(&self, roles: Vec<Role>) {
        self.state.lock().await.roles = roles;
    }

    /// Replace the stored ACL rows.
    pub async fn set_acls(&self, acls: Vec<AclRow>) {
        self.state.lock().await.acls = acls;
    }

    /// Make every write touching this row id fail.
    pub async fn fail_acl(&self, id: AclId) {
        self.state.lock().await.failing_acls.insert(id);
    }

    /// Make every call fail as if the backend were unreachable.
    pub async fn set_offline(&self, offline: bool) {
        self.state.lock().await.offline = offline;
    }

    /// Calls received so far, in order.
    pub async fn calls(&self) -> Vec<ApiCall> {
        self.state.lock().await.calls.clone()
    }

    /// Forget recorded calls.
    pub async fn clear_calls(&self) {
        self.state.lock().await.calls.clear();
    }

    /// Current stored ACL rows.
    pub async fn acls(&self) -> Vec<AclRow> {
        self.state.lock().await.acls.clone()
    }

    /// Current stored users.
    pub async fn users(&self) -> Vec<User> {
        self.state.lock().await.users.clone()
    }
}

impl InnerState {
    fn record(&mut self, call: ApiCall, token: Option<&str>) -> AppResult<()> {
        self.calls.push(call);
        if self.offline {
            return Err(AppError::network("Backend unreachable"));
        }
        match token {
            Some(token) if token != self.token => {
                Err(AppError::authentication("Invalid or expired token"))
            }
            _ => Ok(()),
        }
    }

    fn check_acl(&self, id: AclId) -> AppResult<()> {
        if self.failing_acls.contains(&id) {
            return Err(AppError::network(format!("Write for ACL {id} rejected")));
        }
        Ok(())
    }

    fn acl_index(&self, id: AclId) -> AppResult<usize> {
        self.acls
            .iter()
            .position(|r| r.id == id)
            .ok_or_else(|| AppError::not_found(format!("ACL {id} not found")))
    }
}

fn matches_query(row: &AclRow, query: &AclQuery) -> bool {
    if query.group_id.is_some() && row.group_id != query.group_id {
        return false;
    }
    if query.role_id.is_some() && row.role_id != query.role_id {
        return false;
    }
    if query.map_ids.is_empty() && query.node_ids.is_empty() {
        return true;
    }
    match row.object_type {
        ObjectType::Maps => query.map_ids.iter().any(|m| m.get() == row.object_index),
        ObjectType::Nodes => query.node_ids.iter().any(|n| n.get() == row.object_index),
    }
}

#[async_trait]
impl AdminApi for MemoryAdminApi {
    async fn login(&self, credentials: &Credentials) -> AppResult<AuthInfo> {
        let mut state = self.state.lock().await;
        state.record(ApiCall::Login(credentials.username.clone()), None)?;

        match state.accounts.get(&credentials.username) {
            Some(password) if *password == credentials.password => Ok(AuthInfo {
                token: state.token.clone(),
                expires_in: None,
            }),
            _ => Err(AppError::authentication("Invalid username or password")),
        }
    }

    async fn get_users(&self, token: &str) -> AppResult<Vec<User>> {
        let mut state = self.state.lock().await;
        state.record(ApiCall::GetUsers, Some(token))?;
        Ok(state.users.clone())
    }

    async fn update_user(
        &self,
        token: &str,
        user: &User,
        _password: Option<&str>,
    ) -> AppResult<User> {
        let mut state = self.state.lock().await;
        state.record(ApiCall::UpdateUser(user.id), Some(token))?;

        let slot = state
            .users
            .iter_mut()
            .find(|u| u.id == user.id)
            .ok_or_else(|| AppError::not_found(format!("User {} not found", user.id)))?;
        *slot = user.clone();
        Ok(user.clone())
    }

    async fn delete_users(&self, token: &str, ids: &[UserId]) -> AppResult<()> {
        let mut state = self.state.lock().await;
        state.record(ApiCall::DeleteUsers(ids.to_vec()), Some(token))?;
        state.users.retain(|u| !ids.contains(&u.id));
        Ok(())
    }

    async fn import_users(&self, token: &str, upload: &FileUpload) -> AppResult<Vec<User>> {
        let mut state = self.state.lock().await;
        state.record(ApiCall::ImportUsers(upload.file_name.clone()), Some(token))?;

        let imported = state.import_result.clone();
        state.users.extend(imported.iter().cloned());
        Ok(imported)
    }

    async fn get_groups(&self, token: &str) -> AppResult<Vec<Group>> {
        let mut state = self.state.lock().await;
        state.record(ApiCall::GetGroups, Some(token))?;
        Ok(state.groups.clone())
    }

    async fn get_roles(&self, token: &str) -> AppResult<Vec<Role>> {
        let mut state = self.state.lock().await;
        state.record(ApiCall::GetRoles, Some(token))?;
        Ok(state.roles.clone())
    }

    async fn get_acls(&self, token: &str, query: &AclQuery) -> AppResult<Vec<AclRow>> {
        let mut state = self.state.lock().await;
        state.record(ApiCall::GetAcls(query.clone()), Some(token))?;
        Ok(state
            .acls
            .iter()
            .filter(|r| matches_query(r, query))
            .cloned()
            .collect())
    }

    async fn post_acl(&self, token: &str, row: &AclRow) -> AppResult<AclRow> {
        let mut state = self.state.lock().await;
        state.record(ApiCall::PostAcl(row.id), Some(token))?;
        state.check_acl(row.id)?;

        let mut created = row.clone();
        created.id = AclId(state.next_acl_id);
        created.status = Default::default();
        state.next_acl_id += 1;
        state.acls.push(created.clone());
        Ok(created)
    }

    async fn put_acl(&self, token: &str, row: &AclRow) -> AppResult<()> {
        let mut state = self.state.lock().await;
        state.record(ApiCall::PutAcl(row.id), Some(token))?;
        state.check_acl(row.id)?;

        let index = state.acl_index(row.id)?;
        let mut stored = row.clone();
        stored.status = Default::default();
        state.acls[index] = stored;
        Ok(())
    }

    async fn delete_acl(&self, token: &str, row: &AclRow) -> AppResult<()> {
        let mut state = self.state.lock().await;
        state.record(ApiCall::DeleteAcl(row.id), Some(token))?;
        state.check_acl(row.id)?;

        let index = state.acl_index(row.id)?;
        state.acls.remove(index);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use olab_core::error::ErrorKind;
    use olab_core::types::{GroupId, MapId, NodeId, RoleId};

    fn acl(id: i64, object_type: ObjectType, index: i64, group: i64) -> AclRow {
        AclRow {
            id: AclId(id),
            object_type,
            object_index: index,
            group_id: Some(GroupId(group)),
            role_id: Some(RoleId(1)),
            group_name: format!("g{group}"),
            role_name: "r1".into(),
            read: true,
            write: false,
            execute: false,
            status: Default::default(),
        }
    }

    #[tokio::test]
    async fn test_login() {
        let api = MemoryAdminApi::new();
        api.add_account("admin", "secret").await;

        let ok = api
            .login(&Credentials {
                username: "admin".into(),
                password: "secret".into(),
            })
            .await
            .unwrap();
        assert_eq!(ok.token, MemoryAdminApi::TOKEN);

        let err = api
            .login(&Credentials {
                username: "admin".into(),
                password: "wrong".into(),
            })
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authentication);
    }

    #[tokio::test]
    async fn test_bad_token_rejected() {
        let api = MemoryAdminApi::new();
        let err = api.get_groups("stale").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authentication);
    }

    #[tokio::test]
    async fn test_get_acls_filters() {
        let api = MemoryAdminApi::new();
        api.set_acls(vec![
            acl(1, ObjectType::Maps, 10, 1),
            acl(2, ObjectType::Nodes, 20, 1),
            acl(3, ObjectType::Maps, 11, 2),
        ])
        .await;

        let token = MemoryAdminApi::TOKEN;
        let all = api.get_acls(token, &AclQuery::default()).await.unwrap();
        assert_eq!(all.len(), 3);

        let by_group = AclQuery {
            group_id: Some(GroupId(2)),
            ..Default::default()
        };
        assert_eq!(api.get_acls(token, &by_group).await.unwrap()[0].id, AclId(3));

        let by_objects = AclQuery {
            map_ids: vec![MapId(10)],
            node_ids: vec![NodeId(20)],
            ..Default::default()
        };
        let ids: Vec<_> = api
            .get_acls(token, &by_objects)
            .await
            .unwrap()
            .iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec![AclId(1), AclId(2)]);
    }

    #[tokio::test]
    async fn test_post_assigns_id_and_failures_apply() {
        let api = MemoryAdminApi::new();
        let created = api
            .post_acl(MemoryAdminApi::TOKEN, &acl(-1, ObjectType::Maps, 1, 1))
            .await
            .unwrap();
        assert_eq!(created.id, AclId(1000));

        api.fail_acl(AclId(-2)).await;
        let err = api
            .post_acl(MemoryAdminApi::TOKEN, &acl(-2, ObjectType::Maps, 1, 1))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Network);
        assert_eq!(
            api.calls().await,
            vec![ApiCall::PostAcl(AclId(-1)), ApiCall::PostAcl(AclId(-2))]
        );
    }
}
