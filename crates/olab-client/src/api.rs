//! Backend API trait.

use async_trait::async_trait;

use olab_core::result::AppResult;
use olab_core::types::UserId;
use olab_entity::acl::{AclQuery, AclRow};
use olab_entity::reference::{Group, Role};
use olab_entity::session::{AuthInfo, Credentials};
use olab_entity::user::User;

use crate::upload::FileUpload;

/// Every call the admin pages make against the backend.
///
/// All calls except [`AdminApi::login`] take the bearer token of the
/// current session.
#[async_trait]
pub trait AdminApi: Send + Sync + 'static {
    /// Exchange credentials for a token.
    async fn login(&self, credentials: &Credentials) -> AppResult<AuthInfo>;

    /// List all users.
    async fn get_users(&self, token: &str) -> AppResult<Vec<User>>;

    /// Save changes to an existing user. `password` is sent only when set.
    async fn update_user(
        &self,
        token: &str,
        user: &User,
        password: Option<&str>,
    ) -> AppResult<User>;

    /// Delete the given users.
    async fn delete_users(&self, token: &str, ids: &[UserId]) -> AppResult<()>;

    /// Upload a spreadsheet of users; returns the users that were created.
    async fn import_users(&self, token: &str, upload: &FileUpload) -> AppResult<Vec<User>>;

    /// List all groups.
    async fn get_groups(&self, token: &str) -> AppResult<Vec<Group>>;

    /// List all roles.
    async fn get_roles(&self, token: &str) -> AppResult<Vec<Role>>;

    /// Fetch ACL rows matching the query.
    async fn get_acls(&self, token: &str, query: &AclQuery) -> AppResult<Vec<AclRow>>;

    /// Create an ACL row; returns it with the server-assigned id.
    async fn post_acl(&self, token: &str, row: &AclRow) -> AppResult<AclRow>;

    /// Update an existing ACL row.
    async fn put_acl(&self, token: &str, row: &AclRow) -> AppResult<()>;

    /// Delete an existing ACL row.
    async fn delete_acl(&self, token: &str, row: &AclRow) -> AppResult<()>;
}
