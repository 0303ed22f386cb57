//! User entity model.

use serde::{Deserialize, Serialize};

use olab_core::AppError;
use olab_core::types::{GroupId, RoleId, UserId};

/// Placeholder shown instead of a stored password.
pub const MASKED_PASSWORD: &str = "*******";

/// A group/role membership held by a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupRole {
    /// Group the membership is in.
    pub group_id: GroupId,
    /// Role held within the group.
    pub role_id: RoleId,
}

/// A user account as returned by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique user identifier.
    pub id: UserId,
    /// Login name.
    pub username: String,
    /// Display name.
    #[serde(default)]
    pub nick_name: Option<String>,
    /// Email address.
    #[serde(default)]
    pub email: Option<String>,
    /// Group/role memberships.
    #[serde(default)]
    pub roles: Vec<GroupRole>,
}

/// A user opened in the detail editor, with password fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDetail {
    /// The user being edited.
    #[serde(flatten)]
    pub user: User,
    /// New password, or [`MASKED_PASSWORD`] when unchanged.
    pub password: String,
    /// Confirmation of the new password.
    pub verify_password: String,
}

impl UserDetail {
    /// Open an existing user with both password fields masked.
    pub fn masked(user: User) -> Self {
        Self {
            user,
            password: MASKED_PASSWORD.to_string(),
            verify_password: MASKED_PASSWORD.to_string(),
        }
    }

    /// Whether the password fields hold a new password.
    pub fn password_changed(&self) -> bool {
        self.password != MASKED_PASSWORD
    }

    /// Check the detail form before it is submitted.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.user.username.trim().is_empty() {
            return Err(AppError::validation("Username is required"));
        }
        if self.password != self.verify_password {
            return Err(AppError::validation("Passwords do not match"));
        }
        if self.password_changed() && self.password.is_empty() {
            return Err(AppError::validation("Password cannot be empty"));
        }
        Ok(())
    }
}
