//! Read-only reference data: groups and roles.

use serde::{Deserialize, Serialize};

use olab_core::types::{GroupId, RoleId};

/// A user group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    /// Group identifier.
    pub id: GroupId,
    /// Display name.
    pub name: String,
}

/// A role within a group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    /// Role identifier.
    pub id: RoleId,
    /// Display name.
    pub name: String,
}

/// Find a group by id.
pub fn find_group(groups: &[Group], id: GroupId) -> Option<&Group> {
    groups.iter().find(|g| g.id == id)
}

/// Find a role by id.
pub fn find_role(roles: &[Role], id: RoleId) -> Option<&Role> {
    roles.iter().find(|r| r.id == id)
}
