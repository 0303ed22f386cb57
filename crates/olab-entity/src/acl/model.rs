//! ACL row entity model.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use olab_core::AppError;
use olab_core::types::{AclId, GroupId, RoleId};

use super::status::{ChangeKind, RowStatus};

/// Name shown for the wildcard group or role.
pub const WILDCARD_NAME: &str = "*";

/// Backend object types an ACL entry can be scoped to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObjectType {
    /// A single node inside a map.
    Nodes,
    /// A whole map.
    Maps,
}

impl ObjectType {
    /// Return the type as it appears on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Nodes => "Nodes",
            Self::Maps => "Maps",
        }
    }
}

impl fmt::Display for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One of the three permission flags on an ACL row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Permission {
    /// Read access.
    Read,
    /// Write access.
    Write,
    /// Execute access.
    Execute,
}

impl Permission {
    /// Every permission column, in display order.
    pub const ALL: [Permission; 3] = [Self::Read, Self::Write, Self::Execute];

    /// Return the column name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Read => "read",
            Self::Write => "write",
            Self::Execute => "execute",
        }
    }

    /// Map a grid column name to a permission, if it is one.
    pub fn from_column(column: &str) -> Option<Self> {
        match column {
            "read" => Some(Self::Read),
            "write" => Some(Self::Write),
            "execute" => Some(Self::Execute),
            _ => None,
        }
    }
}

impl FromStr for Permission {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "r" | "read" => Ok(Self::Read),
            "w" | "write" => Ok(Self::Write),
            "x" | "execute" => Ok(Self::Execute),
            _ => Err(AppError::validation(format!(
                "Invalid permission: '{s}'. Expected one of: read, write, execute"
            ))),
        }
    }
}

/// An access control entry binding a group and role to a map or node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AclRow {
    /// Row identifier (negative while unsaved).
    pub id: AclId,
    /// Kind of object the entry is scoped to.
    pub object_type: ObjectType,
    /// Id of the map or node.
    pub object_index: i64,
    /// Group the entry applies to.
    #[serde(default)]
    pub group_id: Option<GroupId>,
    /// Role the entry applies to.
    #[serde(default)]
    pub role_id: Option<RoleId>,
    /// Display name of the group.
    #[serde(default)]
    pub group_name: String,
    /// Display name of the role.
    #[serde(default)]
    pub role_name: String,
    /// Read flag.
    #[serde(default)]
    pub read: bool,
    /// Write flag.
    #[serde(default)]
    pub write: bool,
    /// Execute flag.
    #[serde(default)]
    pub execute: bool,
    /// Local staging marker; never sent to or read from the backend.
    #[serde(skip)]
    pub status: RowStatus,
}

impl AclRow {
    /// Whether this row only exists locally.
    pub fn is_pending_create(&self) -> bool {
        self.id.is_synthetic()
    }

    /// Whether this row is staged for deletion.
    pub fn is_pending_delete(&self) -> bool {
        self.status == RowStatus::Deleted
    }

    /// Rows without both a group and a role cannot be selected.
    pub fn is_selectable(&self) -> bool {
        self.group_id.is_some() && self.role_id.is_some()
    }

    /// Read a permission flag.
    pub fn permission(&self, permission: Permission) -> bool {
        match permission {
            Permission::Read => self.read,
            Permission::Write => self.write,
            Permission::Execute => self.execute,
        }
    }

    /// Write a permission flag.
    pub fn set_permission(&mut self, permission: Permission, value: bool) {
        match permission {
            Permission::Read => self.read = value,
            Permission::Write => self.write = value,
            Permission::Execute => self.execute = value,
        }
    }

    /// The backend call this row needs on save, if any.
    ///
    /// Synthetic rows only ever map to [`ChangeKind::Create`]; a synthetic
    /// row staged for deletion was never persisted and needs no call.
    pub fn pending_change(&self) -> Option<ChangeKind> {
        if self.is_pending_create() {
            return match self.status {
                RowStatus::Deleted => None,
                _ => Some(ChangeKind::Create),
            };
        }
        match self.status {
            RowStatus::Unchanged => None,
            RowStatus::Edited => Some(ChangeKind::Update),
            RowStatus::Deleted => Some(ChangeKind::Delete),
        }
    }

    /// Compact `rwx` rendering of the permission flags.
    pub fn permission_string(&self) -> String {
        [
            (self.read, 'r'),
            (self.write, 'w'),
            (self.execute, 'x'),
        ]
        .iter()
        .map(|(set, c)| if *set { *c } else { '-' })
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(id: i64, status: RowStatus) -> AclRow {
        AclRow {
            id: AclId(id),
            object_type: ObjectType::Maps,
            object_index: 7,
            group_id: Some(GroupId(1)),
            role_id: Some(RoleId(2)),
            group_name: "learners".into(),
            role_name: "author".into(),
            read: true,
            write: false,
            execute: false,
            status,
        }
    }

    #[test]
    fn test_pending_change() {
        assert_eq!(row(1, RowStatus::Unchanged).pending_change(), None);
        assert_eq!(
            row(1, RowStatus::Edited).pending_change(),
            Some(ChangeKind::Update)
        );
        assert_eq!(
            row(1, RowStatus::Deleted).pending_change(),
            Some(ChangeKind::Delete)
        );
        assert_eq!(
            row(-1, RowStatus::Edited).pending_change(),
            Some(ChangeKind::Create)
        );
        assert_eq!(row(-1, RowStatus::Deleted).pending_change(), None);
    }

    #[test]
    fn test_wire_format_is_camel_case_without_status() {
        let json = serde_json::to_value(row(3, RowStatus::Edited)).unwrap();
        assert_eq!(json["objectType"], "Maps");
        assert_eq!(json["objectIndex"], 7);
        assert_eq!(json["groupName"], "learners");
        assert!(json.get("status").is_none());
    }

    #[test]
    fn test_deserialize_defaults_status() {
        let row: AclRow = serde_json::from_str(
            r#"{"id":9,"objectType":"Nodes","objectIndex":3,"groupId":null,"roleId":4,
                "groupName":"","roleName":"learner","read":true,"write":true,"execute":false}"#,
        )
        .unwrap();
        assert_eq!(row.status, RowStatus::Unchanged);
        assert!(!row.is_selectable());
        assert_eq!(row.permission_string(), "rw-");
    }

    #[test]
    fn test_permission_parsing() {
        assert_eq!("W".parse::<Permission>().unwrap(), Permission::Write);
        assert_eq!(Permission::from_column("execute"), Some(Permission::Execute));
        assert_eq!(Permission::from_column("groupName"), None);
        assert!("delete".parse::<Permission>().is_err());
    }
}
