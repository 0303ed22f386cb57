//! Query parameters for fetching ACL rows.

use serde::{Deserialize, Serialize};

use olab_core::types::{GroupId, MapId, NodeId, RoleId};

/// Filter sent to the backend when loading the ACL table.
///
/// `None` for the group or role means "any".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AclQuery {
    /// Restrict to one group.
    pub group_id: Option<GroupId>,
    /// Restrict to one role.
    pub role_id: Option<RoleId>,
    /// Restrict to these maps.
    pub map_ids: Vec<MapId>,
    /// Restrict to these nodes.
    pub node_ids: Vec<NodeId>,
}

impl AclQuery {
    /// Render the query as URL parameters, lists joined by commas.
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(group_id) = self.group_id {
            params.push(("groupId", group_id.to_string()));
        }
        if let Some(role_id) = self.role_id {
            params.push(("roleId", role_id.to_string()));
        }
        if !self.map_ids.is_empty() {
            params.push(("mapIds", join(&self.map_ids)));
        }
        if !self.node_ids.is_empty() {
            params.push(("nodeIds", join(&self.node_ids)));
        }
        params
    }
}

fn join<T: ToString>(ids: &[T]) -> String {
    ids.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_query_has_no_params() {
        assert!(AclQuery::default().to_params().is_empty());
    }

    #[test]
    fn test_params() {
        let query = AclQuery {
            group_id: Some(GroupId(2)),
            role_id: None,
            map_ids: vec![MapId(1), MapId(5)],
            node_ids: vec![],
        };
        assert_eq!(
            query.to_params(),
            vec![("groupId", "2".to_string()), ("mapIds", "1,5".to_string())]
        );
    }
}
