//! The ACL query filter: group, role and selected maps/nodes.

use olab_core::types::{GroupId, MapId, NodeId, RoleId, Selection};
use olab_entity::acl::AclQuery;

/// The maps and nodes currently selected.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObjectSelection {
    /// Selected maps.
    pub maps: Selection<MapId>,
    /// Selected nodes.
    pub nodes: Selection<NodeId>,
}

/// Objects new ACL rows are created for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Targets {
    /// Nothing is selected.
    None,
    /// One row per node.
    Nodes(Vec<NodeId>),
    /// One row per map.
    Maps(Vec<MapId>),
}

impl ObjectSelection {
    /// The objects to create rows for. A node selection takes precedence
    /// and the map selection is then ignored entirely.
    pub fn targets(&self) -> Targets {
        if !self.nodes.is_empty() {
            Targets::Nodes(self.nodes.to_vec())
        } else if !self.maps.is_empty() {
            Targets::Maps(self.maps.to_vec())
        } else {
            Targets::None
        }
    }
}

/// A snapshot of the filter controls, as reported by the query form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    /// Chosen group; `None` or a negative id means any.
    pub group_id: Option<GroupId>,
    /// Chosen role; `None` or a negative id means any.
    pub role_id: Option<RoleId>,
    /// Selected map ids.
    pub selected_map_ids: Vec<MapId>,
    /// Selected node ids.
    pub selected_node_ids: Vec<NodeId>,
}

/// Current filter exposed to the ACL page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AclFilter {
    group_id: Option<GroupId>,
    role_id: Option<RoleId>,
    selection: ObjectSelection,
}

impl AclFilter {
    /// Create a filter matching everything.
    pub fn new() -> Self {
        Self::default()
    }

    /// Chosen group, if any.
    pub fn group_id(&self) -> Option<GroupId> {
        self.group_id
    }

    /// Chosen role, if any.
    pub fn role_id(&self) -> Option<RoleId> {
        self.role_id
    }

    /// Selected maps and nodes.
    pub fn selection(&self) -> &ObjectSelection {
        &self.selection
    }

    /// Choose a group; negative ids mean any.
    pub fn set_group(&mut self, group_id: Option<GroupId>) {
        self.group_id = group_id.filter(|id| id.get() >= 0);
    }

    /// Choose a role; negative ids mean any.
    pub fn set_role(&mut self, role_id: Option<RoleId>) {
        self.role_id = role_id.filter(|id| id.get() >= 0);
    }

    /// Replace the map selection.
    pub fn select_maps(&mut self, ids: impl IntoIterator<Item = MapId>) {
        self.selection.maps.set(ids);
    }

    /// Replace the node selection.
    pub fn select_nodes(&mut self, ids: impl IntoIterator<Item = NodeId>) {
        self.selection.nodes.set(ids);
    }

    /// Apply a new snapshot; returns whether anything changed so the
    /// caller can decide to reload.
    pub fn on_state_change(&mut self, state: FilterState) -> bool {
        let before = self.clone();
        self.set_group(state.group_id);
        self.set_role(state.role_id);
        self.select_maps(state.selected_map_ids);
        self.select_nodes(state.selected_node_ids);
        *self != before
    }

    /// The backend query for this filter.
    pub fn to_query(&self) -> AclQuery {
        AclQuery {
            group_id: self.group_id,
            role_id: self.role_id,
            map_ids: self.selection.maps.to_vec(),
            node_ids: self.selection.nodes.to_vec(),
        }
    }
}
