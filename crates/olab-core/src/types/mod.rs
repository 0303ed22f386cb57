//! Shared value types: typed identifiers and selection sets.

pub mod id;
pub mod selection;

pub use id::{AclId, GroupId, MapId, NodeId, RoleId, UserId};
pub use selection::Selection;
