//! ACL editor: query filter, staged table, save reconciliation.

pub mod editor;
pub mod filter;
pub mod save;
pub mod table;

pub use editor::AclEditor;
pub use filter::{AclFilter, FilterState, ObjectSelection, Targets};
pub use save::{RowOutcome, SaveReport};
pub use table::AclTable;
