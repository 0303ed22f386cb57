//! ACL domain entities.

pub mod model;
pub mod query;
pub mod status;

pub use model::{AclRow, ObjectType, Permission};
pub use query::AclQuery;
pub use status::{ChangeKind, RowStatus};
