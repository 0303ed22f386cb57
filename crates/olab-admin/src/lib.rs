//! # olab-admin
//!
//! Page-level editors. The ACL editor stages changes locally and reconciles
//! them on save; the user editor sends every mutation immediately. Both
//! report outcomes through an [`AlertQueue`](alert::AlertQueue) and ask a
//! [`Confirm`](confirm::Confirm) implementation before destructive actions.

pub mod acl;
pub mod alert;
pub mod confirm;
pub mod user;

pub use acl::{AclEditor, AclFilter, AclTable, SaveReport};
pub use alert::{Alert, AlertQueue, Severity};
pub use confirm::{Confirm, ConfirmDialog};
pub use user::UserEditor;
