//! User domain entities.

pub mod model;

pub use model::{GroupRole, MASKED_PASSWORD, User, UserDetail};
