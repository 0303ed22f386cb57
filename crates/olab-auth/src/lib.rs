//! # olab-auth
//!
//! Session persistence, the auth gate state machine, the injected
//! [`AuthContext`](context::AuthContext), and the route table that splits
//! public from protected pages.

pub mod context;
pub mod gate;
pub mod router;
pub mod storage;

pub use context::AuthContext;
pub use gate::{AuthGate, AuthState};
pub use router::{Navigation, Page, Router};
pub use storage::{FileSessionStorage, MemorySessionStorage, SessionStorage};
