//! User management page.

pub mod editor;

pub use editor::{IMPORT_EXTENSIONS, UserEditor};
