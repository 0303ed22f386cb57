//! # olab-client
//!
//! The [`AdminApi`] trait describes every backend call the dashboard makes.
//! [`HttpAdminApi`] implements it over HTTP with `reqwest`; [`MemoryAdminApi`]
//! is an in-memory implementation that records calls, used by the editor
//! tests and for offline demos.

pub mod api;
pub mod http;
pub mod memory;
pub mod upload;

pub use api::AdminApi;
pub use http::HttpAdminApi;
pub use memory::{ApiCall, MemoryAdminApi};
pub use upload::FileUpload;
