//! # olab-core
//!
//! Core crate for the OLab admin client. Contains configuration schemas,
//! typed identifiers, selection sets, and the unified error system.
//!
//! This crate has **no** internal dependencies on other OLab crates.

pub mod config;
pub mod error;
pub mod result;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
