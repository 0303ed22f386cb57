//! # olab-entity
//!
//! Domain models for the OLab admin client. Every struct in this crate
//! mirrors a backend payload or a local value object. Backend payloads use
//! camelCase field names on the wire.

pub mod acl;
pub mod reference;
pub mod session;
pub mod user;
