//! `surveybar-auth`: read-only permission boundary for topbar resolution.
//!
//! This crate is intentionally decoupled from HTTP and storage.

pub mod authorize;
pub mod gateway;
pub mod permissions;

pub use authorize::{Grant, StaticPermissionGateway};
pub use gateway::PermissionGateway;
pub use permissions::Capability;
