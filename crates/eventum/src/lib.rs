//! Eventum is a small self-hosted event registry.
//!
//! # Features
//!
//! - Public, filterable event listing
//! - Event CRUD restricted to the creator
//! - Attendance registration for authenticated users
//! - User registration and JWT bearer authentication

// Re-export shared types and adapter traits from eventum-types
pub use eventum_types::auth_adapter;
pub use eventum_types::error;
pub use eventum_types::meta_adapter;
pub use eventum_types::types;
pub use eventum_types::worker;

// Feature crate re-exports
pub use eventum_auth as auth;
pub use eventum_core::abac;
pub use eventum_event as event;

// Local modules
pub mod app;
pub mod prelude;
pub mod routes;

pub use crate::app::{App, AppBuilder};

// vim: ts=4
