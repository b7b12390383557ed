//! Core infrastructure for Eventum.
//!
//! Shared application state, request extractors, middleware and write
//! policies used by the feature crates and the application crate.

#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![forbid(unsafe_code)]

pub mod abac;
pub mod app;
pub mod extract;
pub mod middleware;
pub mod prelude;

// Re-export commonly used types
pub use app::{App, AppBuilderOpts, AppState};
pub use extract::{Auth, JsonBody, OptionalRequestId};

// vim: ts=4
