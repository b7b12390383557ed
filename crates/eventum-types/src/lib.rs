//! Shared types, adapter traits, and core utilities for Eventum.
//!
//! This crate contains the foundational types that are shared between the
//! application crates and all adapter implementations, so adapters can be
//! built without depending on the HTTP layer.

#![forbid(unsafe_code)]

pub mod abac;
pub mod auth_adapter;
pub mod error;
pub mod meta_adapter;
pub mod prelude;
pub mod types;
pub mod worker;

// vim: ts=4
