//! Authentication subsystem: user registration and token endpoints.

#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![forbid(unsafe_code)]

pub mod handler;
pub mod validate;

mod prelude;

// vim: ts=4
