//! Events: filtered listing, owner-restricted CRUD and attendance

#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![forbid(unsafe_code)]

pub mod filter;
pub mod handler;
pub mod input;
mod prelude;
pub mod registration;

// vim: ts=4
