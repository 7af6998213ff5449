//! # taskdeck_core
//!
//! Core domain logic for Taskdeck: document store access, cache adapter,
//! credential/task/user services, and outbound mail.

pub mod auth;
pub mod cache;
pub mod mail;
pub mod models;
pub mod store;
pub mod tasks;
pub mod users;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
