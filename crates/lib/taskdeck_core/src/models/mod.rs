//! Domain models.
//!
//! These are internal domain models, distinct from the API request/response
//! models in `taskdeck_api` (which render identifiers and timestamps as
//! plain strings).

pub mod auth;
pub mod task;
pub mod user;

pub use auth::TokenClaims;
pub use task::{CachedTask, Task, TaskChanges, TaskStatus};
pub use user::User;
