//! Access checks for operator-only endpoints.

mod admin;

pub use admin::{AdminGuard, AdminGuardError, AdminGuardErrorExt};
