//! # Taskdeck Shared Library
//!
//! Core domain logic for Taskdeck, a multi-tenant project and task
//! management service: users own projects, invite members, and organize
//! tagged tasks on a Pending/InProgress/Done board. The HTTP surface lives
//! in the `taskdeck-api` crate; everything with an invariant worth
//! protecting lives here.
//!
//! ## Module Organization
//!
//! - `models`: database rows and their queries
//! - `db`: connection pooling and migrations
//! - `auth`: ownership/membership checks and password hashing
//! - `services`: operation pipelines enforcing the domain rules
//! - `pagination`: the shared page/size listing contract

pub mod auth;
pub mod db;
pub mod models;
pub mod pagination;
pub mod services;

/// Current version of the Taskdeck shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
