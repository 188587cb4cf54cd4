//! The `services` module provides a high-level API for interacting with the
//! database. It encapsulates all the SQL logic and data access patterns,
//! allowing the rest of the application (e.g., HTTP handlers) to work with
//! domain models without needing to know about the underlying schema or
//! queries.
//!
//! All public functions from the sub-modules are re-exported here for
//! convenient access under the `crate::db::services::` path.

pub mod bookmark_service;
pub mod tag_service;

pub use bookmark_service::*;
pub use tag_service::*;
