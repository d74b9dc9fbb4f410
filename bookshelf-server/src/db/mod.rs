//! Database layer - connection provider and schema bootstrap
//!
//! The pool is capped at a single connection: every manager shares the same
//! handle, and statements from one request run in sequence on it.

pub mod migrations;
pub mod pool;

pub use pool::Database;
