//! Database layer
//!
//! This module provides database abstraction for the Tandem backend.
//! It supports:
//! - SQLite (default, for single-binary deployment)
//! - MySQL (for larger deployments)
//!
//! The database driver is selected based on configuration. The layer uses a
//! trait-based abstraction (`DatabasePool`) so repositories can work with
//! either backend without knowing which one is active.

pub mod migrations;
pub mod pool;
pub mod repositories;

pub use pool::{
    create_pool, create_test_pool, DatabasePool, DynDatabasePool, MysqlDatabase, SqliteDatabase,
};
