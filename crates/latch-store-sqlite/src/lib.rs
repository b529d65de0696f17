//! SQLite backend for Latch session snapshots.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! without blocking the async runtime.

mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::{SavedSnapshot, SqliteSnapshotStore};
