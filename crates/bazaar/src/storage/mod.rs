//! Document store implementations.
//!
//! Concrete implementations of `bazaar_core::storage::DocumentStore`.
//!
//! # Feature Flags
//!
//! - The in-memory store is always available.
//! - `sqlite` (default): SQLite JSON document store using `rusqlite` and
//!   `tokio-rusqlite`.

pub mod inmemory;

#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use inmemory::InMemoryStore;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteStore;
