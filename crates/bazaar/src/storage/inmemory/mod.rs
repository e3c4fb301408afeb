//! In-memory storage backend.
//!
//! Holds every collection in a `BTreeMap` behind `Arc<RwLock<_>>` and
//! evaluates filters with `Filter::matches`. Useful for tests and for running
//! the CLI without the `sqlite` feature.

mod store;

pub use store::InMemoryStore;
