//! SQLite storage backend.
//!
//! A JSON document store on top of `rusqlite`, with `tokio-rusqlite` running
//! queries on a dedicated thread. Filters are compiled to SQL over
//! `json_extract`/`json_type` with the same semantics as `Filter::matches`.

mod error;
mod query;
mod schema;
mod store;

pub use store::SqliteStore;
