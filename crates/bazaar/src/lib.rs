//! Soft-deleting, cache-through, cursor-paginated persistence for the bazaar
//! marketplace.
//!
//! Every entity is stored through one generic [`Repository`]. An entity
//! declaration carries only its serde schema, its collection name, and its
//! event topic prefix; creation, reads, paging, updates, soft deletes, cache
//! upkeep, and `<prefix>.<verb>` events are shared.
//!
//! # Feature Flags
//!
//! - `sqlite` (default): SQLite JSON document store.
//! - `redis`: Redis cache and Redis pub/sub event sink.
//!
//! # Example
//!
//! ```ignore
//! let (persistence, worker) = Persistence::from_config(&Config::from_env(), Arc::new(TracingSink)).await?;
//! let rides = persistence.repository::<Ride>();
//! let ride = rides.create(ride).await?;
//! let page = rides.list(&Filter::new().eq("status", "requested"), &PageRequest::new().first(20)).await?;
//! ```

pub mod cache;
pub mod cli;
pub mod config;
pub mod entities;
pub mod events;
pub mod persistence;
pub mod registry;
pub mod repository;
pub mod seed;
pub mod storage;

pub use config::Config;
pub use persistence::Persistence;
pub use registry::Repositories;
pub use repository::{CacheReadPolicy, CollectionHandle, Repository, RepositoryOptions};

pub use bazaar_core::error::{RepositoryError, Result};
pub use bazaar_core::query::{Filter, Page, PageRequest};
pub use bazaar_core::record::{Entity, Record, RecordId};
