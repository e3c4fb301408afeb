//! The generic entity repository and its type-erased handle.

mod handle;
mod options;
#[allow(clippy::module_inception)]
mod repository;

pub use handle::CollectionHandle;
pub use options::{CacheReadPolicy, RepositoryOptions, UnknownCacheReadPolicy};
pub use repository::Repository;
