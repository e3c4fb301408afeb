//! Cache backend implementations.
//!
//! Concrete implementations of `bazaar_core::cache::Cache`.
//!
//! # Feature Flags
//!
//! - The in-memory LRU cache is always available.
//! - `redis`: Redis cache using the redis crate.

mod memory;

#[cfg(feature = "redis")]
pub mod redis_impl;

pub use memory::MemoryCache;

#[cfg(feature = "redis")]
pub use redis_impl::RedisCache;
