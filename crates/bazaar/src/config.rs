use std::{env, time::Duration};

use crate::repository::{CacheReadPolicy, RepositoryOptions};

/// Persistence configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Cache TTL in seconds (default: 3600)
    pub cache_ttl_seconds: u64,
    /// Maximum number of in-memory cache entries (default: 10,000)
    pub cache_max_entries: usize,
    /// Whether `get` trusts cache hits (default: revalidate)
    pub cache_read_policy: CacheReadPolicy,
    /// Insert/replace/delete deadline in milliseconds (default: 1000)
    pub store_write_timeout_ms: u64,
    /// Single read, count, and cache call deadline in milliseconds (default: 1000)
    pub store_read_timeout_ms: u64,
    /// List iteration deadline in milliseconds (default: 3000)
    pub list_timeout_ms: u64,
    /// Buffer of the in-process broadcast event sink (default: 1024)
    pub event_channel_capacity: usize,
    /// Path to SQLite database file (default: "bazaar.db")
    /// Note: Only used when the `sqlite` feature is enabled.
    pub sqlite_path: String,
    /// Redis connection URL (default: "redis://localhost:6379")
    /// Note: Only used when the `redis` feature is enabled.
    pub redis_url: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `CACHE_TTL_SECONDS` - Cache TTL in seconds (default: 3600)
    /// - `CACHE_MAX_ENTRIES` - Maximum in-memory cache entries (default: 10,000)
    /// - `CACHE_READ_POLICY` - `revalidate` or `trust-cache` (default: revalidate)
    /// - `STORE_WRITE_TIMEOUT_MS` - Write deadline (default: 1000)
    /// - `STORE_READ_TIMEOUT_MS` - Read deadline (default: 1000)
    /// - `LIST_TIMEOUT_MS` - List iteration deadline (default: 3000)
    /// - `EVENT_CHANNEL_CAPACITY` - Broadcast sink buffer (default: 1024)
    /// - `SQLITE_PATH` - SQLite database path (default: "bazaar.db")
    /// - `REDIS_URL` - Redis connection URL (default: "redis://localhost:6379")
    ///
    /// Unparsable values fall back to the default.
    pub fn from_env() -> Self {
        Self {
            cache_ttl_seconds: parse_var("CACHE_TTL_SECONDS").unwrap_or(3600),
            cache_max_entries: parse_var("CACHE_MAX_ENTRIES").unwrap_or(10_000),
            cache_read_policy: env::var("CACHE_READ_POLICY")
                .ok()
                .and_then(|v| match v.parse() {
                    Ok(policy) => Some(policy),
                    Err(err) => {
                        tracing::warn!(error = %err, "Ignoring CACHE_READ_POLICY");
                        None
                    }
                })
                .unwrap_or_default(),
            store_write_timeout_ms: parse_var("STORE_WRITE_TIMEOUT_MS").unwrap_or(1_000),
            store_read_timeout_ms: parse_var("STORE_READ_TIMEOUT_MS").unwrap_or(1_000),
            list_timeout_ms: parse_var("LIST_TIMEOUT_MS").unwrap_or(3_000),
            event_channel_capacity: parse_var("EVENT_CHANNEL_CAPACITY").unwrap_or(1_024),
            sqlite_path: env::var("SQLITE_PATH").unwrap_or_else(|_| "bazaar.db".to_string()),
            redis_url: env::var("REDIS_URL")
                .unwrap_or_else(|_| "redis://localhost:6379".to_string()),
        }
    }

    /// Get cache TTL as a Duration.
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_seconds)
    }

    /// Repository tunables derived from this configuration.
    pub fn repository_options(&self) -> RepositoryOptions {
        RepositoryOptions {
            cache_ttl: self.cache_ttl(),
            read_policy: self.cache_read_policy,
            write_timeout: Duration::from_millis(self.store_write_timeout_ms),
            read_timeout: Duration::from_millis(self.store_read_timeout_ms),
            list_timeout: Duration::from_millis(self.list_timeout_ms),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.trim().parse().ok())
}
